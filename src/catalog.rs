// Fixed, ordered enumerations of areas and timeframes.
//
// Result cells are keyed by these names. They are process-wide constants:
// nothing edits them at runtime, and any key outside them is treated as
// "no data" by every reader.

/// The provincial-level area, read by the executive summary.
pub const PROVINCIAL_AREA: &str = "ระดับจังหวัด";

/// Prefix shared by every district unit name.
pub const DISTRICT_PREFIX: &str = "คปสอ.";

/// Provincial level first, then the seven district units.
pub const AREAS: [&str; 8] = [
    PROVINCIAL_AREA,
    "คปสอ.เมือง",
    "คปสอ.ควนโดน",
    "คปสอ.ท่าแพ",
    "คปสอ.ควนกาหลง",
    "คปสอ.ละงู",
    "คปสอ.ทุ่งหว้า",
    "คปสอ.มะนัง",
];

/// Cumulative overview, four quarters, then the twelve months of the fiscal year.
pub const TIMEFRAMES: [&str; 17] = [
    "ภาพรวม (สะสม)",
    "ไตรมาส 1 (ต.ค.-ธ.ค.)",
    "ไตรมาส 2 (ม.ค.-มี.ค.)",
    "ไตรมาส 3 (เม.ย.-มิ.ย.)",
    "ไตรมาส 4 (ก.ค.-ก.ย.)",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
];

pub const CUMULATIVE_TIMEFRAME: &str = TIMEFRAMES[0];

pub fn is_known_area(name: &str) -> bool {
    AREAS.contains(&name)
}

pub fn is_known_timeframe(name: &str) -> bool {
    TIMEFRAMES.contains(&name)
}

/// Area name without the district prefix, used as a chart/table axis label.
pub fn short_area_label(area: &str) -> &str {
    area.strip_prefix(DISTRICT_PREFIX).unwrap_or(area)
}

/// Resolve a 1-based menu index into an enumeration entry.
pub fn pick<'a>(items: &[&'a str], index: usize) -> Option<&'a str> {
    index.checked_sub(1).and_then(|i| items.get(i).copied())
}

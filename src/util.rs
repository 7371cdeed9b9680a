// Utility helpers for parsing, basic statistics and formatting.
//
// This module centralizes the forgiving number handling so the rest of the
// code can work with typed `Option<f64>` values.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Parse user or stored text into `f64`, being forgiving about formatting
/// (surrounding spaces, thousands separators).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Rejects values that contain alphabetic characters (so "NaN" and "inf"
///   never get through).
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric value of the leading part of a string, e.g. `"7.1"` -> 7.1,
/// `"12a"` -> 12. Anything without a leading number is 0.
pub fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return 0.0;
    }
    // A trailing "." or sign-only prefix is trimmed before parsing.
    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .unwrap_or(0.0)
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn round_to(n: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (n * factor).round() / factor
}

/// Integer percentage of `part` over `whole`, rounded; 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

/// Comparison for floats that treats NaN as equal instead of panicking.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Display form of an optional measurement: "-" when absent, no trailing
/// zeros for whole numbers.
pub fn format_optional(n: Option<f64>) -> String {
    match n {
        None => "-".to_string(),
        Some(v) if v.fract() == 0.0 => format_number(v, 0),
        Some(v) => format_number(v, 2),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

fn is_thai_leading_vowel(c: char) -> bool {
    ('\u{0E40}'..='\u{0E44}').contains(&c)
}

fn is_thai_consonant(c: char) -> bool {
    ('\u{0E01}'..='\u{0E2E}').contains(&c)
}

// Mai taikhu, tone marks and thanthakhat only matter after the letters do.
fn is_thai_diacritic(c: char) -> bool {
    ('\u{0E47}'..='\u{0E4C}').contains(&c)
}

/// Sort key for Thai/Latin display text.
///
/// Thai dictionary order sorts a word by its first consonant, not by a
/// leading vowel written before it (เ แ โ ใ ไ), so those pairs are swapped.
/// Tone marks are compared only as a tiebreak, Latin letters case-insensitively.
pub fn collation_key(s: &str) -> (String, String) {
    let chars: Vec<char> = s.chars().flat_map(char::to_lowercase).collect();
    let mut reordered = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_thai_leading_vowel(c) && i + 1 < chars.len() && is_thai_consonant(chars[i + 1]) {
            reordered.push(chars[i + 1]);
            reordered.push(c);
            i += 2;
        } else {
            reordered.push(c);
            i += 1;
        }
    }
    let primary: String = reordered.iter().filter(|c| !is_thai_diacritic(**c)).collect();
    let secondary: String = reordered.into_iter().collect();
    (primary, secondary)
}

pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

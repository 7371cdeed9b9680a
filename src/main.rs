// Entry point and console flow.
//
// The menu stands in for the dashboard's pages:
// - executive summary and dashboard print the aggregates for the selected
//   fiscal year and timeframe,
// - the indicator list runs the search/filter/sort pipeline,
// - the edit form changes one result cell at a time and saves it through
//   the JSON-file table.
use kpi_tracker::catalog::{self, AREAS, TIMEFRAMES};
use kpi_tracker::config::AppConfig;
use kpi_tracker::edit::{apply_edit, EditField};
use kpi_tracker::notify::{ConsoleNotifier, Notifier, NotifyKind, NotifyOptions};
use kpi_tracker::output;
use kpi_tracker::reports::{area_score_rows, area_status_rows, critical_rows};
use kpi_tracker::session::Session;
use kpi_tracker::store::{IndicatorStore, JsonFileStore};
use kpi_tracker::types::IndicatorRecord;
use kpi_tracker::util::{format_int, format_optional};
use kpi_tracker::view::{table_rows, SortKey, StatusFilter, ViewQuery};
use std::error::Error;
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Print `prompt` and read one trimmed line from stdin. `None` at end of
/// input or on a read error.
fn read_input(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    next_line(&mut io::stdin().lock())
}

fn next_line(reader: &mut impl BufRead) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Like [`read_input`], with end of input read as a blank answer.
fn read_line(prompt: &str) -> String {
    read_input(prompt).unwrap_or_default()
}

fn read_choice() -> Option<String> {
    read_input("Enter choice: ")
}

/// Show a numbered list and read a 1-based pick. Blank input keeps `current`.
fn pick_from<'a>(title: &str, items: &[&'a str], current: &'a str) -> Option<&'a str> {
    println!("{}", title);
    for (i, item) in items.iter().enumerate() {
        let mark = if *item == current { "*" } else { " " };
        println!("{} [{}] {}", mark, i + 1, item);
    }
    let input = read_line("Number (Enter = keep): ");
    if input.is_empty() {
        return Some(current);
    }
    input.parse::<usize>().ok().and_then(|n| catalog::pick(items, n))
}

fn print_header(session: &Session) {
    println!(
        "ปีงบประมาณ {} | รอบ: {} | {} ตัวชี้วัด",
        session.fiscal_year(),
        session.timeframe(),
        format_int(session.records().len())
    );
}

/// Option [1]: switch fiscal year and load its indicators.
fn handle_load(session: &mut Session, store: &mut dyn IndicatorStore, notifier: &mut dyn Notifier) {
    let input = read_line(&format!("Fiscal year [{}]: ", session.fiscal_year()));
    let year = if input.is_empty() {
        session.fiscal_year().to_string()
    } else {
        input
    };
    if !year.chars().all(|c| c.is_ascii_digit()) {
        println!("Invalid fiscal year.\n");
        return;
    }
    let report = session.load(store, notifier, &year);
    println!(
        "Loaded {} indicators for {} ({:?}).",
        format_int(report.total_rows),
        report.fiscal_year,
        report.source
    );
    if report.malformed_rows > 0 {
        println!(
            "Note: {} indicators have results under unknown timeframes or areas; those cells are ignored.",
            format_int(report.malformed_rows)
        );
    }
    if report.inconsistent_cells > 0 {
        println!(
            "Note: {} result cells have a status that does not match their score.",
            format_int(report.inconsistent_cells)
        );
    }
    println!();
}

/// Option [2]: choose the reporting timeframe.
fn handle_timeframe(session: &mut Session) {
    let current = session.timeframe().to_string();
    match pick_from("Timeframes:", &TIMEFRAMES, &current) {
        Some(tf) => {
            if let Err(e) = session.set_timeframe(tf) {
                println!("{}\n", e);
            }
        }
        None => println!("Invalid choice.\n"),
    }
}

/// Option [3]: provincial-level summary and the failing indicators.
fn handle_executive(session: &Session) {
    let summary = session.executive();
    print_header(session);
    println!("Executive Summary (ระดับจังหวัด)\n");
    println!("ตัวชี้วัดทั้งหมด:   {}", format_int(summary.total));
    println!("ผ่านเกณฑ์:        {}", format_int(summary.passed));
    println!("ไม่ผ่านเกณฑ์:      {}", format_int(summary.failed));
    println!("รอประเมิน:        {}", format_int(summary.pending));
    println!("อัตราความสำเร็จ:   {}%", summary.success_rate);
    println!("คะแนนเฉลี่ย:       {}\n", summary.avg_score);
    println!("ตัวชี้วัดที่ต้องเร่งรัด ({})", summary.critical_indicators.len());
    output::preview_table_rows(&critical_rows(&summary, session.timeframe()), usize::MAX);
}

/// Option [4]: counts over every area plus per-area profiles.
fn handle_dashboard(session: &Session) {
    let stats = session.dashboard();
    print_header(session);
    println!(
        "รายการประเมินทั้งหมด {} | ผ่าน {} | ไม่ผ่าน {} | รอประเมิน {}\n",
        format_int(stats.total),
        format_int(stats.passed),
        format_int(stats.failed),
        format_int(stats.pending)
    );
    println!("คะแนนเฉลี่ยรายพื้นที่");
    output::preview_table_rows(&area_score_rows(&stats), AREAS.len());
    println!("ผลการประเมินรายพื้นที่");
    output::preview_table_rows(&area_status_rows(&stats), AREAS.len());
}

/// Ask for the table query: search text, status filter, area and sort key.
fn prompt_query(session: &Session) -> ViewQuery {
    let mut query = session.query();
    query.search_term = read_line("Search (name or order, Enter = all): ");
    query.status_filter = loop {
        let s = read_line("Status filter [all/ผ่าน/ไม่ผ่าน/รอประเมิน]: ");
        match StatusFilter::parse(&s) {
            Some(f) => break f,
            None => println!("Unknown status."),
        }
    };
    if let Some(area) = pick_from("Areas:", &AREAS, catalog::PROVINCIAL_AREA) {
        query.area = area.to_string();
    }
    query.sort_key = loop {
        let s = read_line("Sort by [order/name/score] (Enter = order): ");
        if s.is_empty() {
            break SortKey::Order;
        }
        match SortKey::parse(&s) {
            Some(k) => break k,
            None => println!("Unknown sort key."),
        }
    };
    query
}

/// Option [5]: the indicator table.
fn handle_list(session: &Session) {
    let query = prompt_query(session);
    let rows = session.view(&query);
    print_header(session);
    println!("พื้นที่: {} | {} รายการ\n", query.area, format_int(rows.len()));
    output::preview_table_rows(&table_rows(&rows, &query), usize::MAX);
}

fn print_cell(record: &IndicatorRecord, timeframe: &str, area: &str) {
    let cell = record.cell(timeframe, area);
    println!("  {}: {}", EditField::Target.label(), format_optional(cell.and_then(|c| c.target)));
    println!("  {}: {}", EditField::ResultCount.label(), format_optional(cell.and_then(|c| c.result_count)));
    println!(
        "  {}: {}",
        EditField::ResultPercentage.label(),
        format_optional(cell.and_then(|c| c.result_percentage))
    );
    println!("  {}: {}", EditField::Score.label(), format_optional(cell.and_then(|c| c.score)));
    println!("  {}: {}", EditField::Status.label(), record.status_at(timeframe, area));
}

/// Read-only metadata shown above the editable fields.
fn print_indicator_header(record: &IndicatorRecord) {
    println!("แก้ไขผลการดำเนินงาน: [{}] {}", record.order, record.name);
    println!("  เกณฑ์เป้าหมาย: {}", record.target_criteria);
    println!(
        "  น้ำหนัก: {} | คะแนนเต็ม: {}",
        format_optional(Some(record.weight)),
        format_optional(Some(record.max_score))
    );
    println!("  กลุ่มงานที่รับผิดชอบ: {}", record.responsible_group);
    let rubric = record.rubric_line();
    if !rubric.is_empty() {
        println!("  เกณฑ์การให้คะแนน: {}", rubric);
    }
}

/// Option [6]: edit one indicator's results for the selected timeframe.
///
/// Field edits accumulate on a draft; saving persists it. A failed save keeps
/// the draft so the user can try again.
fn handle_edit(session: &mut Session, store: &mut dyn IndicatorStore, notifier: &mut dyn Notifier) {
    let key = read_line("Indicator id or order: ");
    let Some(original) = session
        .records()
        .iter()
        .filter(|r| r.fiscal_year == session.fiscal_year())
        .find(|r| r.id == key || r.order.to_string() == key)
        .cloned()
    else {
        println!("No indicator {} in fiscal year {}.\n", key, session.fiscal_year());
        return;
    };
    let timeframe = session.timeframe().to_string();
    let mut area = catalog::PROVINCIAL_AREA;
    let mut draft = original.clone();

    print_indicator_header(&draft);
    loop {
        println!("\nรอบ: {} | พื้นที่: {}", timeframe, area);
        print_cell(&draft, &timeframe, area);
        println!("[1-5] edit field  [a] area  [s] save  [c] cancel");
        let Some(choice) = read_choice() else {
            println!("\nDiscarded changes.");
            return;
        };
        match choice.as_str() {
            "a" => match pick_from("Areas:", &AREAS, area) {
                Some(a) => area = a,
                None => println!("Invalid choice."),
            },
            "s" => match session.save_edit(store, notifier, draft.clone()) {
                Ok(()) => {
                    println!();
                    return;
                }
                Err(_) => println!("Save failed; the draft is kept. Press [s] to retry."),
            },
            "c" => {
                println!("Discarded changes.\n");
                return;
            }
            choice => {
                let field = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| EditField::ALL.get(i).copied());
                let Some(field) = field else {
                    println!("Invalid choice.");
                    continue;
                };
                let raw = read_line(&format!("{} (Enter = clear): ", field.label()));
                match apply_edit(&draft, &timeframe, area, field, &raw) {
                    Ok(updated) => draft = updated,
                    Err(e) => println!("{}", e),
                }
            }
        }
    }
}

/// Option [7]: write CSV tables and the JSON summary.
fn handle_export(session: &Session, export_dir: &std::path::Path) {
    let executive = session.executive();
    let dashboard = session.dashboard();
    let query = session.query();
    let rows = table_rows(&session.view(&query), &query);
    match output::export_reports(
        export_dir,
        session.fiscal_year(),
        session.timeframe(),
        &executive,
        &dashboard,
        &rows,
    ) {
        Ok(files) => {
            for f in files {
                println!("Exported {}", f.display());
            }
            println!();
        }
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cfg = AppConfig::load()?;
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut store = JsonFileStore::new(&cfg.data_path);
    info!(path = %store.path().display(), "using indicator table");
    let mut notifier = ConsoleNotifier;
    let mut session = Session::new(&cfg.fiscal_year, &cfg.timeframe);
    let year = cfg.fiscal_year.clone();
    session.load(&mut store, &mut notifier, &year);

    loop {
        print_header(&session);
        println!("[1] Load fiscal year");
        println!("[2] Select timeframe");
        println!("[3] Executive summary");
        println!("[4] Dashboard");
        println!("[5] Indicator list");
        println!("[6] Edit indicator results");
        println!("[7] Export reports");
        println!("[8] Add indicator");
        println!("[0] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nEnd of input, exiting.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut session, &mut store, &mut notifier),
            "2" => handle_timeframe(&mut session),
            "3" => handle_executive(&session),
            "4" => handle_dashboard(&session),
            "5" => handle_list(&session),
            "6" => handle_edit(&mut session, &mut store, &mut notifier),
            "7" => handle_export(&session, &cfg.export_dir),
            "8" => session.add_indicator(&mut notifier),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => notifier.notify(
                NotifyKind::Error,
                "Invalid choice",
                "Please enter a number from 0 to 8.",
                NotifyOptions::default(),
            ),
        }
    }
    Ok(())
}

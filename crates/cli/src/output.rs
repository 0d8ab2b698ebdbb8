use crate::error::CliError;
use connectors::file::csv::naming::FileNaming;
use engine_runtime::execution::executor::RunSummary;
use model::window::Window;
use serde::Serialize;

#[derive(Serialize)]
struct PlannedWindow {
    start: String,
    end: String,
    days: i64,
    file_name: String,
}

fn planned(windows: &[Window], naming: &FileNaming) -> Vec<PlannedWindow> {
    windows
        .iter()
        .map(|w| PlannedWindow {
            start: w.start.format("%Y-%m-%d").to_string(),
            end: w.end.format("%Y-%m-%d").to_string(),
            days: w.days(),
            file_name: naming.file_name(w),
        })
        .collect()
}

pub fn print_plan(windows: &[Window], naming: &FileNaming, as_json: bool) -> Result<(), CliError> {
    let rows = planned(windows, naming);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<12} {:<12} {:>6}  {}", "Start", "End", "Days", "File");
    println!("{}", "-".repeat(72));
    for row in &rows {
        println!(
            "{:<12} {:<12} {:>6}  {}",
            row.start, row.end, row.days, row.file_name
        );
    }
    println!("{} window(s)", rows.len());
    Ok(())
}

pub fn print_summary(summary: &RunSummary) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

use std::path::Path;

use fairshare_sorter::{DrfSorter, Sorter};
use tracing::info;

use crate::scenario::{Scenario, SortReport};

pub fn replay(path: &str, format: &str) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(Path::new(path))?;
    scenario.validate()?;

    let mut sorter = DrfSorter::new();
    let reports = scenario.replay(&mut sorter);
    info!(
        scenario = scenario.name.as_deref().unwrap_or(path),
        events = scenario.events.len(),
        sorts = reports.len(),
        full_recomputes = sorter.stats().full_recomputes,
        incremental_updates = sorter.stats().incremental_updates,
        "scenario replayed"
    );

    match format {
        "json" => {
            let output = json_report(&scenario, &reports, &sorter);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            print!("{}", format_reports(&reports));
        }
    }

    Ok(())
}

fn json_report(
    scenario: &Scenario,
    reports: &[SortReport],
    sorter: &DrfSorter,
) -> serde_json::Value {
    serde_json::json!({
        "scenario": scenario.name,
        "reports": reports,
        "registered": sorter.count(),
        "total": sorter.total(),
        "stats": sorter.stats(),
    })
}

fn format_reports(reports: &[SortReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("sort at event {}:\n", report.event));
        if report.clients.is_empty() {
            out.push_str("  (no active clients)\n");
        }
        for (rank, client) in report.clients.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {:<24} {:.4}\n",
                rank + 1,
                client.name,
                client.share
            ));
        }
    }
    out
}

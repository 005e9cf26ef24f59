use crate::domain::model::RepoReport;
use chrono::{DateTime, Local};
use std::fmt::Write;

pub fn render(reports: &[RepoReport], generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    writeln!(out, "# Repository Dependency Report").ok();
    writeln!(out).ok();
    writeln!(
        out,
        "_Generated on {}_",
        generated_at.format("%a %b %e %H:%M:%S %Y")
    )
    .ok();
    writeln!(out).ok();
    writeln!(
        out,
        "_Licenses marked with `!` are from the manual `dependency_mapping.csv` file._"
    )
    .ok();
    writeln!(out).ok();

    for report in reports {
        writeln!(out, "## [{}]({})", report.name, report.url).ok();
        writeln!(out).ok();
        writeln!(out, "* **License**: {}", report.license).ok();
        let types = report
            .ecosystems
            .iter()
            .map(|e| e.key())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "* **Detected Types**: {}",
            if types.is_empty() { "None" } else { types.as_str() }
        )
        .ok();
        writeln!(out, "* **Description**: {}", report.description).ok();
        writeln!(out).ok();

        if report.dependencies.is_empty() {
            writeln!(out, "_No dependencies found or parsed._").ok();
            writeln!(out).ok();
        } else {
            writeln!(out, "| Dependency | Type | Version | License | Documentation |").ok();
            writeln!(out, "|------------|------|---------|---------|---------------|").ok();

            let mut sorted = report.dependencies.clone();
            sorted.sort_by(|a, b| (a.ecosystem.key(), &a.name).cmp(&(b.ecosystem.key(), &b.name)));
            for dep in &sorted {
                let link = if dep.url.is_empty() {
                    "N/A".to_string()
                } else {
                    format!("[Link]({})", dep.url)
                };
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    dep.name,
                    dep.ecosystem.key(),
                    dep.version,
                    dep.license_cell(),
                    link
                )
                .ok();
            }
            writeln!(out).ok();
        }
        writeln!(out, "---").ok();
        writeln!(out).ok();
    }

    out
}

use crate::domain::model::RepoReport;
use crate::utils::error::{AuditError, Result};

const HEADER: [&str; 7] = [
    "Repository",
    "Repo License",
    "Dependency",
    "Dependency Type",
    "Version",
    "Dependency License",
    "URL",
];

pub fn render(reports: &[RepoReport]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for report in reports {
        if report.dependencies.is_empty() {
            writer.write_record([
                report.url.as_str(),
                report.license.as_str(),
                "N/A",
                "N/A",
                "N/A",
                "N/A",
                "N/A",
            ])?;
        } else {
            for dep in &report.dependencies {
                writer.write_record([
                    report.url.as_str(),
                    report.license.as_str(),
                    dep.name.as_str(),
                    dep.ecosystem.key(),
                    dep.version.as_str(),
                    dep.license_cell().as_str(),
                    dep.url.as_str(),
                ])?;
            }
        }
    }

    writer
        .into_inner()
        .map_err(|e| AuditError::ProcessingError {
            message: format!("could not finalize CSV report: {}", e),
        })
}

use crate::domain::model::{Dependency, RepoReport};
use crate::utils::error::{AuditError, Result};
use std::collections::BTreeMap;

/// Dependencies whose license or URL is still unresolved, deduplicated
/// across repositories and sorted by (type, name). Mapping-sourced entries
/// are excluded: the user already answered for those.
pub fn collect(reports: &[RepoReport]) -> Vec<Dependency> {
    let mut unresolved: BTreeMap<(&'static str, String), Dependency> = BTreeMap::new();
    for report in reports {
        for dep in &report.dependencies {
            if dep.is_unresolved() {
                unresolved.insert((dep.ecosystem.key(), dep.name.clone()), dep.clone());
            }
        }
    }
    unresolved.into_values().collect()
}

/// Render the fill-in template: same columns as the mapping file, license and
/// documentation_url left blank for the user to complete.
pub fn render(missing: &[Dependency]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "dependency_name",
        "dependency_type",
        "version",
        "license",
        "documentation_url",
    ])?;
    for dep in missing {
        writer.write_record([
            dep.name.as_str(),
            dep.ecosystem.key(),
            dep.version.as_str(),
            "",
            "",
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| AuditError::ProcessingError {
            message: format!("could not finalize missing-mapping template: {}", e),
        })
}

use crate::domain::model::Ecosystem;
use std::path::{Path, PathBuf};

/// Detect which ecosystems a repository uses, based on marker files.
/// The result is ordered like [`Ecosystem::ALL`] so downstream output is
/// deterministic.
pub fn detect(files: &[PathBuf]) -> Vec<Ecosystem> {
    Ecosystem::ALL
        .into_iter()
        .filter(|eco| files.iter().any(|path| matches(*eco, path)))
        .collect()
}

fn matches(eco: Ecosystem, path: &Path) -> bool {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match eco {
        Ecosystem::Python => extension == "py" || file_name == "requirements.txt",
        Ecosystem::JavaScript => file_name == "package.json",
        Ecosystem::Java => file_name == "pom.xml" || file_name == "build.gradle",
        Ecosystem::DotNet => extension == "csproj",
    }
}

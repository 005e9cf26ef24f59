//! Working-tree scanning: ecosystem detection and manifest parsing.

pub mod dotnet;
pub mod ecosystems;
pub mod java;
pub mod javascript;
pub mod license;
pub mod python;
pub mod readme;

use crate::domain::model::{Ecosystem, RepoScan};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directories that never contain manifests worth scanning.
const SKIP_DIRS: [&str; 6] = ["node_modules", ".git", ".venv", "target", "dist", "build"];

/// Collect every regular file under `root`, skipping vendored/build trees.
/// Unreadable directories are logged and skipped.
pub fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                let name = entry.file_name();
                if SKIP_DIRS.iter().any(|skip| name == *skip) {
                    continue;
                }
                stack.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Scan one cloned repository: detect ecosystems, identify its license,
/// pull a description from the README, and parse every manifest found.
pub fn scan_repository(url: &str, name: &str, repo_path: &Path) -> RepoScan {
    let files = walk_files(repo_path);
    let ecosystems = ecosystems::detect(&files);
    let license = license::identify(&files);
    let description = readme::extract(repo_path);

    let mut dependencies = BTreeMap::new();
    for eco in &ecosystems {
        let parsed = match eco {
            Ecosystem::Python => python::dependencies(&files),
            Ecosystem::JavaScript => javascript::dependencies(&files),
            Ecosystem::Java => java::dependencies(&files),
            Ecosystem::DotNet => dotnet::dependencies(&files),
        };
        for (dep_name, version) in parsed {
            dependencies.insert((*eco, dep_name), version);
        }
    }

    RepoScan {
        url: url.to_string(),
        name: name.to_string(),
        ecosystems,
        license,
        description,
        dependencies,
    }
}

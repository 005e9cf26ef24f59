use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, String>,
}

/// Collect JavaScript dependencies from every package.json in the tree.
/// devDependencies override regular ones on name collisions.
pub fn dependencies(files: &[PathBuf]) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();

    for path in files
        .iter()
        .filter(|p| p.file_name().and_then(|n| n.to_str()) == Some("package.json"))
    {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Could not parse {}: {}", path.display(), e);
                continue;
            }
        };
        match serde_json::from_str::<PackageJson>(&content) {
            Ok(pkg) => {
                deps.extend(pkg.dependencies);
                deps.extend(pkg.dev_dependencies);
            }
            Err(e) => tracing::warn!("Could not parse {}: {}", path.display(), e),
        }
    }

    deps
}

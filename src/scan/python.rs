use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

/// Leading package name of a requirement string ("requests>=2.28" -> "requests").
fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.-]+").expect("invalid regex"))
}

/// Collect Python dependencies from every requirements.txt and
/// pyproject.toml in the tree. Versions are not pinned by name alone, so
/// everything resolves to "latest".
pub fn dependencies(files: &[PathBuf]) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();

    for path in files_named(files, "requirements.txt") {
        match std::fs::read_to_string(path) {
            Ok(content) => parse_requirements(&content, &mut deps),
            Err(e) => tracing::warn!("Could not parse {}: {}", path.display(), e),
        }
    }

    for path in files_named(files, "pyproject.toml") {
        match std::fs::read_to_string(path) {
            Ok(content) => parse_pyproject(&content, &mut deps),
            Err(e) => tracing::warn!("Could not parse {}: {}", path.display(), e),
        }
    }

    deps
}

fn files_named<'a>(files: &'a [PathBuf], name: &'a str) -> impl Iterator<Item = &'a PathBuf> {
    files
        .iter()
        .filter(move |p| p.file_name().and_then(|n| n.to_str()) == Some(name))
}

fn parse_requirements(content: &str, deps: &mut BTreeMap<String, String>) {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(m) = name_regex().find(line) {
            deps.insert(m.as_str().to_string(), "latest".to_string());
        }
    }
}

fn parse_pyproject(content: &str, deps: &mut BTreeMap<String, String>) {
    let value: toml::Value = match toml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Could not parse pyproject.toml: {}", e);
            return;
        }
    };
    // Poetry-style [tool.poetry.dependencies] table.
    if let Some(table) = value
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
    {
        for name in table.keys() {
            deps.insert(name.clone(), "latest".to_string());
        }
        return;
    }

    // PEP 621 [project] dependencies array of requirement strings.
    if let Some(array) = value
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        for entry in array {
            if let Some(req) = entry.as_str() {
                if let Some(m) = name_regex().find(req.trim()) {
                    deps.insert(m.as_str().to_string(), "latest".to_string());
                }
            }
        }
    }
}

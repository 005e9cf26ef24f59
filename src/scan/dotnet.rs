use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

static PACKAGE_REF_RE: OnceLock<Regex> = OnceLock::new();
static INCLUDE_RE: OnceLock<Regex> = OnceLock::new();
static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn package_ref_regex() -> &'static Regex {
    PACKAGE_REF_RE.get_or_init(|| Regex::new(r"<PackageReference\b([^>]*)>").expect("invalid regex"))
}

fn include_regex() -> &'static Regex {
    INCLUDE_RE.get_or_init(|| Regex::new(r#"Include="([^"]+)""#).expect("invalid regex"))
}

fn version_regex() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(r#"Version="([^"]+)""#).expect("invalid regex"))
}

/// Collect .NET dependencies from every *.csproj in the tree. Attributes are
/// matched independently, so Include/Version order does not matter.
pub fn dependencies(files: &[PathBuf]) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();

    for path in files
        .iter()
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csproj"))
    {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Could not parse {}: {}", path.display(), e);
                continue;
            }
        };
        for capture in package_ref_regex().captures_iter(&content) {
            let attrs = &capture[1];
            let include = include_regex().captures(attrs).map(|c| c[1].to_string());
            let version = version_regex().captures(attrs).map(|c| c[1].to_string());
            if let (Some(include), Some(version)) = (include, version) {
                deps.insert(include, version);
            }
        }
    }

    deps
}

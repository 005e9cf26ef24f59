use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

static POM_BLOCK_RE: OnceLock<Regex> = OnceLock::new();
static POM_GROUP_RE: OnceLock<Regex> = OnceLock::new();
static POM_ARTIFACT_RE: OnceLock<Regex> = OnceLock::new();
static POM_VERSION_RE: OnceLock<Regex> = OnceLock::new();
static GRADLE_RE: OnceLock<Regex> = OnceLock::new();

fn pom_block_regex() -> &'static Regex {
    POM_BLOCK_RE.get_or_init(|| Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("invalid regex"))
}

fn pom_group_regex() -> &'static Regex {
    POM_GROUP_RE.get_or_init(|| Regex::new(r"<groupId>\s*([^<]+?)\s*</groupId>").expect("invalid regex"))
}

fn pom_artifact_regex() -> &'static Regex {
    POM_ARTIFACT_RE
        .get_or_init(|| Regex::new(r"<artifactId>\s*([^<]+?)\s*</artifactId>").expect("invalid regex"))
}

fn pom_version_regex() -> &'static Regex {
    POM_VERSION_RE.get_or_init(|| Regex::new(r"<version>\s*([^<]+?)\s*</version>").expect("invalid regex"))
}

fn gradle_regex() -> &'static Regex {
    GRADLE_RE.get_or_init(|| {
        Regex::new(r#"(?:implementation|compile|api)\s*['"]([^'"]+)['"]"#).expect("invalid regex")
    })
}

/// Collect Java dependencies from every pom.xml and build.gradle in the
/// tree, keyed "groupId:artifactId".
pub fn dependencies(files: &[PathBuf]) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();

    for path in files_named(files, "pom.xml") {
        match std::fs::read_to_string(path) {
            Ok(content) => parse_pom(&content, &mut deps),
            Err(e) => tracing::warn!("Could not parse {}: {}", path.display(), e),
        }
    }

    for path in files_named(files, "build.gradle") {
        match std::fs::read_to_string(path) {
            Ok(content) => parse_gradle(&content, &mut deps),
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

fn parse_pom(content: &str, deps: &mut BTreeMap<String, String>) {
    for block in pom_block_regex().captures_iter(content) {
        let body = &block[1];
        let group = pom_group_regex().captures(body).map(|c| c[1].to_string());
        let artifact = pom_artifact_regex().captures(body).map(|c| c[1].to_string());
        let version = pom_version_regex()
            .captures(body)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "${project.version}".to_string());

        if let (Some(group), Some(artifact)) = (group, artifact) {
            deps.insert(format!("{}:{}", group, artifact), version);
        }
    }
}

fn parse_gradle(content: &str, deps: &mut BTreeMap<String, String>) {
    for capture in gradle_regex().captures_iter(content) {
        let coordinate = &capture[1];
        let parts: Vec<&str> = coordinate.split(':').collect();
        if parts.len() >= 2 {
            let name = format!("{}:{}", parts[0], parts[1]);
            let version = parts
                .get(2)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "latest".to_string());
            deps.insert(name, version);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(name: &str, content: &str) -> BTreeMap<String, String> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        dependencies(&[path])
    }

    #[test]
    fn test_pom_dependencies_with_and_without_version() {
        let deps = run(
            "pom.xml",
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-core</artifactId>
      <version>6.1.0</version>
    </dependency>
    <dependency>
      <groupId>com.acme</groupId>
      <artifactId>internal-lib</artifactId>
    </dependency>
  </dependencies>
</project>"#,
        );
        assert_eq!(deps["org.springframework:spring-core"], "6.1.0");
        assert_eq!(deps["com.acme:internal-lib"], "${project.version}");
    }

    #[test]
    fn test_gradle_coordinates() {
        let deps = run(
            "build.gradle",
            r#"
dependencies {
    implementation 'com.google.guava:guava:33.0.0-jre'
    api "org.slf4j:slf4j-api"
    compile 'junit:junit:4.13.2'
    testImplementation 'ignored:because:prefix'
}
"#,
        );
        assert_eq!(deps["com.google.guava:guava"], "33.0.0-jre");
        assert_eq!(deps["org.slf4j:slf4j-api"], "latest");
        assert_eq!(deps["junit:junit"], "4.13.2");
        // testImplementation still matches on the "implementation" suffix;
        // the original tool behaves the same way.
        assert!(deps.contains_key("ignored:because"));
    }

    #[test]
    fn test_malformed_pom_yields_nothing() {
        let deps = run("pom.xml", "<project><dependencies></project>");
        assert!(deps.is_empty());
    }
}

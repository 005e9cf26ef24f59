//! Pipeline-level contract tests for registry resolution: all four
//! ecosystems resolving through one mock server, and lookup caps from a
//! TOML profile being enforced.

use anyhow::Result;
use httpmock::prelude::*;
use repo_audit::config::toml_config::TomlConfig;
use repo_audit::{AuditEngine, AuditPipeline, GitFetcher, LocalStorage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_polyglot_repo(work_dir: &Path, name: &str) {
    let repo = work_dir.join(name);
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("requirements.txt"), "requests\n").unwrap();
    fs::write(
        repo.join("package.json"),
        r#"{"dependencies": {"express": "^4.18.0"}}"#,
    )
    .unwrap();
    fs::write(
        repo.join("pom.xml"),
        r#"<project>
  <dependencies>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>33.0.0-jre</version>
    </dependency>
  </dependencies>
</project>"#,
    )
    .unwrap();
    fs::write(
        repo.join("App.csproj"),
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="13.0.3" />
  </ItemGroup>
</Project>"#,
    )
    .unwrap();
}

fn profile(repos_file: &Path, output_dir: &Path, base: &str, extra: &str) -> TomlConfig {
    let content = format!(
        r#"
[profile]
name = "registry-contract"
description = "registry contract suite"
version = "1.0"

[source]
repos_file = "{repos}"
mapping_file = "unused_mapping.csv"

[source.registries]
pypi = "{base}"
npm = "{base}"
maven = "{base}"
nuget = "{base}"

{extra}

[load]
output_dir = "{output}"
"#,
        repos = repos_file.display(),
        base = base,
        output = output_dir.display(),
        extra = extra,
    );
    TomlConfig::from_toml_str(&content).unwrap()
}

#[tokio::test]
async fn test_all_four_ecosystems_resolve() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().join("work");
    let output_dir = temp_dir.path().join("reports");
    write_polyglot_repo(&work_dir, "polyglot");

    let repos_file = temp_dir.path().join("repos.txt");
    fs::write(&repos_file, "https://github.com/acme/polyglot\n")?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pypi/requests/json");
        then.status(200).json_body(serde_json::json!({
            "info": {"license": "Apache-2.0", "classifiers": [], "project_urls": null,
                     "home_page": "https://requests.readthedocs.io"}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/express");
        then.status(200)
            .json_body(serde_json::json!({"license": "MIT", "homepage": "https://expressjs.com"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/solrsearch/select");
        then.status(200)
            .json_body(serde_json::json!({"response": {"numFound": 3, "docs": [{}]}}));
    });
    let catalog_url = server.url("/catalog/newtonsoft.json.json");
    server.mock(|when, then| {
        when.method(GET)
            .path("/v3/registration5-semver1/newtonsoft.json/index.json");
        then.status(200).json_body(serde_json::json!({
            "items": [{"items": [{"catalogEntry": {"@id": catalog_url}}]}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/catalog/newtonsoft.json.json");
        then.status(200).json_body(serde_json::json!({
            "licenseExpression": "MIT", "projectUrl": "https://www.newtonsoft.com/json"
        }));
    });

    let config = profile(&repos_file, &output_dir, &server.base_url(), "");
    let storage = LocalStorage::new(output_dir.to_string_lossy().to_string());
    let pipeline = AuditPipeline::new(storage, config, GitFetcher, work_dir)?;
    let engine = AuditEngine::new_with_monitoring(pipeline, false);

    engine.run().await?;

    let csv = fs::read_to_string(output_dir.join("dependency_report.csv"))?;
    assert!(csv.contains("requests,python,latest,Apache-2.0,https://requests.readthedocs.io"));
    assert!(csv.contains("express,javascript,^4.18.0,MIT,https://expressjs.com"));
    assert!(csv.contains(
        "com.google.guava:guava,java,33.0.0-jre,See URL,\
         https://mvnrepository.com/artifact/com.google.guava/guava"
    ));
    assert!(csv.contains("Newtonsoft.Json,dotnet,13.0.3,MIT,https://www.newtonsoft.com/json"));

    // Maven's "See URL" counts as unresolved; it is the only template entry.
    let template = fs::read_to_string(output_dir.join("missing-dependency-mapping.csv"))?;
    assert!(template.contains("com.google.guava:guava,java"));
    assert!(!template.contains("requests"));
    assert!(!template.contains("express"));
    assert!(!template.contains("Newtonsoft.Json"));

    Ok(())
}

#[tokio::test]
async fn test_lookup_caps_from_profile_limit_registry_traffic() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().join("work");
    let output_dir = temp_dir.path().join("reports");

    let repo = work_dir.join("pile");
    fs::create_dir_all(&repo)?;
    fs::write(
        repo.join("requirements.txt"),
        "alpha\nbeta\ngamma\ndelta\nepsilon\n",
    )?;

    let repos_file = temp_dir.path().join("repos.txt");
    fs::write(&repos_file, "https://github.com/acme/pile\n")?;

    let server = MockServer::start();
    let pypi_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/pypi/");
        then.status(200).json_body(serde_json::json!({
            "info": {"license": "MIT", "classifiers": [], "project_urls": null,
                     "home_page": "https://example.com"}
        }));
    });

    let caps = "[extract.lookup_caps]\npython = 2\n";
    let config = profile(&repos_file, &output_dir, &server.base_url(), caps);
    let storage = LocalStorage::new(output_dir.to_string_lossy().to_string());
    let pipeline = AuditPipeline::new(storage, config, GitFetcher, work_dir)?;
    let engine = AuditEngine::new_with_monitoring(pipeline, false);

    engine.run().await?;

    // Only two of the five dependencies were allowed through.
    pypi_mock.assert_hits(2);

    let csv = fs::read_to_string(output_dir.join("dependency_report.csv"))?;
    assert!(csv.contains("alpha,python"));
    assert!(csv.contains("beta,python"));
    assert!(!csv.contains("gamma"));
    assert!(!csv.contains("delta"));
    assert!(!csv.contains("epsilon"));

    Ok(())
}

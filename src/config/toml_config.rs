use crate::core::ConfigProvider;
use crate::domain::model::{Ecosystem, RegistryEndpoints};
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Audit profile loaded from a TOML file. Anything not set falls back to the
/// same defaults the CLI uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub profile: ProfileInfo,
    pub source: SourceConfig,
    pub extract: Option<ExtractConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub repos_file: String,
    pub mapping_file: Option<String>,
    pub registries: Option<RegistriesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistriesConfig {
    pub pypi: Option<String>,
    pub npm: Option<String>,
    pub maven: Option<String>,
    pub nuget: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub concurrent_repos: Option<usize>,
    pub concurrent_requests: Option<usize>,
    /// Per-ecosystem registry lookup caps, keyed "python", "javascript", ...
    pub lookup_caps: Option<HashMap<String, usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_dir: String,
    pub archive: Option<bool>,
    pub keep_work_dir: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

const DEFAULT_MAPPING_FILE: &str = "dependency_mapping.csv";

impl TomlConfig {
    /// Load a profile from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse a profile from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values. Unset
    /// variables are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("invalid regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("source.repos_file", &self.source.repos_file)?;
        validation::validate_path("load.output_dir", &self.load.output_dir)?;

        if let Some(extract) = &self.extract {
            if let Some(concurrent) = extract.concurrent_repos {
                validation::validate_positive_number("extract.concurrent_repos", concurrent, 1)?;
            }
            if let Some(concurrent) = extract.concurrent_requests {
                validation::validate_positive_number(
                    "extract.concurrent_requests",
                    concurrent,
                    1,
                )?;
            }
            if let Some(caps) = &extract.lookup_caps {
                for key in caps.keys() {
                    if Ecosystem::from_key(key).is_none() {
                        return Err(AuditError::InvalidConfigValueError {
                            field: "extract.lookup_caps".to_string(),
                            value: key.clone(),
                            reason: "Unknown ecosystem (expected python, javascript, java or dotnet)"
                                .to_string(),
                        });
                    }
                }
            }
        }

        if let Some(registries) = &self.source.registries {
            for (field, value) in [
                ("source.registries.pypi", &registries.pypi),
                ("source.registries.npm", &registries.npm),
                ("source.registries.maven", &registries.maven),
                ("source.registries.nuget", &registries.nuget),
            ] {
                if let Some(url) = value {
                    validation::validate_url(field, url)?;
                }
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn repos_file(&self) -> &str {
        &self.source.repos_file
    }

    fn mapping_file(&self) -> &str {
        self.source
            .mapping_file
            .as_deref()
            .unwrap_or(DEFAULT_MAPPING_FILE)
    }

    fn output_dir(&self) -> &str {
        &self.load.output_dir
    }

    fn concurrent_repos(&self) -> usize {
        self.extract
            .as_ref()
            .and_then(|e| e.concurrent_repos)
            .unwrap_or(5)
    }

    fn concurrent_requests(&self) -> usize {
        self.extract
            .as_ref()
            .and_then(|e| e.concurrent_requests)
            .unwrap_or(10)
    }

    fn lookup_cap(&self, ecosystem: Ecosystem) -> usize {
        self.extract
            .as_ref()
            .and_then(|e| e.lookup_caps.as_ref())
            .and_then(|caps| caps.get(ecosystem.key()).copied())
            .unwrap_or_else(|| ecosystem.default_lookup_cap())
    }

    fn registry_endpoints(&self) -> RegistryEndpoints {
        let defaults = RegistryEndpoints::default();
        match &self.source.registries {
            Some(registries) => RegistryEndpoints {
                pypi: registries.pypi.clone().unwrap_or(defaults.pypi),
                npm: registries.npm.clone().unwrap_or(defaults.npm),
                maven: registries.maven.clone().unwrap_or(defaults.maven),
                nuget: registries.nuget.clone().unwrap_or(defaults.nuget),
            },
            None => defaults,
        }
    }

    fn archive_reports(&self) -> bool {
        self.load.archive.unwrap_or(false)
    }

    fn keep_work_dir(&self) -> bool {
        self.load.keep_work_dir.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_profile() {
        let toml_content = r#"
[profile]
name = "nightly-audit"
description = "Nightly license audit"
version = "1.0.0"

[source]
repos_file = "repos.txt"

[extract]
concurrent_repos = 3

[extract.lookup_caps]
python = 10
javascript = 40

[load]
output_dir = "./reports"
archive = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.profile.name, "nightly-audit");
        assert_eq!(config.repos_file(), "repos.txt");
        assert_eq!(config.mapping_file(), "dependency_mapping.csv");
        assert_eq!(config.concurrent_repos(), 3);
        assert_eq!(config.concurrent_requests(), 10);
        assert_eq!(config.lookup_cap(Ecosystem::Python), 10);
        assert_eq!(config.lookup_cap(Ecosystem::JavaScript), 40);
        assert_eq!(config.lookup_cap(Ecosystem::Java), 25);
        assert!(config.archive_reports());
        assert!(!config.keep_work_dir());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_overrides_merge_with_defaults() {
        let toml_content = r#"
[profile]
name = "test"
description = "test"
version = "1.0"

[source]
repos_file = "repos.txt"

[source.registries]
pypi = "http://localhost:9900"

[load]
output_dir = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let endpoints = config.registry_endpoints();
        assert_eq!(endpoints.pypi, "http://localhost:9900");
        assert_eq!(endpoints.npm, "https://registry.npmjs.org");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AUDIT_TEST_REPOS", "custom-repos.txt");

        let toml_content = r#"
[profile]
name = "test"
description = "test"
version = "1.0"

[source]
repos_file = "${AUDIT_TEST_REPOS}"

[load]
output_dir = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.repos_file(), "custom-repos.txt");

        std::env::remove_var("AUDIT_TEST_REPOS");
    }

    #[test]
    fn test_unknown_lookup_cap_ecosystem_is_rejected() {
        let toml_content = r#"
[profile]
name = "test"
description = "test"
version = "1.0"

[source]
repos_file = "repos.txt"

[extract.lookup_caps]
cobol = 5

[load]
output_dir = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_registry_url_is_rejected() {
        let toml_content = r#"
[profile]
name = "test"
description = "test"
version = "1.0"

[source]
repos_file = "repos.txt"

[source.registries]
npm = "not a url"

[load]
output_dir = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_profile_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[profile]
name = "file-test"
description = "File test"
version = "1.0"

[source]
repos_file = "repos.txt"

[load]
output_dir = "./reports"

[monitoring]
enabled = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.profile.name, "file-test");
        assert!(config.monitoring_enabled());
    }
}

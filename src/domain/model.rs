use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Package ecosystems the scanner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Python,
    JavaScript,
    Java,
    DotNet,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 4] = [
        Ecosystem::Python,
        Ecosystem::JavaScript,
        Ecosystem::Java,
        Ecosystem::DotNet,
    ];

    /// Key used in the mapping file and TOML config ("python", "javascript", ...).
    pub fn key(&self) -> &'static str {
        match self {
            Ecosystem::Python => "python",
            Ecosystem::JavaScript => "javascript",
            Ecosystem::Java => "java",
            Ecosystem::DotNet => "dotnet",
        }
    }

    pub fn from_key(key: &str) -> Option<Ecosystem> {
        match key {
            "python" => Some(Ecosystem::Python),
            "javascript" => Some(Ecosystem::JavaScript),
            "java" => Some(Ecosystem::Java),
            "dotnet" => Some(Ecosystem::DotNet),
            _ => None,
        }
    }

    /// Default cap on registry lookups per repository.
    pub fn default_lookup_cap(&self) -> usize {
        match self {
            Ecosystem::JavaScript => 50,
            Ecosystem::Python | Ecosystem::Java | Ecosystem::DotNet => 25,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a dependency's license information came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseSource {
    Registry,
    Mapping,
    Unresolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    pub license: String,
    pub url: String,
    pub source: LicenseSource,
}

impl Dependency {
    /// License string as rendered in reports. Mapping-file overrides carry a
    /// `!` marker so readers can tell them from registry answers.
    pub fn license_cell(&self) -> String {
        match self.source {
            LicenseSource::Mapping => format!("! {}", self.license),
            _ => self.license.clone(),
        }
    }

    /// True when the license or documentation URL still needs manual mapping.
    pub fn is_unresolved(&self) -> bool {
        if self.source == LicenseSource::Mapping {
            return false;
        }
        matches!(self.license.as_str(), "Unknown" | "See URL" | "" | "Lookup Failed")
            || self.url.is_empty()
    }
}

/// Raw scan of one cloned repository, before license resolution.
#[derive(Debug, Clone)]
pub struct RepoScan {
    pub url: String,
    pub name: String,
    pub ecosystems: Vec<Ecosystem>,
    pub license: String,
    pub description: String,
    /// (ecosystem, package name) -> requested version. BTreeMap keeps the
    /// resolution order deterministic.
    pub dependencies: BTreeMap<(Ecosystem, String), String>,
}

#[derive(Debug, Clone)]
pub struct RepoReport {
    pub url: String,
    pub name: String,
    pub license: String,
    pub description: String,
    pub ecosystems: Vec<Ecosystem>,
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone)]
pub struct FailedRepo {
    pub url: String,
    pub reason: String,
}

/// Extract-stage output: successfully scanned repos plus clone/scan failures.
#[derive(Debug, Clone)]
pub struct ExtractBatch {
    pub scans: Vec<RepoScan>,
    pub failed: Vec<FailedRepo>,
}

/// Transform-stage output.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub reports: Vec<RepoReport>,
    pub failed: Vec<FailedRepo>,
}

/// Base URLs for the package registries. Tests point these at a mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEndpoints {
    pub pypi: String,
    pub npm: String,
    pub maven: String,
    pub nuget: String,
}

impl Default for RegistryEndpoints {
    fn default() -> Self {
        Self {
            pypi: "https://pypi.org".to_string(),
            npm: "https://registry.npmjs.org".to_string(),
            maven: "https://search.maven.org".to_string(),
            nuget: "https://api.nuget.org".to_string(),
        }
    }
}

/// Derive a repository name from its URL: last path segment, trailing slash
/// and `.git` suffix stripped.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next()?;
    let name = segment.trim_end_matches(".git");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{Ecosystem, RegistryEndpoints};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "repo-audit")]
#[command(about = "Audit Git repositories for dependency licenses")]
pub struct CliConfig {
    /// File listing repository URLs, one per line
    #[arg(long, default_value = "repos.txt")]
    pub repos_file: String,

    /// Manual license mapping CSV
    #[arg(long, default_value = "dependency_mapping.csv")]
    pub mapping_file: String,

    /// Directory the report files are written to
    #[arg(long, default_value = "./reports")]
    pub output_dir: String,

    /// How many repositories are cloned and scanned at once
    #[arg(long, default_value_t = 5)]
    pub concurrent_repos: usize,

    /// How many registry requests may be in flight at once
    #[arg(long, default_value_t = 10)]
    pub concurrent_requests: usize,

    /// TOML audit profile; CLI flags override it where given
    #[arg(long)]
    pub config: Option<String>,

    /// Bundle the reports into a single ZIP archive
    #[arg(long)]
    pub archive: bool,

    /// Keep the scratch clone directory after the run
    #[arg(long)]
    pub keep_work_dir: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Log process CPU/memory usage per stage
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn repos_file(&self) -> &str {
        &self.repos_file
    }

    fn mapping_file(&self) -> &str {
        &self.mapping_file
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn concurrent_repos(&self) -> usize {
        self.concurrent_repos
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn lookup_cap(&self, ecosystem: Ecosystem) -> usize {
        ecosystem.default_lookup_cap()
    }

    fn registry_endpoints(&self) -> RegistryEndpoints {
        RegistryEndpoints::default()
    }

    fn archive_reports(&self) -> bool {
        self.archive
    }

    fn keep_work_dir(&self) -> bool {
        self.keep_work_dir
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("repos_file", &self.repos_file)?;
        validation::validate_non_empty_string("mapping_file", &self.mapping_file)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_positive_number("concurrent_repos", self.concurrent_repos, 1)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        Ok(())
    }
}

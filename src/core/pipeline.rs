use crate::domain::model::{
    repo_name_from_url, AuditOutcome, Dependency, Ecosystem, ExtractBatch, FailedRepo,
    LicenseSource, RepoReport, RepoScan,
};
use crate::domain::ports::{ConfigProvider, Pipeline, RepoFetcher, Storage};
use crate::mapping::MappingTable;
use crate::registry::RegistryClient;
use crate::report;
use crate::scan;
use crate::utils::error::{AuditError, Result};
use futures::future::join_all;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::Semaphore;
use zip::write::{FileOptions, ZipWriter};

pub struct AuditPipeline<S: Storage, C: ConfigProvider, F: RepoFetcher> {
    storage: S,
    config: C,
    fetcher: F,
    registry: RegistryClient,
    mapping: MappingTable,
    work_dir: PathBuf,
}

impl<S: Storage, C: ConfigProvider, F: RepoFetcher> AuditPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fetcher: F, work_dir: PathBuf) -> Result<Self> {
        let registry =
            RegistryClient::new(config.registry_endpoints(), config.concurrent_requests())?;
        let mapping = MappingTable::load(config.mapping_file())?;
        Ok(Self {
            storage,
            config,
            fetcher,
            registry,
            mapping,
            work_dir,
        })
    }

    async fn clone_and_scan(&self, url: &str, semaphore: &Semaphore) -> Result<RepoScan> {
        let _permit = semaphore
            .acquire()
            .await
            .map_err(|_| AuditError::ProcessingError {
                message: "repository semaphore closed".to_string(),
            })?;
        let name = repo_name_from_url(url).ok_or_else(|| AuditError::ProcessingError {
            message: format!("cannot derive a repository name from '{}'", url),
        })?;
        let target = self.work_dir.join(&name);

        tracing::info!("[{}] Cloning...", name);
        self.fetcher.fetch(url, &target).await?;

        tracing::info!("[{}] Scanning files...", name);
        let scan = scan::scan_repository(url, &name, &target);
        tracing::info!(
            "[{}] Found {} unique dependencies",
            name,
            scan.dependencies.len()
        );
        Ok(scan)
    }

    /// Resolve licenses for one scanned repository: mapping-file overrides
    /// first, then registry lookups, bounded per ecosystem. Once an
    /// ecosystem's cap is reached its remaining dependencies are skipped for
    /// this run.
    async fn resolve_licenses(&self, scan: RepoScan) -> RepoReport {
        let mut dependencies = Vec::new();
        let mut pending: Vec<(String, String, Ecosystem)> = Vec::new();
        let mut lookups_by_ecosystem: HashMap<Ecosystem, usize> = HashMap::new();

        for ((ecosystem, name), version) in &scan.dependencies {
            let used = lookups_by_ecosystem.entry(*ecosystem).or_insert(0);
            if *used >= self.config.lookup_cap(*ecosystem) {
                tracing::debug!(
                    "[{}] Lookup cap reached for {}, skipping {}",
                    scan.name,
                    ecosystem,
                    name
                );
                continue;
            }
            if let Some(entry) = self.mapping.get(*ecosystem, name) {
                dependencies.push(Dependency {
                    name: name.clone(),
                    version: if entry.version.is_empty() {
                        version.clone()
                    } else {
                        entry.version.clone()
                    },
                    ecosystem: *ecosystem,
                    license: if entry.license.is_empty() {
                        "Unknown".to_string()
                    } else {
                        entry.license.clone()
                    },
                    url: entry.documentation_url.clone(),
                    source: LicenseSource::Mapping,
                });
            } else {
                *used += 1;
                pending.push((name.clone(), version.clone(), *ecosystem));
            }
        }

        if !pending.is_empty() {
            tracing::info!(
                "[{}] Fetching info for {} dependencies...",
                scan.name,
                pending.len()
            );
        }
        let results = join_all(
            pending
                .iter()
                .map(|(name, _, ecosystem)| self.registry.lookup(*ecosystem, name)),
        )
        .await;
        for ((name, version, ecosystem), (license, url)) in pending.into_iter().zip(results) {
            let source = if license == "Lookup Failed" {
                LicenseSource::Unresolved
            } else {
                LicenseSource::Registry
            };
            dependencies.push(Dependency {
                name,
                version,
                ecosystem,
                license,
                url,
                source,
            });
        }

        tracing::info!("[{}] Analysis complete.", scan.name);
        RepoReport {
            url: scan.url,
            name: scan.name,
            license: scan.license,
            description: scan.description,
            ecosystems: scan.ecosystems,
            dependencies,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: RepoFetcher> Pipeline for AuditPipeline<S, C, F> {
    async fn extract(&self) -> Result<ExtractBatch> {
        let repos = load_repositories(self.config.repos_file())?;
        tracing::info!(
            "Auditing {} repositories from {}",
            repos.len(),
            self.config.repos_file()
        );

        let semaphore = Semaphore::new(self.config.concurrent_repos().max(1));
        let results = join_all(
            repos
                .iter()
                .map(|url| self.clone_and_scan(url, &semaphore)),
        )
        .await;

        let mut scans = Vec::new();
        let mut failed = Vec::new();
        for (url, result) in repos.into_iter().zip(results) {
            match result {
                Ok(scan) => scans.push(scan),
                Err(e) => {
                    tracing::error!("Analysis failed for {}: {}", url, e);
                    failed.push(FailedRepo {
                        url,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(ExtractBatch { scans, failed })
    }

    async fn transform(&self, batch: ExtractBatch) -> Result<AuditOutcome> {
        let ExtractBatch { scans, failed } = batch;
        let mut reports = Vec::with_capacity(scans.len());
        for scan in scans {
            reports.push(self.resolve_licenses(scan).await);
        }
        Ok(AuditOutcome { reports, failed })
    }

    async fn load(&self, outcome: AuditOutcome) -> Result<String> {
        let AuditOutcome { reports, failed } = outcome;

        let csv_bytes = report::csv::render(&reports)?;
        let markdown = report::markdown::render(&reports, chrono::Local::now());
        let missing = report::missing::collect(&reports);

        let output_path = if self.config.archive_reports() {
            let zip_bytes = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                zip.start_file::<_, ()>(report::CSV_REPORT_FILE, FileOptions::default())?;
                zip.write_all(&csv_bytes)?;
                zip.start_file::<_, ()>(report::MD_REPORT_FILE, FileOptions::default())?;
                zip.write_all(markdown.as_bytes())?;
                if !missing.is_empty() {
                    zip.start_file::<_, ()>(report::MISSING_MAPPING_FILE, FileOptions::default())?;
                    zip.write_all(&report::missing::render(&missing)?)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };
            self.storage
                .write_file(report::ARCHIVE_FILE, &zip_bytes)
                .await?;
            format!("{}/{}", self.config.output_dir(), report::ARCHIVE_FILE)
        } else {
            self.storage
                .write_file(report::CSV_REPORT_FILE, &csv_bytes)
                .await?;
            self.storage
                .write_file(report::MD_REPORT_FILE, markdown.as_bytes())
                .await?;
            if !missing.is_empty() {
                self.storage
                    .write_file(
                        report::MISSING_MAPPING_FILE,
                        &report::missing::render(&missing)?,
                    )
                    .await?;
            }
            self.config.output_dir().to_string()
        };

        if !missing.is_empty() {
            tracing::info!(
                "Found {} dependencies with missing info. Fill out `{}` and rename it to your mapping file for the next run.",
                missing.len(),
                report::MISSING_MAPPING_FILE
            );
        }
        for repo in &failed {
            tracing::warn!("Repository failed to process: {} ({})", repo.url, repo.reason);
        }

        Ok(output_path)
    }
}

/// Load repository URLs, one per line; blank lines and `#` comments skipped.
fn load_repositories(path: &str) -> Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).map_err(|_| AuditError::MissingConfigError {
            field: format!("repos file '{}' (one repository URL per line)", path),
        })?;
    let repos: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();
    if repos.is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: "repos file".to_string(),
            value: path.to_string(),
            reason: "no repository URLs found".to_string(),
        });
    }
    Ok(repos)
}

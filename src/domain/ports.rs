use crate::domain::model::{AuditOutcome, Ecosystem, ExtractBatch, RegistryEndpoints};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn repos_file(&self) -> &str;
    fn mapping_file(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn concurrent_repos(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
    fn lookup_cap(&self, ecosystem: Ecosystem) -> usize;
    fn registry_endpoints(&self) -> RegistryEndpoints;
    fn archive_reports(&self) -> bool;
    fn keep_work_dir(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractBatch>;
    async fn transform(&self, batch: ExtractBatch) -> Result<AuditOutcome>;
    async fn load(&self, outcome: AuditOutcome) -> Result<String>;
}

/// Seam for obtaining a repository working tree. The production impl shells
/// out to `git`; tests drop fixture files into the target instead.
#[async_trait]
pub trait RepoFetcher: Send + Sync {
    async fn fetch(&self, url: &str, target: &Path) -> Result<()>;
}

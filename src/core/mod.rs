pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    AuditOutcome, Dependency, Ecosystem, ExtractBatch, FailedRepo, LicenseSource, RepoReport,
    RepoScan,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RepoFetcher, Storage};
pub use crate::utils::error::Result;

pub mod config;
pub mod core;
pub mod domain;
pub mod fetch;
pub mod mapping;
pub mod registry;
pub mod report;
pub mod scan;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalStorage;

pub use crate::core::{engine::AuditEngine, pipeline::AuditPipeline};
pub use fetch::{GitFetcher, WorkDir};
pub use utils::error::{AuditError, Result};

//! Repository fetching: shallow git clones into a per-run scratch directory.

use crate::domain::ports::RepoFetcher;
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Clones with `git clone --depth=1`. A target directory that already exists
/// counts as cloned, so cached work dirs and test fixtures skip git entirely.
pub struct GitFetcher;

#[async_trait]
impl RepoFetcher for GitFetcher {
    async fn fetch(&self, url: &str, target: &Path) -> Result<()> {
        if target.exists() {
            tracing::debug!("Reusing existing clone at {}", target.display());
            return Ok(());
        }

        let output = Command::new("git")
            .arg("clone")
            .arg("--depth=1")
            .arg(url)
            .arg(target)
            .output()
            .await
            .map_err(|e| AuditError::CloneError {
                url: url.to_string(),
                message: format!("could not run git: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuditError::CloneError {
                url: url.to_string(),
                message: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Scratch directory for clones. Ephemeral dirs are removed when the run
/// finishes; `--keep-work-dir` switches to a plain directory that survives.
pub enum WorkDir {
    Ephemeral(tempfile::TempDir),
    Kept(PathBuf),
}

impl WorkDir {
    pub fn create(keep: bool) -> Result<Self> {
        if keep {
            let path = std::env::temp_dir().join(format!("repo_audit_{}", std::process::id()));
            std::fs::create_dir_all(&path)?;
            Ok(WorkDir::Kept(path))
        } else {
            let dir = tempfile::Builder::new().prefix("repo_audit_").tempdir()?;
            Ok(WorkDir::Ephemeral(dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            WorkDir::Ephemeral(dir) => dir.path(),
            WorkDir::Kept(path) => path,
        }
    }

    /// Remove an ephemeral dir, logging instead of failing: a stuck file
    /// should never turn a finished audit into an error.
    pub fn cleanup(self) {
        match self {
            WorkDir::Ephemeral(dir) => {
                let path = dir.path().to_path_buf();
                if let Err(e) = dir.close() {
                    tracing::warn!(
                        "Could not remove work dir {}: {}. Please delete it manually.",
                        path.display(),
                        e
                    );
                }
            }
            WorkDir::Kept(path) => {
                tracing::info!("Work dir kept at {}", path.display());
            }
        }
    }
}

//! Per-job workspace directories and the URLs they are served under

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// File name of the job record inside each workspace
pub const MANIFEST_FILE: &str = "manifest.json";

/// Root directory that holds one sub-directory per job
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    base_path: PathBuf,
    url_prefix: String,
}

impl WorkspaceRoot {
    /// Create a new workspace root
    pub fn new(base_path: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            base_path: base_path.into(),
            url_prefix: format!("/{}", url_prefix.trim_matches('/')),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// URL prefix with a leading and no trailing slash, e.g. `/outputs`
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Ensure the root directory exists
    pub async fn ensure_root(&self) -> Result<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).await?;
            debug!(path = ?self.base_path, "Created workspace root");
        }
        Ok(())
    }

    /// Allocate a fresh workspace under a random job id
    pub async fn create_job(&self) -> Result<JobWorkspace> {
        self.ensure_root().await?;

        let job_id = Uuid::new_v4().simple().to_string();
        let dir = self.base_path.join(&job_id);
        // create_dir (not create_dir_all) so an id collision surfaces as an error
        fs::create_dir(&dir).await?;
        debug!(job_id = %job_id, path = ?dir, "Created job workspace");

        Ok(JobWorkspace {
            url_base: format!("{}/{}", self.url_prefix, job_id),
            job_id,
            dir,
        })
    }

    /// Directory of an existing job, if the id is well formed and present
    pub fn job_dir(&self, job_id: &str) -> Option<PathBuf> {
        if !is_valid_job_id(job_id) {
            return None;
        }
        let dir = self.base_path.join(job_id);
        dir.is_dir().then_some(dir)
    }

    /// Read a JSON document from an existing job's workspace
    pub async fn read_json<T: DeserializeOwned>(&self, job_id: &str, name: &str) -> Result<T> {
        let dir = self
            .job_dir(job_id)
            .ok_or_else(|| AppError::NotFound(format!("job '{}'", job_id)))?;

        let data = match fs::read(dir.join(name)).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("{} for job '{}'", name, job_id)))
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        Ok(serde_json::from_slice(&data)?)
    }
}

/// A single job's directory
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    job_id: String,
    dir: PathBuf,
    url_base: String,
}

impl JobWorkspace {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filesystem path of a file in this workspace
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Public URL of a file in this workspace
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.url_base, name)
    }

    /// Write a file and return its URL
    ///
    /// Data goes to a temporary name first and is renamed into place, so a
    /// failed write never leaves a truncated file under the final name.
    pub async fn write_file(&self, name: &str, data: &[u8]) -> Result<String> {
        let final_path = self.path_for(name);
        let tmp_path = self.path_for(&format!(".{}.part", name));

        fs::write(&tmp_path, data).await?;
        fs::rename(&tmp_path, &final_path).await?;

        debug!(path = ?final_path, size = data.len(), "Saved workspace file");
        Ok(self.url_for(name))
    }

    /// Serialize `value` as pretty JSON into the workspace
    pub async fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<String> {
        let data = serde_json::to_vec_pretty(value)?;
        self.write_file(name, &data).await
    }
}

/// Name of the stored copy of the `n`-th input (1-based)
pub fn input_file_name(n: usize) -> String {
    format!("in_{}.jpg", n)
}

/// Name of the `n`-th annotated output (1-based)
pub fn annotated_file_name(n: usize) -> String {
    format!("annotated_{}.jpg", n)
}

/// Job ids are 32 lowercase hex characters
pub fn is_valid_job_id(job_id: &str) -> bool {
    job_id.len() == 32
        && job_id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

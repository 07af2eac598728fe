//! Optional background removal of old job workspaces

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::storage::workspace::is_valid_job_id;

/// Deletes job workspaces older than a maximum age
pub struct RetentionSweeper {
    root: PathBuf,
    max_age: Duration,
    sweep_task: RwLock<Option<JoinHandle<()>>>,
}

impl RetentionSweeper {
    /// Create a new sweeper
    pub fn new(root: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            root: root.into(),
            max_age,
            sweep_task: RwLock::new(None),
        }
    }

    /// Remove every job directory whose modification time is older than the limit
    ///
    /// Entries that are not job directories are left alone.
    pub async fn sweep_once(&self) -> Result<usize> {
        sweep(&self.root, self.max_age).await
    }

    /// Start the periodic sweep background task
    pub async fn start(&self, interval_secs: u64) {
        let root = self.root.clone();
        let max_age = self.max_age;
        let interval = Duration::from_secs(interval_secs.max(1));

        let handle = tokio::spawn(async move {
            loop {
                match sweep(&root, max_age).await {
                    Ok(0) => debug!("Retention sweep found nothing to delete"),
                    Ok(deleted) => info!(deleted, "Retention sweep removed old workspaces"),
                    Err(e) => warn!(error = %e, "Retention sweep failed"),
                }
                tokio::time::sleep(interval).await;
            }
        });

        *self.sweep_task.write().await = Some(handle);
        info!(
            interval_secs = interval.as_secs(),
            max_age_secs = max_age.as_secs(),
            "Started workspace retention task"
        );
    }

    /// Stop the background task
    pub async fn stop(&self) {
        if let Some(handle) = self.sweep_task.write().await.take() {
            handle.abort();
            info!("Stopped workspace retention task");
        }
    }
}

async fn sweep(root: &Path, max_age: Duration) -> Result<usize> {
    if !root.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let mut deleted = 0;
    let mut entries = fs::read_dir(root).await?;

    while let Some(entry) = entries.next_entry().await? {
        let is_job = entry
            .file_name()
            .to_str()
            .map(is_valid_job_id)
            .unwrap_or(false);
        if !is_job {
            continue;
        }

        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }

        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .map(|age| age > max_age)
            .unwrap_or(false);

        if expired {
            match fs::remove_dir_all(entry.path()).await {
                Ok(()) => {
                    deleted += 1;
                    debug!(path = ?entry.path(), "Deleted expired workspace");
                }
                Err(e) => warn!(path = ?entry.path(), error = %e, "Failed to delete workspace"),
            }
        }
    }

    Ok(deleted)
}

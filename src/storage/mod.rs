//! Storage module - job workspaces and retention

pub mod retention;
pub mod workspace;

pub use retention::RetentionSweeper;
pub use workspace::{
    annotated_file_name, input_file_name, is_valid_job_id, JobWorkspace, WorkspaceRoot,
    MANIFEST_FILE,
};

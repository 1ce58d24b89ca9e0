use super::SyncStage;
use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(
        "'{}' is not a git repository. Initialize it first with:\n  git init\n  git remote add origin <your-repo-url>",
        .0.display()
    )]
    NotARepository(PathBuf),
    #[error("Git executable '{0}' not found. Install git to continue.")]
    GitNotInstalled(String),
    #[error("`git {stage}` failed with code {code:?}: {stderr}")]
    CommandFailure {
        stage: SyncStage,
        code: Option<i32>,
        stderr: String,
    },
    #[error("`git {stage}` did not finish within {}s", .timeout.as_secs_f32())]
    Timeout { stage: SyncStage, timeout: Duration },
    #[error("Failed to execute git: {0}")]
    Io(#[from] io::Error),
}

impl SyncError {
    /// The step that failed, if the failure happened while running git.
    pub fn stage(&self) -> Option<SyncStage> {
        match self {
            SyncError::CommandFailure { stage, .. } | SyncError::Timeout { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }
}

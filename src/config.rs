use crate::git::{DEFAULT_GIT_TIMEOUT, SyncService};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.yaml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{}': {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse settings file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_yaml::Error),
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("Unable to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Editor settings: env vars > settings file > defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Project directory holding `data/`, `assets/` and `.git`. Defaults to the working directory.
    pub root: Option<PathBuf>,
    /// Git executable, `git` from PATH when unset.
    pub git: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    /// Seconds each git step may run; 0 disables the limit.
    pub git_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl Settings {
    /// Reads `settings.yaml` from the user config directory, then applies
    /// `.env` and `BITEBABE_*` overrides.
    pub fn load() -> SettingsResult<Self> {
        let _ = dotenvy::dotenv();

        let mut settings = match default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let payload =
            fs::read_to_string(path).map_err(|e| SettingsError::Read(path.to_path_buf(), e))?;
        if payload.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&payload).map_err(|e| SettingsError::Parse(path.to_path_buf(), e))
    }

    fn apply_env(&mut self) -> SettingsResult<()> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, var: F) -> SettingsResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = var("BITEBABE_ROOT") {
            self.root = Some(PathBuf::from(root));
        }
        if let Some(git) = var("BITEBABE_GIT") {
            self.git = Some(git);
        }
        if let Some(remote) = var("BITEBABE_REMOTE") {
            self.remote = Some(remote);
        }
        if let Some(branch) = var("BITEBABE_BRANCH") {
            self.branch = Some(branch);
        }
        if let Some(value) = var("BITEBABE_GIT_TIMEOUT") {
            let secs = value.trim().parse().map_err(|_| SettingsError::InvalidEnv {
                name: "BITEBABE_GIT_TIMEOUT",
                value,
            })?;
            self.git_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn project_root(&self) -> SettingsResult<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => env::current_dir().map_err(SettingsError::CurrentDir),
        }
    }

    pub fn git_timeout(&self) -> Option<Duration> {
        match self.git_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_GIT_TIMEOUT),
        }
    }

    pub fn sync_service(&self, root: &Path) -> SyncService {
        let service = SyncService::new(root)
            .with_remote(self.remote.clone(), self.branch.clone())
            .with_timeout(self.git_timeout());

        match &self.git {
            Some(program) => service.with_program(program),
            None => service,
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "bitebabe", "bitebabe").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

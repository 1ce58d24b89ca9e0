use super::run::{RunOutcome, run};
use super::{SyncError, SyncResult};
use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Staging,
    Committing,
    Pushing,
}

impl SyncStage {
    pub const ALL: [SyncStage; 3] = [SyncStage::Staging, SyncStage::Committing, SyncStage::Pushing];

    pub fn describe(self) -> &'static str {
        match self {
            SyncStage::Staging => "Staging changes",
            SyncStage::Committing => "Committing",
            SyncStage::Pushing => "Pushing to remote",
        }
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncStage::Staging => "add",
            SyncStage::Committing => "commit",
            SyncStage::Pushing => "push",
        })
    }
}

/// Commits the project directory and pushes it with the `git` command line.
#[derive(Debug, Clone)]
pub struct SyncService {
    root: PathBuf,
    program: OsString,
    remote: Option<String>,
    branch: Option<String>,
    timeout: Option<Duration>,
}

impl SyncService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            program: OsString::from("git"),
            remote: None,
            branch: None,
            timeout: Some(DEFAULT_GIT_TIMEOUT),
        }
    }

    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Push target. Without a remote, `git push` uses the branch's upstream.
    pub fn with_remote(mut self, remote: Option<String>, branch: Option<String>) -> Self {
        self.remote = remote;
        self.branch = branch;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_repository(&self) -> bool {
        self.root.join(".git").exists()
    }

    pub fn commit_and_push(&self, description: &str) -> SyncResult<()> {
        self.commit_and_push_with(description, |_| {})
    }

    /// Runs add, commit and push in order and stops at the first failure.
    /// `on_stage` is called before each step starts.
    pub fn commit_and_push_with<F>(&self, description: &str, mut on_stage: F) -> SyncResult<()>
    where
        F: FnMut(SyncStage),
    {
        if !self.is_repository() {
            return Err(SyncError::NotARepository(self.root.clone()));
        }

        let message = format!("Update {description} from BiteBabe Admin");

        for stage in SyncStage::ALL {
            on_stage(stage);
            self.git(stage, &self.args(stage, &message))?;
        }

        tracing::info!(root = %self.root.display(), %message, "changes pushed");
        Ok(())
    }

    fn args(&self, stage: SyncStage, message: &str) -> Vec<String> {
        match stage {
            SyncStage::Staging => vec!["add".into(), ".".into()],
            SyncStage::Committing => vec!["commit".into(), "-m".into(), message.into()],
            SyncStage::Pushing => {
                let mut args = vec!["push".to_string()];
                if let Some(remote) = &self.remote {
                    args.push(remote.clone());
                    args.extend(self.branch.clone());
                }
                args
            }
        }
    }

    fn git(&self, stage: SyncStage, args: &[String]) -> SyncResult<()> {
        tracing::debug!(?args, cwd = %self.root.display(), "running git");

        let outcome = run(&self.program, &self.root, args, self.timeout).map_err(|err| {
            match err.kind() {
                io::ErrorKind::NotFound => SyncError::GitNotInstalled(display(&self.program)),
                _ => SyncError::Io(err),
            }
        })?;

        match outcome {
            RunOutcome::Finished { status, .. } if status.success() => Ok(()),
            RunOutcome::Finished {
                status,
                stdout,
                stderr,
            } => {
                let err = SyncError::CommandFailure {
                    stage,
                    code: status.code(),
                    stderr: diagnostic(&stderr, &stdout),
                };
                tracing::warn!(error = %err, "git step failed");
                Err(err)
            }
            RunOutcome::TimedOut => Err(SyncError::Timeout {
                stage,
                timeout: self.timeout.unwrap_or_default(),
            }),
        }
    }
}

fn display(program: &OsStr) -> String {
    program.to_string_lossy().into_owned()
}

// git prints some failures ("nothing to commit") on stdout only.
fn diagnostic(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    String::from_utf8_lossy(stdout).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(with_git_dir: bool) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        if with_git_dir {
            fs::create_dir(temp_dir.path().join(".git")).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_stage_display_matches_git_subcommand() {
        let names: Vec<_> = SyncStage::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["add", "commit", "push"]);
    }

    #[test]
    fn test_push_args_include_remote_and_branch() {
        let temp = project(true);
        let service = SyncService::new(temp.path());
        assert_eq!(service.args(SyncStage::Pushing, "m"), vec!["push"]);

        let service = service.with_remote(Some("origin".into()), Some("main".into()));
        assert_eq!(
            service.args(SyncStage::Pushing, "m"),
            vec!["push", "origin", "main"]
        );
        assert_eq!(
            service.args(SyncStage::Committing, "Update Product from BiteBabe Admin"),
            vec!["commit", "-m", "Update Product from BiteBabe Admin"]
        );
    }

    #[test]
    fn test_diagnostic_prefers_stderr() {
        assert_eq!(diagnostic(b"  fatal: no upstream\n", b"out"), "fatal: no upstream");
        assert_eq!(
            diagnostic(b"", b"nothing to commit, working tree clean\n"),
            "nothing to commit, working tree clean"
        );
    }

    #[test]
    fn test_not_a_repository_spawns_nothing() {
        let temp = project(false);
        let service = SyncService::new(temp.path()).with_program("/nonexistent/git");

        let mut stages = Vec::new();
        let err = service
            .commit_and_push_with("Product", |stage| stages.push(stage))
            .unwrap_err();

        assert!(matches!(err, SyncError::NotARepository(ref root) if root == temp.path()));
        assert!(err.to_string().contains("git init"));
        assert!(stages.is_empty());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_git_binary() {
        let temp = project(true);
        let service = SyncService::new(temp.path()).with_program("/nonexistent/git");

        let err = service.commit_and_push("Product").unwrap_err();
        assert!(matches!(err, SyncError::GitNotInstalled(_)));
    }

    #[cfg(unix)]
    mod stub {
        use super::*;
        use crate::catalog::{CatalogRepository, Topping};
        use std::os::unix::fs::PermissionsExt;

        /// A fake git that logs its arguments and fails on `fail_on`.
        fn stub_git(dir: &Path, fail_on: Option<&str>, hang_on: Option<&str>) -> PathBuf {
            let bin = dir.join("bin");
            fs::create_dir_all(&bin).unwrap();
            let path = bin.join("git");
            let log = bin.join("calls.log");

            let mut script = format!("#!/bin/sh\necho \"$@\" >> '{}'\n", log.display());
            if let Some(sub) = hang_on {
                script.push_str(&format!("if [ \"$1\" = {sub} ]; then sleep 5; fi\n"));
            }
            if let Some(sub) = fail_on {
                script.push_str(&format!(
                    "if [ \"$1\" = {sub} ]; then echo \"fatal: {sub} rejected by stub\" >&2; exit 1; fi\n"
                ));
            }
            script.push_str("exit 0\n");

            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn calls(stub: &Path) -> Vec<String> {
            let log = stub.with_file_name("calls.log");
            fs::read_to_string(log)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        #[test]
        fn test_runs_add_commit_push_in_order() {
            let temp = project(true);
            let tools = TempDir::new().unwrap();
            let git = stub_git(tools.path(), None, None);
            let service = SyncService::new(temp.path())
                .with_program(&git)
                .with_remote(Some("origin".into()), Some("main".into()));

            let mut stages = Vec::new();
            service
                .commit_and_push_with("Topping", |stage| stages.push(stage))
                .unwrap();

            assert_eq!(stages, SyncStage::ALL.to_vec());
            assert_eq!(
                calls(&git),
                vec![
                    "add .",
                    "commit -m Update Topping from BiteBabe Admin",
                    "push origin main",
                ]
            );
        }

        #[test]
        fn test_commit_failure_skips_push() {
            let temp = project(true);
            let tools = TempDir::new().unwrap();
            let git = stub_git(tools.path(), Some("commit"), None);
            let service = SyncService::new(temp.path()).with_program(&git);

            let err = service.commit_and_push("Product").unwrap_err();

            assert_eq!(err.stage(), Some(SyncStage::Committing));
            assert_eq!(calls(&git).len(), 2);
        }

        #[test]
        fn test_push_failure_reports_diagnostic_and_keeps_local_save() {
            let temp = project(true);
            let tools = TempDir::new().unwrap();
            let git = stub_git(tools.path(), Some("push"), None);

            let mut repo = CatalogRepository::open(temp.path());
            repo.upsert_topping(Topping {
                name: "Cheese".into(),
                price: 1000.0,
                ..Default::default()
            })
            .unwrap();
            let toppings = temp.path().join("data").join("toppings.json");
            let saved = fs::read_to_string(&toppings).unwrap();

            let service = SyncService::new(temp.path()).with_program(&git);
            let err = service.commit_and_push("Topping").unwrap_err();

            match &err {
                SyncError::CommandFailure {
                    stage,
                    code,
                    stderr,
                } => {
                    assert_eq!(*stage, SyncStage::Pushing);
                    assert_eq!(*code, Some(1));
                    assert_eq!(stderr, "fatal: push rejected by stub");
                }
                other => panic!("unexpected error: {other}"),
            }
            assert!(err.to_string().contains("fatal: push rejected by stub"));
            assert_eq!(fs::read_to_string(&toppings).unwrap(), saved);
        }

        #[test]
        fn test_hanging_step_times_out() {
            let temp = project(true);
            let tools = TempDir::new().unwrap();
            let git = stub_git(tools.path(), None, Some("push"));
            let service = SyncService::new(temp.path())
                .with_program(&git)
                .with_timeout(Some(Duration::from_millis(300)));

            let err = service.commit_and_push("Product").unwrap_err();

            assert!(matches!(
                err,
                SyncError::Timeout {
                    stage: SyncStage::Pushing,
                    ..
                }
            ));
        }
    }
}

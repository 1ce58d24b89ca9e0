pub mod check;
pub mod logo;
pub mod menu;
pub mod product;
pub mod store;
pub mod topping;

use crate::{assets::AssetStore, catalog::CatalogRepository, config::Settings, git::SyncService};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Parser)]
#[command(
    name = "bitebabe",
    version,
    about = "BiteBabe catalog editor",
    long_about = "Edit the store configuration, products and toppings of a BiteBabe storefront, normalize its images and push the result with git. Run without a command for the interactive editor."
)]
pub struct Cli {
    /// Project directory (holds data/, assets/ and .git)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show or edit the store configuration
    #[command(subcommand)]
    Store(StoreCommand),
    /// Manage products
    #[command(subcommand)]
    Product(ProductCommand),
    /// Manage toppings
    #[command(subcommand)]
    Topping(ToppingCommand),
    /// Replace the logo and favicon from an image file
    Logo {
        path: PathBuf,
        #[arg(long)]
        push: bool,
    },
    /// Commit and push the project directory
    Sync {
        #[arg(default_value = "Catalog")]
        description: String,
    },
    /// Report dangling topping references and unused product images
    Check,
}

#[derive(Subcommand)]
pub enum StoreCommand {
    Show,
    Edit {
        #[arg(long)]
        push: bool,
    },
}

#[derive(Subcommand)]
pub enum ProductCommand {
    #[command(alias = "ls")]
    List,
    Show {
        id: String,
    },
    Add {
        #[arg(long)]
        push: bool,
    },
    Edit {
        id: String,
        #[arg(long)]
        push: bool,
    },
    Delete {
        id: String,
        #[arg(long)]
        push: bool,
    },
    /// Import an image file and attach it to a product
    Image {
        id: String,
        path: PathBuf,
        #[arg(long)]
        push: bool,
    },
}

#[derive(Subcommand)]
pub enum ToppingCommand {
    #[command(alias = "ls")]
    List,
    Add {
        #[arg(long)]
        push: bool,
    },
    Edit {
        id: String,
        #[arg(long)]
        push: bool,
    },
    Delete {
        id: String,
        #[arg(long)]
        push: bool,
    },
}

/// Everything a command needs for one project directory.
pub struct Session {
    pub catalog: CatalogRepository,
    pub assets: AssetStore,
    pub sync: SyncService,
}

impl Session {
    pub fn open(root: &Path, settings: &Settings) -> Self {
        Self {
            catalog: CatalogRepository::open(root),
            assets: AssetStore::new(root),
            sync: settings.sync_service(root),
        }
    }

    /// Commits and pushes after a local save. Failures are reported, the
    /// local files are left as they are.
    pub fn push(&self, description: &str) -> bool {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self
            .sync
            .commit_and_push_with(description, |stage| spinner.set_message(stage.describe()));
        spinner.finish_and_clear();

        match result {
            Ok(()) => {
                println!("{}", "Changes pushed to remote.".green());
                true
            }
            Err(err) => {
                eprintln!("{} {err}", "Saved locally, but sync failed:".red());
                if let Some(stage) = err.stage() {
                    eprintln!("{}", format!("Stopped at: {}", stage.describe()).dimmed());
                }
                false
            }
        }
    }
}

/// Runs one subcommand. Returns whether everything it was asked to do succeeded.
pub fn handle(session: &mut Session, command: Command) -> bool {
    match command {
        Command::Store(action) => store::handle(session, action),
        Command::Product(action) => product::handle(session, action),
        Command::Topping(action) => topping::handle(session, action),
        Command::Logo { path, push } => logo::handle(session, &path, push),
        Command::Sync { description } => session.push(&description),
        Command::Check => check::handle(session),
    }
}

fn report_prompt_error(err: inquire::InquireError) {
    match err {
        inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted => {
            println!("{}", "Cancelled.".dimmed())
        }
        err => eprintln!("{} {err}", "Prompt failed:".red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_session() -> (Session, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::open(temp_dir.path(), &Settings::default());
        (session, temp_dir)
    }

    #[test]
    fn test_sync_outside_a_repository_reports_failure() {
        let (mut session, _temp) = test_session();
        let command = Command::Sync {
            description: "Catalog".into(),
        };
        assert!(!handle(&mut session, command));
    }

    #[test]
    fn test_unknown_product_reports_failure() {
        let (mut session, _temp) = test_session();
        let command = Command::Product(ProductCommand::Show { id: "nope".into() });
        assert!(!handle(&mut session, command));
    }

    #[test]
    fn test_missing_logo_source_reports_failure() {
        let (mut session, temp) = test_session();
        let command = Command::Logo {
            path: temp.path().join("missing.png"),
            push: false,
        };
        assert!(!handle(&mut session, command));
    }

    #[test]
    fn test_clean_project_passes_check() {
        let (mut session, _temp) = test_session();
        assert!(handle(&mut session, Command::Check));
        assert!(handle(&mut session, Command::Product(ProductCommand::List)));
    }
}

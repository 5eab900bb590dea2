//! orgctl CLI Entry Point
//!
//! This is the main binary entry point for the orgctl CLI.
//! Running with no subcommand starts the interactive menu loop; the `init`
//! subcommand bootstraps the schema and exits.
//!
//! Tabular output goes to stdout. Diagnostics go to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orgctl::config;
use orgctl::directory::OrgDirectory;
use orgctl::executor::sqlite::SqliteExecutor;
use orgctl::prompt;
use orgctl::schema;

/// orgctl - Interactive org-chart directory CLI
#[derive(Parser)]
#[command(name = "orgctl")]
#[command(about = "Interactive org-chart directory CLI over a department/role/employee schema")]
#[command(version)]
struct Cli {
    /// Database file (overrides ORGCTL_DB and config files)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the directory tables and exit
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let db_file = config::resolve_db_path(cli.db)?;
    config::ensure_parent_dir(&db_file)?;
    let executor = SqliteExecutor::new(&db_file);

    match cli.command {
        Some(Commands::Init) => {
            schema::ensure_schema(&executor).await?;
            eprintln!("Initialized directory schema in {}", db_file.display());
        }
        None => {
            schema::ensure_schema(&executor).await?;
            let directory = OrgDirectory::new(executor);
            prompt::run(&directory).await?;
        }
    }

    Ok(())
}

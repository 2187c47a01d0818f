//! pubkit - manifest viewer and editor for Dart/Flutter projects.

mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pubkit")]
#[command(about = "View and edit pubspec.yaml with registry-backed version info", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the manifest file
    #[arg(long, global = true, default_value = "pubspec.yaml")]
    manifest: PathBuf,

    /// Verbose output
    #[arg(short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the parsed manifest
    Show {
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Check dependencies against the latest registry versions
    Outdated {
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Rewrite every outdated hosted dependency to ^latest
    Upgrade {
        /// Report what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Set or delete a manifest field (empty value deletes)
    ///
    /// Dot paths reach one level deep, e.g. `environment.sdk`.
    Set {
        /// Field path
        path: String,
        /// New value; omit to delete the field
        #[arg(default_value = "")]
        value: String,
    },
    /// Add a dependency, resolving ^latest when no version is given
    Add {
        /// Package name
        name: String,
        /// Version constraint (e.g. ^1.2.0)
        #[arg(long)]
        version: Option<String>,
        /// Add to dev_dependencies instead of dependencies
        #[arg(long)]
        dev: bool,
    },
    /// Remove a dependency
    Remove {
        /// Package name
        name: String,
        /// Remove from dev_dependencies instead of dependencies
        #[arg(long)]
        dev: bool,
    },
    /// Search the registry for packages
    Search {
        /// Search query
        query: String,
    },
    /// Run the package manager's `pub get` for the project
    Get,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Show { json } => commands::show(&cli.manifest, json).await,
        Command::Outdated { json } => commands::outdated(&cli.manifest, json).await,
        Command::Upgrade { dry_run } => commands::upgrade(&cli.manifest, dry_run).await,
        Command::Set { path, value } => commands::set_field(&cli.manifest, &path, &value).await,
        Command::Add { name, version, dev } => {
            commands::add(&cli.manifest, &name, version.as_deref(), dev).await
        }
        Command::Remove { name, dev } => commands::remove(&cli.manifest, &name, dev).await,
        Command::Search { query } => commands::search(&query).await,
        Command::Get => commands::get(&cli.manifest).await,
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

//! Geek CLI - operator tool for the AluraGeek catalog.
//!
//! Commands:
//! - `geek schema` - Print (or apply) the SQLite schema
//! - `geek seed` - Render (or apply) the starter catalog
//! - `geek hash-password` - Hash the admin password for `admin_password_hash`

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{HashPasswordArgs, SchemaArgs, SeedArgs};
use output::Output;

/// Geek CLI - manage the AluraGeek catalog database and admin account
#[derive(Parser)]
#[command(name = "geek")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL schema, or apply it to a database
    Schema(SchemaArgs),

    /// Render seed INSERT statements, or insert them into a database
    Seed(SeedArgs),

    /// Hash a password for the `admin_password_hash` variable
    HashPassword(HashPasswordArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose, cli.json);

    let result = match cli.command {
        Commands::Schema(args) => commands::schema::run(args, &output).await,
        Commands::Seed(args) => commands::seed::run(args, &output).await,
        Commands::HashPassword(args) => commands::hash_password::run(args, &output),
    };

    if let Err(e) = result {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

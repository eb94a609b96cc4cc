//! CLI command implementations.

pub mod hash_password;
pub mod schema;
pub mod seed;

use clap::Args;

/// Arguments for the schema command.
#[derive(Args)]
pub struct SchemaArgs {
    /// Apply the schema to this database (e.g. `sqlite://catalog.db`)
    /// instead of printing it.
    #[arg(short, long)]
    pub database: Option<String>,
}

/// Arguments for the seed command.
#[derive(Args)]
pub struct SeedArgs {
    /// TOML seed file; the built-in starter catalog when omitted.
    #[arg(short, long)]
    pub from: Option<String>,

    /// Insert into this database (e.g. `sqlite://catalog.db`) instead of
    /// printing SQL. The schema is applied first.
    #[arg(short, long)]
    pub database: Option<String>,
}

/// Arguments for the hash-password command.
#[derive(Args)]
pub struct HashPasswordArgs {
    /// Password to hash. Prompted for (hidden, confirmed) when omitted.
    #[arg(short, long)]
    pub password: Option<String>,
}

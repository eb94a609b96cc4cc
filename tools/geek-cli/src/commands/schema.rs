//! Schema command.

use anyhow::{Context as _, Result};
use geek_catalog::{CatalogStore, SCHEMA};
use geek_db::SqliteDb;

use super::SchemaArgs;
use crate::output::Output;

pub async fn run(args: SchemaArgs, output: &Output) -> Result<()> {
    let Some(url) = args.database else {
        if output.is_json() {
            output.json(&serde_json::json!({ "schema": SCHEMA }));
        } else {
            output.data(SCHEMA);
        }
        return Ok(());
    };

    output.debug(&format!("Connecting to {url}"));
    let db = SqliteDb::connect(&url)
        .await
        .with_context(|| format!("Failed to open {url}"))?;
    CatalogStore::new(db.clone())
        .migrate()
        .await
        .context("Failed to apply schema")?;
    db.close().await;

    if output.is_json() {
        output.json(&serde_json::json!({ "database": url, "applied": true }));
    } else {
        output.success(&format!("Schema applied to {url}"));
    }
    Ok(())
}

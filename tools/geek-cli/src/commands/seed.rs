//! Seed command.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Utc;
use geek_catalog::{CatalogStore, SeedCatalog, SeedRecords};
use geek_db::SqliteDb;

use super::SeedArgs;
use crate::output::Output;

pub async fn run(args: SeedArgs, output: &Output) -> Result<()> {
    let catalog = match &args.from {
        Some(path) => {
            output.debug(&format!("Reading seed file {path}"));
            load_catalog(Path::new(path))?
        }
        None => SeedCatalog::builtin(),
    };
    let records = catalog
        .into_records(Utc::now())
        .context("Invalid seed catalog")?;

    match args.database {
        Some(url) => apply(&url, &records, output).await,
        None => {
            let sql = records.to_sql();
            if output.is_json() {
                output.json(&serde_json::json!({
                    "categories": records.categories.len(),
                    "products": records.products.len(),
                    "sql": sql,
                }));
            } else {
                output.data(&sql);
                output.info(&format!(
                    "{} categories, {} products",
                    records.categories.len(),
                    records.products.len()
                ));
            }
            Ok(())
        }
    }
}

async fn apply(url: &str, records: &SeedRecords, output: &Output) -> Result<()> {
    let db = SqliteDb::connect(url)
        .await
        .with_context(|| format!("Failed to open {url}"))?;
    let store = CatalogStore::new(db.clone());
    store.migrate().await.context("Failed to apply schema")?;
    let result = store.seed(records).await;
    db.close().await;
    result.context("Failed to insert seed records")?;

    if output.is_json() {
        output.json(&serde_json::json!({
            "database": url,
            "categories": records.categories.len(),
            "products": records.products.len(),
        }));
    } else {
        output.success(&format!("Seeded {url}"));
        output.kv("categories", &records.categories.len().to_string());
        output.kv("products", &records.products.len().to_string());
    }
    Ok(())
}

fn load_catalog(path: &Path) -> Result<SeedCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_catalog(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_catalog(content: &str) -> Result<SeedCatalog> {
    Ok(toml::from_str(content)?)
}

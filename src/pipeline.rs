use anyhow::Result;
use reqwest::blocking::Client;
use tracing::{info, instrument};

use crate::{
    conference::{load_conferences, save_conferences},
    config::Config,
    fetch::{download_sheet, SheetSource},
    process::{merge_csv_file, MergeStats},
};

/// Fetch the sheet, merge it into the data file and write the result back.
#[instrument(level = "info", skip_all, fields(sheet = %config.sheet_name))]
pub fn run(config: &Config) -> Result<MergeStats> {
    // ─── 1) fetch ────────────────────────────────────────────────────
    let client = Client::new();
    let source =
        SheetSource::with_base_url(&config.base_url, &config.sheet_id, &config.sheet_name);
    let csv_path = download_sheet(&client, &source, &config.temp_dir, &config.csv_file)?;

    // ─── 2) load persisted list ──────────────────────────────────────
    let mut conferences = load_conferences(&config.data_file)?;
    info!(
        "{} conferences in {}",
        conferences.len(),
        config.data_file.display()
    );

    // ─── 3) merge + persist ──────────────────────────────────────────
    let stats = merge_csv_file(&csv_path, &mut conferences)?;
    save_conferences(&config.data_file, &conferences)?;

    info!(replaced = stats.replaced, added = stats.added, "done");
    Ok(stats)
}

// src/fetch/mod.rs

use anyhow::{bail, Context, Result};
use reqwest::{blocking::Client, StatusCode};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, instrument};
use url::Url;

/// Public Google Sheets host.
pub const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com";

/// One tab of a published spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetSource {
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
}

impl SheetSource {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self::with_base_url(GOOGLE_SHEETS_BASE, spreadsheet_id, sheet_name)
    }

    /// Same as [`SheetSource::new`] against another host (mock servers).
    pub fn with_base_url(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    /// CSV export endpoint for this tab.
    pub fn export_url(&self) -> Result<Url> {
        sheet_url(&self.base_url, &self.spreadsheet_id, &self.sheet_name)
    }
}

/// `<base>/spreadsheets/d/<id>/gviz/tq?tqx=out:csv&sheet=<name>`
pub fn sheet_url(base_url: &str, spreadsheet_id: &str, sheet_name: &str) -> Result<Url> {
    let raw = format!(
        "{}/spreadsheets/d/{}/gviz/tq",
        base_url.trim_end_matches('/'),
        spreadsheet_id
    );
    Url::parse_with_params(&raw, &[("tqx", "out:csv"), ("sheet", sheet_name)])
        .with_context(|| format!("building export URL from {}", raw))
}

/// GET the sheet as CSV and write the body to `<out_dir>/<out_file>`.
///
/// Anything but `200 OK` is an error and leaves the target untouched.
#[instrument(level = "info", skip(client), fields(sheet = %source.sheet_name))]
pub fn download_sheet(
    client: &Client,
    source: &SheetSource,
    out_dir: &Path,
    out_file: &str,
) -> Result<PathBuf> {
    let url = source.export_url()?;
    info!("GET {}", url);

    let resp = client
        .get(url.clone())
        .send()
        .with_context(|| format!("GET {} failed", url))?;
    let status = resp.status();
    info!(%status, "response");

    if status != StatusCode::OK {
        error!("Error downloading Google Sheet: {}", status.as_u16());
        bail!("downloading sheet {:?}: HTTP {}", source.sheet_name, status);
    }

    let bytes = resp
        .bytes()
        .with_context(|| format!("reading body from {}", url))?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = out_dir.join(out_file);
    fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;

    info!("CSV file saved to: {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

// src/process/mod.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{io::Read, path::Path};
use tracing::{debug, info, instrument, warn};

use crate::conference::Conference;

pub mod date_parser;
pub mod row;
pub mod utils;

use date_parser::{display_range, iso_date, parse_sheet_date, sentinel_date};
use row::{Columns, EstimatedPolicy, SourceRow};
use utils::split_topics;

/// Timezone written on every rebuilt record (Anywhere on Earth).
pub const DEFAULT_TIMEZONE: &str = "UTC-12";

/// What a merge did to the persisted list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub replaced: usize,
    pub added: usize,
}

/// A fully read sheet export.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub policy: EstimatedPolicy,
    pub rows: Vec<SourceRow>,
}

/// Parse a sheet export into normalized rows.
pub fn read_sheet<R: Read>(reader: R) -> Result<Sheet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let columns = Columns::from_headers(&headers)?;
    let policy = EstimatedPolicy::for_columns(&columns);
    debug!(?policy, "estimated-flag policy");

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.context("reading CSV record")?;
        rows.push(SourceRow::from_record(&columns, &record));
    }
    Ok(Sheet { policy, rows })
}

/// Read the fetched CSV at `csv_path` and merge it into `conferences`.
#[instrument(level = "info", skip(conferences), fields(csv = %csv_path.display()))]
pub fn merge_csv_file(csv_path: &Path, conferences: &mut Vec<Conference>) -> Result<MergeStats> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("opening {}", csv_path.display()))?;
    merge_csv(file, conferences)
}

pub fn merge_csv<R: Read>(reader: R, conferences: &mut Vec<Conference>) -> Result<MergeStats> {
    let sheet = read_sheet(reader)?;
    merge_sheet(&sheet, conferences)
}

/// Merge sheet rows into `conferences`.
///
/// Every row replaces the prior record with the same id (if any) and is
/// appended, in sheet order, after the untouched records.
pub fn merge_sheet(sheet: &Sheet, conferences: &mut Vec<Conference>) -> Result<MergeStats> {
    let mut stats = MergeStats::default();
    for row in &sheet.rows {
        let id = row.id()?;

        if remove_by_id(conferences, id).is_some() {
            warn!("Deleting entry {}", id);
            stats.replaced += 1;
        } else {
            stats.added += 1;
        }

        let conf = build_conference(row, sheet.policy)
            .with_context(|| format!("building conference {:?}", id))?;
        conferences.push(conf);
    }

    info!(
        replaced = stats.replaced,
        added = stats.added,
        total = conferences.len(),
        "merged sheet rows"
    );
    Ok(stats)
}

/// Drop the first record with `id`, keeping the order of the rest.
fn remove_by_id(conferences: &mut Vec<Conference>, id: &str) -> Option<Conference> {
    let pos = conferences.iter().position(|c| c.id == id)?;
    Some(conferences.remove(pos))
}

/// Rebuild a persisted record from one sheet row.
pub fn build_conference(row: &SourceRow, policy: EstimatedPolicy) -> Result<Conference> {
    let id = row.id()?;
    let conference = row.require(row::COL_CONFERENCE)?;

    let date = |col: &str| -> Result<chrono::NaiveDate> {
        let cell = row.get(col);
        if cell.is_none() {
            debug!(id, column = col, "no date; using {}", sentinel_date());
        }
        parse_sheet_date(cell)
            .with_context(|| format!("CSV line {}: column {:?}", row.line(), col))
    };
    let deadline = date(row::COL_DEADLINE)?;
    let abstract_deadline = date(row::COL_ABSTRACT_DEADLINE)?;
    let start = date(row::COL_START)?;
    let end = date(row::COL_END)?;

    let mut sub = Vec::new();
    if let Some(main) = row.get(row::COL_MAIN_TOPIC) {
        sub.push(main.to_string());
    }
    if let Some(other) = row.get(row::COL_OTHER_TOPICS) {
        sub.extend(split_topics(other));
    }

    let title = match row.get(row::COL_TRACK) {
        Some(track) => format!("{} [{}]", conference, track),
        None => conference.to_string(),
    };

    let mut conf = Conference::new(id);
    conf.title = Some(title.clone());
    conf.full_name = Some(title);
    conf.link = row.get(row::COL_CALL).map(str::to_string);
    conf.deadline = Some(iso_date(deadline));
    conf.abstract_deadline = Some(iso_date(abstract_deadline));
    conf.timezone = Some(DEFAULT_TIMEZONE.to_string());
    conf.estimated = row.estimated(policy);
    conf.place = row.get(row::COL_LOCATION).map(str::to_string);
    conf.date = Some(display_range(start, end));
    conf.start = Some(iso_date(start));
    conf.end = Some(iso_date(end));
    conf.core = row.get(row::COL_CORE).map(str::to_string);
    conf.sub = sub;
    Ok(conf)
}

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Cell layout used by the sheet for every date column.
pub const SHEET_DATE_FORMAT: &str = "%d.%m.%Y";

/// Placeholder for a missing date cell. Consumers treat it as "unknown".
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date")
}

/// Parse `"DD.MM.YYYY"`; an absent cell yields the sentinel date.
pub fn parse_sheet_date(cell: Option<&str>) -> Result<NaiveDate> {
    match cell {
        None => Ok(sentinel_date()),
        Some(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, SHEET_DATE_FORMAT)
                .with_context(|| format!("date {:?} is not DD.MM.YYYY", s))
        }
    }
}

/// `YYYY-MM-DD`
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Human-readable range, e.g. `"01 June - 05 June, 2025"`.
pub fn display_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%d %B"), end.format("%d %B, %Y"))
}

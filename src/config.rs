use std::path::PathBuf;

/// Spreadsheet used when `--sheetid` is not given.
pub const DEFAULT_SHEET_ID: &str = "1guvefLTrWjY3B1BQNK_NWsy-MceHCnrjjZjT46-jqmw";
pub const DEFAULT_TEMP_DIR: &str = "_temp";
pub const DEFAULT_CSV_FILE: &str = "conferences.csv";
pub const DEFAULT_DATA_FILE: &str = "_data/conferences.yml";

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub sheet_id: String,
    pub sheet_name: String,
    /// Export host; only changed in tests.
    pub base_url: String,
    /// Where the fetched CSV is kept.
    pub temp_dir: PathBuf,
    pub csv_file: String,
    /// Persisted conference list, read and rewritten in place.
    pub data_file: PathBuf,
}

impl Config {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            sheet_name: sheet_name.into(),
            base_url: crate::fetch::GOOGLE_SHEETS_BASE.to_string(),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            csv_file: DEFAULT_CSV_FILE.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

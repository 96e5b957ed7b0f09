/// Cell texts a spreadsheet export uses for "no value".
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 1) Trim surrounding whitespace. Quotes left by the CSV reader are data.
pub fn clean_str(raw: &str) -> String {
    raw.trim().to_string()
}

/// 2) Normalize a raw CSV cell: empty cells and NA markers carry no value.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let cleaned = clean_str(raw);
    if cleaned.is_empty() || NA_VALUES.contains(&cleaned.as_str()) {
        None
    } else {
        Some(cleaned)
    }
}

/// 3) Split a `", "`-separated topic list, dropping empty items.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(", ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

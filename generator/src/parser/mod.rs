//! Delimited-text loader with encoding auto-detection.
//!
//! Turns one input table into ordered [`RawRow`]s. No region-specific logic
//! here beyond the progress messages.

use serde_json::{json, Value};
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::RawRow;

/// Loader settings shared by all four tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Rows of one table, with metadata
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Column names, supplied or read from the header row
    pub headers: Vec<String>,
    /// One mapping per data row, in file order
    pub rows: Vec<RawRow>,
    /// Detected encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; anything else goes through chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using the given encoding, falling back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let text = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Parse delimited text into rows.
///
/// With `columns`, every line is data and fields are named positionally:
/// extra fields are ignored, missing ones become `""`. Without `columns`,
/// the first line is the header. Values are never trimmed.
///
/// The reader is flexible and reads from an already decoded `&str`, so
/// ragged rows and bad bytes never fail here; a `csv::Error` can only come
/// from the reader's own I/O.
///
/// # Example
/// ```
/// use wilayah::parser::parse_str;
/// use wilayah::RegionLevel;
///
/// let columns = RegionLevel::Province.input_columns();
/// let (headers, rows) = parse_str("11,Aceh\n12,Sumatera Utara", Some(columns), b',').unwrap();
/// assert_eq!(headers, vec!["id", "name"]);
/// assert_eq!(rows[1]["name"], "Sumatera Utara");
/// ```
pub fn parse_str(
    content: &str,
    columns: Option<&[&str]>,
    delimiter: u8,
) -> Result<(Vec<String>, Vec<RawRow>), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(columns.is_none())
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = match columns {
        Some(cols) => cols.iter().map(|c| c.to_string()).collect(),
        None => reader.headers()?.iter().map(String::from).collect(),
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            row.insert(header.clone(), json!(record.get(i).unwrap_or("")));
        }
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Decode and parse raw bytes.
pub fn parse_bytes(
    bytes: &[u8],
    columns: Option<&[&str]>,
    options: &LoadOptions,
) -> Result<LoadedTable, csv::Error> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let (headers, rows) = parse_str(&content, columns, options.delimiter)?;

    Ok(LoadedTable {
        headers,
        rows,
        encoding,
    })
}

/// Load one table from disk.
///
/// Fails with [`LoadError::MissingFile`] before reading when the path does
/// not exist, and with [`LoadError::Read`] on any later fault. The whole
/// file is read before parsing, so a failed load yields no rows at all.
pub async fn load_table(
    path: &Path,
    columns: Option<&[&str]>,
    options: &LoadOptions,
) -> LoadResult<LoadedTable> {
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| LoadError::read(path, e))?;
    if !exists {
        return Err(LoadError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LoadError::read(path, e))?;
    let table = parse_bytes(&bytes, columns, options).map_err(|e| LoadError::read(path, e))?;

    report(path, &table);
    Ok(table)
}

fn report(path: &Path, table: &LoadedTable) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    log_info(format!("Headers: [{}]", table.headers.join(", ")));
    if let Some(first) = table.rows.first() {
        log_info(format!("First row: {}", Value::Object(first.clone())));
    }
    log_success(format!("Loaded {} rows from {}", table.rows.len(), file_name));

    if table.rows.is_empty() {
        log_warning(format!("Warning: No data found in {}", file_name));
    }
}

//! Map raw rows to canonical [`Region`] records.
//!
//! Each canonical field has an ordered list of candidate column names. The
//! first candidate that is present with a non-empty value wins, so a row that
//! carries both `name` and `NAME` always resolves to `name`. Case variants
//! are distinct lookups.

use serde_json::Value;

use crate::models::{RawRow, Region, RegionLevel};

/// Candidate columns for `id`, in precedence order.
pub const ID_ALIASES: &[&str] = &["id", "kode", "code", "ID", "KODE"];

/// Candidate columns for `name`, in precedence order.
pub const NAME_ALIASES: &[&str] = &["name", "nama", "NAME", "NAMA"];

/// Candidate columns for the parent key of `level`, in precedence order.
/// Empty for provinces.
pub fn parent_aliases(level: RegionLevel) -> &'static [&'static str] {
    match level {
        RegionLevel::Province => &[],
        RegionLevel::Regency => &["province_id", "provinsi_id", "kode_provinsi", "province_code"],
        RegionLevel::District => &["regency_id", "kabupaten_id", "kode_kabupaten", "regency_code"],
        RegionLevel::Village => &["district_id", "kecamatan_id", "kode_kecamatan", "district_code"],
    }
}

/// First present, non-empty value among `aliases`, or `""`.
pub fn resolve<'a>(row: &'a RawRow, aliases: &[&str]) -> &'a str {
    aliases
        .iter()
        .find_map(|key| row.get(*key).and_then(Value::as_str).filter(|v| !v.is_empty()))
        .unwrap_or("")
}

/// Normalize one row. Missing fields become empty strings, never errors.
pub fn normalize_row(row: &RawRow, level: RegionLevel) -> Region {
    let parent_id = level
        .parent_key()
        .map(|_| resolve(row, parent_aliases(level)).to_string());

    Region {
        level,
        id: resolve(row, ID_ALIASES).to_string(),
        name: resolve(row, NAME_ALIASES).to_string(),
        parent_id,
    }
}

/// Normalize a whole table, preserving row order.
pub fn normalize_rows(rows: &[RawRow], level: RegionLevel) -> Vec<Region> {
    rows.iter().map(|row| normalize_row(row, level)).collect()
}

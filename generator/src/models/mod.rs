//! Domain models for the region generator.
//!
//! - [`RegionLevel`] - one of the four administrative levels
//! - [`RawRow`] - a loaded row before alias resolution
//! - [`Region`] - canonical record for any level
//! - [`Dataset`] - the four normalized collections of one run
//! - [`Document`] - one output file, relative path plus JSON body

use serde_json::{json, Map, Value};
use std::path::PathBuf;

/// A row as read from a table: column name to string value, in column order.
pub type RawRow = Map<String, Value>;

// =============================================================================
// Region Level
// =============================================================================

/// Administrative level, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionLevel {
    /// Provinsi
    Province,
    /// Kabupaten/kota
    Regency,
    /// Kecamatan
    District,
    /// Desa/kelurahan
    Village,
}

impl RegionLevel {
    /// All levels in pipeline order.
    pub const ALL: [RegionLevel; 4] = [
        RegionLevel::Province,
        RegionLevel::Regency,
        RegionLevel::District,
        RegionLevel::Village,
    ];

    /// Collection name, used for input file stems, listing files,
    /// detail directories and children keys.
    pub fn collection(self) -> &'static str {
        match self {
            RegionLevel::Province => "provinces",
            RegionLevel::Regency => "regencies",
            RegionLevel::District => "districts",
            RegionLevel::Village => "villages",
        }
    }

    /// Canonical name of the foreign key to the parent level.
    pub fn parent_key(self) -> Option<&'static str> {
        match self {
            RegionLevel::Province => None,
            RegionLevel::Regency => Some("province_id"),
            RegionLevel::District => Some("regency_id"),
            RegionLevel::Village => Some("district_id"),
        }
    }

    pub fn parent(self) -> Option<RegionLevel> {
        match self {
            RegionLevel::Province => None,
            RegionLevel::Regency => Some(RegionLevel::Province),
            RegionLevel::District => Some(RegionLevel::Regency),
            RegionLevel::Village => Some(RegionLevel::District),
        }
    }

    pub fn child(self) -> Option<RegionLevel> {
        match self {
            RegionLevel::Province => Some(RegionLevel::Regency),
            RegionLevel::Regency => Some(RegionLevel::District),
            RegionLevel::District => Some(RegionLevel::Village),
            RegionLevel::Village => None,
        }
    }

    /// Positional column names of the headerless input file.
    pub fn input_columns(self) -> &'static [&'static str] {
        match self {
            RegionLevel::Province => &["id", "name"],
            RegionLevel::Regency => &["id", "province_id", "name"],
            RegionLevel::District => &["id", "regency_id", "name"],
            RegionLevel::Village => &["id", "district_id", "name"],
        }
    }
}

impl std::fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

// =============================================================================
// Region
// =============================================================================

/// Canonical record shared by all four levels.
///
/// Values are kept exactly as read. A field with no matching input column is
/// the empty string. `parent_id` is `Some` for every non-root level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub level: RegionLevel,
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl Region {
    /// Projects the record to `{id, <parent key>, name}`.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields())
    }

    /// Record with its direct children under the child level's collection
    /// key. Children are projected flat; grandchildren never appear.
    pub fn to_detail_json<'a, I>(&self, children: I) -> Value
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let mut obj = self.fields();
        if let Some(child) = self.level.child() {
            let children: Vec<Value> = children.into_iter().map(Region::to_json).collect();
            obj.insert(child.collection().to_string(), Value::Array(children));
        }
        Value::Object(obj)
    }

    fn fields(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("id".to_string(), json!(self.id));
        if let Some(key) = self.level.parent_key() {
            obj.insert(key.to_string(), json!(self.parent_id.as_deref().unwrap_or("")));
        }
        obj.insert("name".to_string(), json!(self.name));
        obj
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// The four normalized collections of one run, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub provinces: Vec<Region>,
    pub regencies: Vec<Region>,
    pub districts: Vec<Region>,
    pub villages: Vec<Region>,
}

impl Dataset {
    pub fn level(&self, level: RegionLevel) -> &[Region] {
        match level {
            RegionLevel::Province => &self.provinces,
            RegionLevel::Regency => &self.regencies,
            RegionLevel::District => &self.districts,
            RegionLevel::Village => &self.villages,
        }
    }

    pub fn level_mut(&mut self, level: RegionLevel) -> &mut Vec<Region> {
        match level {
            RegionLevel::Province => &mut self.provinces,
            RegionLevel::Regency => &mut self.regencies,
            RegionLevel::District => &mut self.districts,
            RegionLevel::Village => &mut self.villages,
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// One output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path relative to the output root, e.g. `provinces/11.json`.
    pub path: PathBuf,
    pub body: Value,
}

impl Document {
    /// `<collection>.json`
    pub fn listing(level: RegionLevel, body: Value) -> Self {
        Self {
            path: PathBuf::from(format!("{}.json", level.collection())),
            body,
        }
    }

    /// `<collection>/<id>.json`
    ///
    /// Built as one string so an id with a leading separator still lands
    /// inside the collection directory.
    pub fn detail(level: RegionLevel, id: &str, body: Value) -> Self {
        Self {
            path: PathBuf::from(format!("{}/{}.json", level.collection(), id)),
            body,
        }
    }
}

//! Join the four levels parent to child and fan out into documents.
//!
//! # Output tree
//!
//! ```text
//! provinces.json            [{id, name}]
//! provinces/<id>.json       {id, name, regencies: [{id, province_id, name}]}
//! regencies.json            [{id, province_id, name}]
//! regencies/<id>.json       {id, province_id, name, districts: [...]}
//! districts.json            [{id, regency_id, name}]
//! districts/<id>.json       {id, regency_id, name, villages: [...]}
//! villages.json             [{id, district_id, name}]
//! ```
//!
//! Children keep their input order. Grandchildren are never embedded. A
//! child whose parent id matches nothing, or is empty, shows up in its own
//! listing only.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Dataset, Document, Region, RegionLevel};

/// Children of one level indexed by parent id, each bucket in input order.
pub struct ChildIndex<'a> {
    buckets: HashMap<&'a str, Vec<&'a Region>>,
}

impl<'a> ChildIndex<'a> {
    pub fn build(children: &'a [Region]) -> Self {
        let mut buckets: HashMap<&'a str, Vec<&'a Region>> = HashMap::new();
        for child in children {
            match child.parent_id.as_deref() {
                Some(parent_id) if !parent_id.is_empty() => {
                    buckets.entry(parent_id).or_default().push(child);
                }
                _ => {}
            }
        }
        Self { buckets }
    }

    /// Direct children of `parent_id`, empty if none.
    pub fn children_of(&self, parent_id: &str) -> &[&'a Region] {
        self.buckets.get(parent_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Flat listing of every record at one level, in input order.
pub fn listing(level: RegionLevel, records: &[Region]) -> Document {
    let body = Value::Array(records.iter().map(Region::to_json).collect());
    Document::listing(level, body)
}

/// One detail document per parent record, each embedding its direct children.
pub fn details(level: RegionLevel, parents: &[Region], children: &[Region]) -> Vec<Document> {
    let index = ChildIndex::build(children);
    parents
        .iter()
        .map(|parent| {
            let body = parent.to_detail_json(index.children_of(&parent.id).iter().copied());
            Document::detail(level, &parent.id, body)
        })
        .collect()
}

/// Documents of one level: its listing, then one detail per record
/// (none for villages).
#[derive(Debug, Clone)]
pub struct LevelDocuments {
    pub level: RegionLevel,
    pub listing: Document,
    pub details: Vec<Document>,
}

impl LevelDocuments {
    /// Listing first, then details.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        std::iter::once(&self.listing).chain(self.details.iter())
    }

    /// Number of files in the group.
    pub fn file_count(&self) -> usize {
        1 + self.details.len()
    }
}

/// Build every output document, grouped by level in write order.
///
/// Fails with [`PipelineError::EmptyDataset`] when there are no provinces;
/// empty lower levels only produce empty children arrays.
pub fn assemble(dataset: &Dataset) -> PipelineResult<Vec<LevelDocuments>> {
    if dataset.provinces.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let groups = RegionLevel::ALL
        .into_iter()
        .map(|level| {
            let records = dataset.level(level);
            let detail_docs = match level.child() {
                Some(child) => details(level, records, dataset.level(child)),
                None => Vec::new(),
            };
            LevelDocuments {
                level,
                listing: listing(level, records),
                details: detail_docs,
            }
        })
        .collect();

    Ok(groups)
}

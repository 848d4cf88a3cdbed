use std::collections::HashMap;

use serde::Serialize;

use crate::listings::canonical::canonicalize;
use crate::listings::models::ListingRecord;

/// Raw location entry -> canonical key, built once per dataset load.
///
/// Every raw entry seen in the column is a key. Entries that clean to nothing
/// map to themselves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CanonicalizationMap {
    entries: HashMap<String, String>,
}

impl CanonicalizationMap {
    pub fn build<'a, I>(raw_entries: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = HashMap::new();
        for raw in raw_entries {
            if entries.contains_key(raw) {
                continue;
            }
            let canonical = canonicalize(raw).unwrap_or_else(|| raw.to_string());
            entries.insert(raw.to_string(), canonical);
        }
        Self { entries }
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which derived location list a normalization pass rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationColumn {
    Province,
    City,
    District,
}

impl LocationColumn {
    pub fn list(self, record: &ListingRecord) -> &[String] {
        match self {
            LocationColumn::Province => &record.province_list,
            LocationColumn::City => &record.city_list,
            LocationColumn::District => &record.district_list,
        }
    }

    fn list_mut(self, record: &mut ListingRecord) -> &mut Vec<String> {
        match self {
            LocationColumn::Province => &mut record.province_list,
            LocationColumn::City => &mut record.city_list,
            LocationColumn::District => &mut record.district_list,
        }
    }
}

/// Canonicalizes one location column across all records.
///
/// The map is collected over the whole column before any row is rewritten, so
/// a raw entry resolves to the same key everywhere it appears.
pub fn normalize(records: &mut [ListingRecord], column: LocationColumn) -> CanonicalizationMap {
    let map = CanonicalizationMap::build(
        records
            .iter()
            .flat_map(|record| column.list(record).iter().map(String::as_str)),
    );

    for record in records.iter_mut() {
        for entry in column.list_mut(record).iter_mut() {
            if let Some(canonical) = map.get(entry.as_str()) {
                *entry = canonical.to_string();
            }
        }
    }

    map
}

//! Multi-criteria filtering over the listing table.
//!
//! Every criterion is optional and they combine with AND. Matching is
//! case-insensitive literal substring containment. The result is a view over
//! the source slice in its original order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::listings::models::ListingRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Row position must contain any of these.
    pub positions: BTreeSet<String>,
    /// Some canonical province entry must contain any of these.
    pub provinces: BTreeSet<String>,
    /// Some canonical city entry must contain any of these.
    pub cities: BTreeSet<String>,
    /// Description must contain this.
    pub keyword: Option<String>,
    /// Description, position, partner, province or city must contain this.
    pub global_query: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            && self.provinces.is_empty()
            && self.cities.is_empty()
            && normalized_term(self.keyword.as_deref()).is_none()
            && normalized_term(self.global_query.as_deref()).is_none()
    }
}

/// Lower-cased form of the criteria, built once per `apply` call.
struct Matcher {
    positions: Vec<String>,
    provinces: Vec<String>,
    cities: Vec<String>,
    keyword: Option<String>,
    global_query: Option<String>,
}

impl Matcher {
    fn new(criteria: &FilterCriteria) -> Self {
        Self {
            positions: lowered(&criteria.positions),
            provinces: lowered(&criteria.provinces),
            cities: lowered(&criteria.cities),
            keyword: normalized_term(criteria.keyword.as_deref()),
            global_query: normalized_term(criteria.global_query.as_deref()),
        }
    }

    fn matches(&self, record: &ListingRecord) -> bool {
        if !self.positions.is_empty() && !contains_any(record.position(), &self.positions) {
            return false;
        }
        if !self.provinces.is_empty() && !list_contains_any(&record.province_list, &self.provinces)
        {
            return false;
        }
        if !self.cities.is_empty() && !list_contains_any(&record.city_list, &self.cities) {
            return false;
        }
        if let Some(keyword) = &self.keyword {
            if !contains_ci(record.description(), keyword) {
                return false;
            }
        }
        if let Some(query) = &self.global_query {
            let fields = [
                record.description(),
                record.position(),
                record.partner(),
                Some(record.province.as_str()),
                Some(record.city.as_str()),
            ];
            if !fields.into_iter().any(|field| contains_ci(field, query)) {
                return false;
            }
        }
        true
    }
}

/// Returns the rows passing every non-empty criterion, in source order.
pub fn apply<'a>(
    records: &'a [ListingRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a ListingRecord> {
    if criteria.is_empty() {
        return records.iter().collect();
    }
    let matcher = Matcher::new(criteria);
    records.iter().filter(|record| matcher.matches(record)).collect()
}

fn normalized_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn lowered(values: &BTreeSet<String>) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// `needle` must already be lower-case. Absent haystacks never match.
fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn contains_any(haystack: Option<&str>, needles: &[String]) -> bool {
    match haystack {
        Some(h) => {
            let h = h.to_lowercase();
            needles.iter().any(|needle| h.contains(needle.as_str()))
        }
        None => false,
    }
}

fn list_contains_any(entries: &[String], selected: &[String]) -> bool {
    entries
        .iter()
        .any(|entry| contains_any(Some(entry), selected))
}

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::listings::dataset::Dataset;
use crate::listings::regions::RegionWhitelist;

/// A selectable location option. `known` is omitted when no whitelist is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetOption {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known: Option<bool>,
}

/// Sorted, de-duplicated option lists for the filter controls.
#[derive(Debug, Clone, Serialize)]
pub struct Facets {
    pub positions: Vec<String>,
    pub provinces: Vec<FacetOption>,
    pub cities: Vec<FacetOption>,
    pub districts: Vec<String>,
    pub updated_on: Option<NaiveDate>,
}

pub fn build_facets(dataset: &Dataset, regions: &RegionWhitelist) -> Facets {
    let listings = &dataset.listings;

    let positions: BTreeSet<&str> = listings
        .iter()
        .filter_map(|r| r.position())
        .filter(|p| !p.trim().is_empty())
        .collect();
    let provinces: BTreeSet<&str> = listings
        .iter()
        .flat_map(|r| r.province_list.iter().map(String::as_str))
        .collect();
    let cities: BTreeSet<&str> = listings
        .iter()
        .flat_map(|r| r.city_list.iter().map(String::as_str))
        .collect();
    let districts: BTreeSet<&str> = listings
        .iter()
        .flat_map(|r| r.district_list.iter().map(String::as_str))
        .collect();

    let whitelist = (!regions.is_empty()).then_some(regions);
    let options = |values: BTreeSet<&str>, known: fn(&RegionWhitelist, &str) -> bool| {
        values
            .into_iter()
            .map(|value| FacetOption {
                value: value.to_string(),
                known: whitelist.map(|w| known(w, value)),
            })
            .collect::<Vec<_>>()
    };

    Facets {
        positions: positions.into_iter().map(str::to_string).collect(),
        provinces: options(provinces, RegionWhitelist::is_known_province),
        cities: options(cities, RegionWhitelist::is_known_regency),
        districts: districts.into_iter().map(str::to_string).collect(),
        updated_on: dataset.updated_on,
    }
}

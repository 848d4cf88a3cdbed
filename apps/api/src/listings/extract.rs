//! Extraction of province / city / district values from the multi-line
//! `lokasi_penempatan` field.
//!
//! The field carries one attribute per line, e.g.
//!
//! ```text
//! Provinsi: Jawa Barat
//! Kota: Bandung, Cimahi
//! Kecamatan: Coblong
//! ```

use std::sync::OnceLock;

use regex::Regex;

pub const PROVINCE_LABEL: &str = "Provinsi";
pub const CITY_LABEL: &str = "Kota";
pub const REGENCY_LABEL: &str = "Kabupaten";
pub const DISTRICT_LABEL: &str = "Kecamatan";

static ENTRY_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn entry_separator() -> &'static Regex {
    ENTRY_SEPARATOR.get_or_init(|| Regex::new(r"\s*,\s*").expect("Failed to compile separator regex"))
}

/// Returns the trimmed value of the first line starting with `label`
/// (case-insensitive). Lines without a colon yield the whole line.
pub fn extract(field: Option<&str>, label: &str) -> String {
    let Some(field) = field else {
        return String::new();
    };
    let label = label.to_lowercase();

    field
        .split('\n')
        .find(|line| line.to_lowercase().starts_with(&label))
        .map(|line| {
            let value = line.split_once(':').map(|(_, v)| v).unwrap_or(line);
            value.trim().to_string()
        })
        .unwrap_or_default()
}

/// Cities and regencies share one placement line; try `Kota` first.
pub fn extract_city(field: Option<&str>) -> String {
    let city = extract(field, CITY_LABEL);
    if city.is_empty() {
        extract(field, REGENCY_LABEL)
    } else {
        city
    }
}

/// Splits a comma-separated value, dropping empty and all-digit segments.
pub fn split_entries(value: &str) -> Vec<String> {
    entry_separator()
        .split(value)
        .filter(|segment| !segment.is_empty() && !segment.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Raw (not yet canonicalized) location values for one listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedLocation {
    pub province: String,
    pub city: String,
    pub district: String,
    pub province_list: Vec<String>,
    pub city_list: Vec<String>,
    pub district_list: Vec<String>,
}

impl ExtractedLocation {
    pub fn from_field(field: Option<&str>) -> Self {
        let province = extract(field, PROVINCE_LABEL);
        let city = extract_city(field);
        let district = extract(field, DISTRICT_LABEL);

        Self {
            province_list: split_entries(&province),
            city_list: split_entries(&city),
            district_list: split_entries(&district),
            province,
            city,
            district,
        }
    }
}

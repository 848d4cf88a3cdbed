//! Loading a portal snapshot into an in-memory, fully derived listing table.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::listings::extract::ExtractedLocation;
use crate::listings::models::{ListingRecord, RawListing};
use crate::listings::normalize::{normalize, CanonicalizationMap, LocationColumn};

/// JSON pointer to the listing array inside a portal snapshot.
pub const LISTINGS_POINTER: &str = "/props/data/data";
pub const DETAIL_BASE_URL: &str = "https://simbelmawa.kemdikbud.go.id/magang/lowongan";

static SNAPSHOT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn snapshot_name_regex() -> &'static Regex {
    SNAPSHOT_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^data-(\d{2})-(\d{2})-(\d{4})\.json$")
            .expect("Failed to compile snapshot name regex")
    })
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Listing array not found at `props.data.data`")]
    MissingListings,

    #[error("Malformed listing at index {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Listing data is not available yet in {0}")]
    NoSnapshot(PathBuf),

    #[error("Snapshot load was interrupted: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// A loaded snapshot. Immutable once built.
#[derive(Debug, Default)]
pub struct Dataset {
    pub listings: Vec<ListingRecord>,
    pub province_map: CanonicalizationMap,
    pub city_map: CanonicalizationMap,
    pub district_map: CanonicalizationMap,
    pub updated_on: Option<NaiveDate>,
}

impl Dataset {
    /// Runs extraction and canonicalization over raw listings.
    pub fn from_raw(raw: Vec<RawListing>) -> Self {
        let mut listings: Vec<ListingRecord> = raw.into_iter().map(derive_record).collect();

        let province_map = normalize(&mut listings, LocationColumn::Province);
        let city_map = normalize(&mut listings, LocationColumn::City);
        let district_map = normalize(&mut listings, LocationColumn::District);

        Self {
            listings,
            province_map,
            city_map,
            district_map,
            updated_on: None,
        }
    }

    /// Parses a whole snapshot document.
    pub fn from_document(mut document: Value) -> Result<Self, LoadError> {
        let items = match document.pointer_mut(LISTINGS_POINTER).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(LoadError::MissingListings),
        };

        let raw = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<RawListing>(item)
                    .map_err(|source| LoadError::Record { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_raw(raw))
    }

    /// Reads and derives a snapshot file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        debug!("Reading listing snapshot {}", path.display());
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_slice(&bytes)?;

        let mut dataset = Self::from_document(document)?;
        dataset.updated_on = snapshot_date(path);

        info!(
            listings = dataset.listings.len(),
            provinces = dataset.province_map.len(),
            cities = dataset.city_map.len(),
            districts = dataset.district_map.len(),
            "Loaded listing snapshot {}",
            path.display()
        );
        Ok(dataset)
    }
}

fn derive_record(raw: RawListing) -> ListingRecord {
    let location = ExtractedLocation::from_field(raw.placement_location.as_deref());
    let slug = raw.slug.unwrap_or_default();
    let link = (!slug.is_empty()).then(|| format!("{DETAIL_BASE_URL}/{slug}"));

    ListingRecord {
        position: raw.position,
        partner: raw.partner,
        description: raw.description,
        placement_location: raw.placement_location,
        slots: raw.slots,
        slug,
        link,
        province: location.province,
        city: location.city,
        district: location.district,
        province_list: location.province_list,
        city_list: location.city_list,
        district_list: location.district_list,
    }
}

/// Date encoded in a `data-DD-MM-YYYY.json` file name.
pub fn snapshot_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let caps = snapshot_name_regex().captures(name)?;
    let formatted = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&formatted, "%d-%m-%Y").ok()
}

/// Resolves the configured listings path to a concrete snapshot file.
///
/// A directory resolves to its newest dated snapshot. Files with undated or
/// invalid names are ignored.
pub fn resolve_snapshot(path: &Path) -> Result<PathBuf, LoadError> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let entries = fs::read_dir(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|candidate| candidate.is_file())
        .filter_map(|candidate| snapshot_date(&candidate).map(|date| (date, candidate)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, candidate)| candidate)
        .ok_or_else(|| LoadError::NoSnapshot(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(listings: Value) -> Value {
        json!({"component": "Magang/Index", "props": {"data": {"data": listings}}})
    }

    fn fixture() -> Value {
        snapshot(json!([
            {
                "posisi_magang": "Backend Developer",
                "mitra": "PT Arek Digital",
                "deskripsi": "Membangun API",
                "lokasi_penempatan": "Provinsi: Jawa Timur\nKota: Surabaya",
                "jumlah": 2,
                "slug": "backend-developer-arek"
            },
            {
                "posisi_magang": "Data Analyst",
                "mitra": "PT Ibu Kota",
                "deskripsi": "Analisis data",
                "lokasi_penempatan": "Provinsi: DKI Jakarta\nKota: Jakarta Selatan",
                "jumlah": "3",
                "slug": "data-analyst-ibukota"
            },
            {
                "posisi_magang": "Guru Pendamping",
                "mitra": null,
                "lokasi_penempatan": null
            }
        ]))
    }

    #[test]
    fn test_end_to_end_location_pipeline() {
        let dataset = Dataset::from_document(fixture()).unwrap();
        let [east_java, jakarta, unplaced] = &dataset.listings[..] else {
            panic!("expected three listings");
        };

        assert_eq!(east_java.province, "Jawa Timur");
        // Last-token heuristic: the "Timur" qualifier is dropped, leaving "Jawa".
        assert_eq!(east_java.province_list, vec!["Jawa"]);
        assert_eq!(east_java.city_list, vec!["Surabaya"]);

        assert_eq!(jakarta.province_list, vec!["Jakarta"]);
        assert_eq!(jakarta.city, "Jakarta Selatan");
        assert_eq!(jakarta.city_list, vec!["Jakarta"]);
        assert_eq!(jakarta.slots, Some(3));

        assert_eq!(unplaced.province, "");
        assert!(unplaced.province_list.is_empty());
        assert!(unplaced.city_list.is_empty());
        assert_eq!(unplaced.slug, "");
        assert!(unplaced.link.is_none());
    }

    #[test]
    fn test_maps_cover_every_raw_entry() {
        let dataset = Dataset::from_document(fixture()).unwrap();
        assert_eq!(dataset.province_map.get("Jawa Timur"), Some("Jawa"));
        assert_eq!(dataset.province_map.get("DKI Jakarta"), Some("Jakarta"));
        assert_eq!(dataset.city_map.get("Jakarta Selatan"), Some("Jakarta"));
        assert!(dataset.district_map.is_empty());
    }

    #[test]
    fn test_detail_link_built_from_slug() {
        let dataset = Dataset::from_document(fixture()).unwrap();
        assert_eq!(
            dataset.listings[0].link.as_deref(),
            Some("https://simbelmawa.kemdikbud.go.id/magang/lowongan/backend-developer-arek")
        );
    }

    #[test]
    fn test_regency_line_fills_city() {
        let document = snapshot(json!([
            {"lokasi_penempatan": "Provinsi: Jawa Barat\nKabupaten: Sumedang\nKecamatan: Jatinangor"}
        ]));
        let dataset = Dataset::from_document(document).unwrap();
        assert_eq!(dataset.listings[0].city_list, vec!["Sumedang"]);
        assert_eq!(dataset.listings[0].district_list, vec!["Jatinangor"]);
    }

    #[test]
    fn test_missing_nesting_is_fatal() {
        let err = Dataset::from_document(json!({"props": {"data": {}}})).unwrap_err();
        assert!(matches!(err, LoadError::MissingListings));

        let err = Dataset::from_document(json!({"props": {"data": {"data": {}}}})).unwrap_err();
        assert!(matches!(err, LoadError::MissingListings));
    }

    #[test]
    fn test_wrongly_typed_fields_keep_every_row() {
        let document = snapshot(json!([
            {"posisi_magang": "Backend Developer", "mitra": "PT Arek Digital", "slug": "be"},
            {"posisi_magang": "Data Analyst", "mitra": 12345, "slug": 99, "deskripsi": false}
        ]));
        let dataset = Dataset::from_document(document).unwrap();

        assert_eq!(dataset.listings.len(), 2);
        let odd = &dataset.listings[1];
        assert_eq!(odd.partner.as_deref(), Some("12345"));
        assert_eq!(odd.slug, "99");
        assert!(odd.description.is_none());
        assert_eq!(
            odd.link.as_deref(),
            Some("https://simbelmawa.kemdikbud.go.id/magang/lowongan/99")
        );
    }

    #[test]
    fn test_non_object_listing_is_fatal() {
        let err = Dataset::from_document(snapshot(json!([{}, 42]))).unwrap_err();
        assert!(matches!(err, LoadError::Record { index: 1, .. }));
    }

    #[test]
    fn test_snapshot_date_parsing() {
        assert_eq!(
            snapshot_date(Path::new("data_lowongan/data-07-03-2025.json")),
            NaiveDate::from_ymd_opt(2025, 3, 7)
        );
        assert_eq!(snapshot_date(Path::new("data-31-02-2025.json")), None);
        assert_eq!(snapshot_date(Path::new("lowongan.json")), None);
    }

    #[test]
    fn test_resolve_snapshot_picks_latest_date() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "data-28-02-2025.json",
            "data-01-03-2025.json",
            "data-15-12-2024.json",
            "notes.json",
        ] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let resolved = resolve_snapshot(dir.path()).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "data-01-03-2025.json");
    }

    #[test]
    fn test_resolve_snapshot_empty_dir_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_snapshot(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoSnapshot(_)));
    }

    #[test]
    fn test_load_records_snapshot_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data-05-01-2025.json");
        fs::write(&path, fixture().to_string()).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.listings.len(), 3);
        assert_eq!(dataset.updated_on, NaiveDate::from_ymd_opt(2025, 1, 5));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lowongan.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Dataset::load(&path), Err(LoadError::Json(_))));
    }
}

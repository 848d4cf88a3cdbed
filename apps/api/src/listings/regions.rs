//! Official province / regency names, cached in a plain-text file.
//!
//! File layout:
//!
//! ```text
//! # Provinsi
//! ACEH
//! ...
//!
//! # KotaKab
//! KABUPATEN SIMEULUE
//! ...
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::listings::canonical::canonicalize;

pub const REGIONS_API_BASE: &str =
    "https://raw.githubusercontent.com/cahyadsn/api-wilayah-indonesia/master";
const PROVINCE_HEADER: &str = "Provinsi";
const REGENCY_HEADER: &str = "KotaKab";
const FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Copy)]
enum Section {
    Provinces,
    Regencies,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionWhitelist {
    pub provinces: BTreeSet<String>,
    pub regencies: BTreeSet<String>,
    #[serde(skip)]
    province_keys: HashSet<String>,
    #[serde(skip)]
    regency_keys: HashSet<String>,
}

impl RegionWhitelist {
    pub fn new(provinces: BTreeSet<String>, regencies: BTreeSet<String>) -> Self {
        let keys = |names: &BTreeSet<String>| -> HashSet<String> {
            names.iter().filter_map(|n| canonicalize(n)).collect()
        };
        Self {
            province_keys: keys(&provinces),
            regency_keys: keys(&regencies),
            provinces,
            regencies,
        }
    }

    /// Parses the cached file. Lines outside a known section are ignored.
    pub fn parse(text: &str) -> Self {
        let mut provinces = BTreeSet::new();
        let mut regencies = BTreeSet::new();
        let mut section = None;

        for line in text.lines().map(str::trim) {
            if let Some(header) = line.strip_prefix('#') {
                section = match header.trim() {
                    PROVINCE_HEADER => Some(Section::Provinces),
                    REGENCY_HEADER => Some(Section::Regencies),
                    _ => None,
                };
                continue;
            }
            if line.is_empty() {
                continue;
            }
            match section {
                Some(Section::Provinces) => {
                    provinces.insert(line.to_string());
                }
                Some(Section::Regencies) => {
                    regencies.insert(line.to_string());
                }
                None => {}
            }
        }

        Self::new(provinces, regencies)
    }

    pub fn render(&self) -> String {
        let mut lines = vec![format!("# {PROVINCE_HEADER}")];
        lines.extend(self.provinces.iter().cloned());
        lines.push(String::new());
        lines.push(format!("# {REGENCY_HEADER}"));
        lines.extend(self.regencies.iter().cloned());
        lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty() && self.regencies.is_empty()
    }

    /// Whether some official province shares this canonical key.
    pub fn is_known_province(&self, canonical: &str) -> bool {
        self.province_keys.contains(canonical)
    }

    /// Whether some official city or regency shares this canonical key.
    pub fn is_known_regency(&self, canonical: &str) -> bool {
        self.regency_keys.contains(canonical)
    }

    /// Reads the cached file; `Ok(None)` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, RegionError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(Self::parse(&text))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Downloads every province and its regencies from the public API.
    pub async fn fetch(base_url: &str) -> Result<Self, RegionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        let provinces: Vec<RegionEntry> = client
            .get(format!("{base_url}/provinces.json"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut regencies = BTreeSet::new();
        for province in &provinces {
            let entries: Vec<RegionEntry> = client
                .get(format!("{base_url}/regencies/{}.json", province.id))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            regencies.extend(entries.into_iter().map(|r| r.name));
        }

        Ok(Self::new(
            provinces.into_iter().map(|p| p.name).collect(),
            regencies,
        ))
    }

    /// Loads the cached file, or (when allowed) fetches and persists it.
    /// Without a file and without fetching, the whitelist is empty.
    pub async fn load_or_fetch(path: &Path, allow_fetch: bool) -> Result<Self, RegionError> {
        if let Some(whitelist) = Self::load(path)? {
            info!(
                provinces = whitelist.provinces.len(),
                regencies = whitelist.regencies.len(),
                "Region whitelist loaded from {}",
                path.display()
            );
            return Ok(whitelist);
        }
        if !allow_fetch {
            return Ok(Self::default());
        }

        info!("Fetching region whitelist from {REGIONS_API_BASE}");
        let whitelist = Self::fetch(REGIONS_API_BASE).await?;
        fs::write(path, whitelist.render())?;
        Ok(whitelist)
    }
}

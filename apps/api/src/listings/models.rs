use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Listing as scraped from the portal snapshot. Any field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListing {
    #[serde(rename = "posisi_magang", default, deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(rename = "mitra", default, deserialize_with = "lenient_text")]
    pub partner: Option<String>,
    #[serde(rename = "deskripsi", default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "lokasi_penempatan", default, deserialize_with = "lenient_text")]
    pub placement_location: Option<String>,
    #[serde(rename = "jumlah", default, deserialize_with = "lenient_count")]
    pub slots: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: Option<String>,
}

/// One internship opening with its derived location columns.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingRecord {
    pub position: Option<String>,
    pub partner: Option<String>,
    pub description: Option<String>,
    pub placement_location: Option<String>,
    pub slots: Option<u32>,
    pub slug: String,
    pub link: Option<String>,

    pub province: String,
    pub city: String,
    pub district: String,
    pub province_list: Vec<String>,
    pub city_list: Vec<String>,
    pub district_list: Vec<String>,
}

impl ListingRecord {
    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn partner(&self) -> Option<&str> {
        self.partner.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Accepts `3`, `"3"` or `" 3 "`; anything else (null, "-", 2.5) becomes `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Strings pass through and numbers become their text; anything else (null,
/// bool, array, object) becomes `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

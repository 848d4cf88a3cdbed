use csv::Writer;

use crate::listings::models::ListingRecord;

pub const EXPORT_FILE_NAME: &str = "lowongan_filtered.csv";

/// Display column names, in export order.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Posisi",
    "Mitra",
    "Provinsi",
    "Kota/Kab",
    "Divisi",
    "Deskripsi",
    "Link",
];

/// Serializes a filtered view as UTF-8 CSV with a display-name header row.
pub fn to_csv(rows: &[&ListingRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for row in rows {
        let slots = row.slots.map(|s| s.to_string()).unwrap_or_default();
        writer.write_record([
            row.position().unwrap_or_default(),
            row.partner().unwrap_or_default(),
            row.province.as_str(),
            row.city.as_str(),
            slots.as_str(),
            row.description().unwrap_or_default(),
            row.link.as_deref().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

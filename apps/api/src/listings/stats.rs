use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::listings::models::ListingRecord;

/// Length of every "top N" chart series.
pub const TOP_N: usize = 10;

/// Headline numbers shown above the listing table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_listings: usize,
    pub filtered_listings: usize,
    pub total_slots: u64,
    pub unique_partners: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub metrics: Metrics,
    pub top_provinces: Vec<ValueCount>,
    pub top_cities: Vec<ValueCount>,
    pub top_positions: Vec<ValueCount>,
    pub top_partners: Vec<ValueCount>,
}

pub fn compute_metrics(total_listings: usize, view: &[&ListingRecord]) -> Metrics {
    let partners: HashSet<&str> = view.iter().filter_map(|r| r.partner()).collect();
    Metrics {
        total_listings,
        filtered_listings: view.len(),
        total_slots: view.iter().map(|r| u64::from(r.slots.unwrap_or(0))).sum(),
        unique_partners: partners.len(),
    }
}

/// Counts occurrences, most frequent first. Ties keep first-seen order.
pub fn top_values<'a, I>(values: I, limit: usize) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut ranked: Vec<ValueCount> = order
        .into_iter()
        .map(|value| ValueCount {
            value: value.to_string(),
            count: counts[value],
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

pub fn build_report(total_listings: usize, view: &[&ListingRecord]) -> StatsReport {
    StatsReport {
        metrics: compute_metrics(total_listings, view),
        top_provinces: top_values(
            view.iter().flat_map(|r| r.province_list.iter().map(String::as_str)),
            TOP_N,
        ),
        top_cities: top_values(
            view.iter().flat_map(|r| r.city_list.iter().map(String::as_str)),
            TOP_N,
        ),
        top_positions: top_values(view.iter().filter_map(|r| r.position()), TOP_N),
        top_partners: top_values(view.iter().filter_map(|r| r.partner()), TOP_N),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(partner: Option<&str>, slots: Option<u32>, provinces: &[&str]) -> ListingRecord {
        ListingRecord {
            partner: partner.map(str::to_string),
            slots,
            province_list: provinces.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_over_view() {
        let records = vec![
            listing(Some("PT A"), Some(3), &[]),
            listing(Some("PT A"), None, &[]),
            listing(Some("PT B"), Some(2), &[]),
            listing(None, Some(1), &[]),
        ];
        let view: Vec<&ListingRecord> = records.iter().collect();

        let metrics = compute_metrics(10, &view);
        assert_eq!(
            metrics,
            Metrics {
                total_listings: 10,
                filtered_listings: 4,
                total_slots: 6,
                unique_partners: 2,
            }
        );
    }

    #[test]
    fn test_top_values_orders_by_count_then_first_seen() {
        let values = ["Bali", "Jawa", "Aceh", "Jawa", "Aceh", "Papua"];
        let top = top_values(values, 3);
        let pairs: Vec<(&str, usize)> = top.iter().map(|v| (v.value.as_str(), v.count)).collect();
        assert_eq!(pairs, vec![("Jawa", 2), ("Aceh", 2), ("Bali", 1)]);
    }

    #[test]
    fn test_top_values_of_nothing_is_empty() {
        assert!(top_values(std::iter::empty(), TOP_N).is_empty());
    }

    #[test]
    fn test_report_explodes_location_lists() {
        let records = vec![
            listing(Some("PT A"), None, &["Jawa", "Bali"]),
            listing(Some("PT B"), None, &["Jawa"]),
        ];
        let view: Vec<&ListingRecord> = records.iter().collect();
        let report = build_report(2, &view);

        assert_eq!(report.top_provinces[0], ValueCount { value: "Jawa".into(), count: 2 });
        assert_eq!(report.top_provinces.len(), 2);
        assert_eq!(report.top_partners.len(), 2);
        assert!(report.top_positions.is_empty());
    }
}

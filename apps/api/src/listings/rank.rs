//! Keyword relevance ranking for position recommendations.

use serde::Serialize;

use crate::listings::models::ListingRecord;

/// Number of ranked listings returned by the recommendation endpoint.
pub const RECOMMENDATION_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct RankedListing<'a> {
    #[serde(flatten)]
    pub listing: &'a ListingRecord,
    pub relevance: u32,
}

/// Scores every record against `keywords` and returns the ones with at least
/// one hit, highest relevance first. Ties keep their input order.
///
/// relevance = keywords found in description + keywords found in position.
/// A keyword counts at most once per field.
pub fn rank<'a, I>(records: I, keywords: &[String]) -> Vec<RankedListing<'a>>
where
    I: IntoIterator<Item = &'a ListingRecord>,
{
    let keywords: Vec<String> = keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .map(|k| k.to_lowercase())
        .collect();

    let mut ranked: Vec<RankedListing<'a>> = records
        .into_iter()
        .map(|listing| RankedListing {
            relevance: relevance(listing, &keywords),
            listing,
        })
        .filter(|r| r.relevance > 0)
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    ranked
}

fn relevance(listing: &ListingRecord, keywords: &[String]) -> u32 {
    count_hits(listing.description(), keywords) + count_hits(listing.position(), keywords)
}

fn count_hits(text: Option<&str>, keywords: &[String]) -> u32 {
    let Some(text) = text else {
        return 0;
    };
    let text = text.to_lowercase();
    keywords.iter().filter(|k| text.contains(k.as_str())).count() as u32
}

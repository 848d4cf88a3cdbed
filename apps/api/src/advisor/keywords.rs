//! Keyword-driven recommendations: ask the model for keywords describing a
//! desired position, then rank listings by how many of them they mention.

use std::sync::OnceLock;

use regex::Regex;

use crate::advisor::prompts::{KEYWORD_PROMPT_TEMPLATE, KEYWORD_SYSTEM};
use crate::errors::AppError;
use crate::listings::models::ListingRecord;
use crate::listings::rank::{rank, RankedListing, RECOMMENDATION_LIMIT};
use crate::llm_client::prompts::{NO_EXTRA_TEXT, REPLY_IN_INDONESIAN};
use crate::llm_client::ChatModel;

static KEYWORD_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn keyword_separator() -> &'static Regex {
    KEYWORD_SEPARATOR
        .get_or_init(|| Regex::new(r"[,\n]+").expect("Failed to compile keyword separator regex"))
}

/// Splits a model reply on commas and newlines.
pub fn parse_keywords(reply: &str) -> Vec<String> {
    keyword_separator()
        .split(reply)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_keyword_prompt(position: &str) -> String {
    format!(
        "{}\n\n{}\n{}",
        KEYWORD_PROMPT_TEMPLATE.replace("{position}", position),
        NO_EXTRA_TEXT,
        REPLY_IN_INDONESIAN
    )
}

/// Asks the model for search keywords. An empty reply is a user-facing error.
pub async fn generate_keywords(
    llm: &dyn ChatModel,
    position: &str,
    api_key: Option<&str>,
) -> Result<Vec<String>, AppError> {
    let reply = llm
        .complete(KEYWORD_SYSTEM, &build_keyword_prompt(position), api_key)
        .await?;

    let keywords = parse_keywords(&reply);
    if keywords.is_empty() {
        return Err(AppError::Validation(
            "No keywords were generated for this position".to_string(),
        ));
    }
    Ok(keywords)
}

/// Top listings for the given keywords.
pub fn recommend<'a>(view: Vec<&'a ListingRecord>, keywords: &[String]) -> Vec<RankedListing<'a>> {
    let mut ranked = rank(view, keywords);
    ranked.truncate(RECOMMENDATION_LIMIT);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::CannedModel;

    #[test]
    fn test_parse_keywords_splits_commas_and_lines() {
        let reply = "SQL, Excel\nPower BI,,\n  Tableau  \n\nPython";
        assert_eq!(
            parse_keywords(reply),
            vec!["SQL", "Excel", "Power BI", "Tableau", "Python"]
        );
    }

    #[test]
    fn test_parse_keywords_of_blank_reply_is_empty() {
        assert!(parse_keywords(" \n , \n").is_empty());
    }

    #[test]
    fn test_prompt_mentions_position() {
        let prompt = build_keyword_prompt("Data Analyst");
        assert!(prompt.contains("\"Data Analyst\""));
        assert!(!prompt.contains("{position}"));
    }

    #[test]
    fn test_recommend_truncates_to_limit() {
        let records: Vec<ListingRecord> = (0..30)
            .map(|i| ListingRecord {
                position: Some(format!("Data Intern {i}")),
                ..Default::default()
            })
            .collect();
        let view: Vec<&ListingRecord> = records.iter().collect();

        let ranked = recommend(view, &["data".to_string()]);
        assert_eq!(ranked.len(), RECOMMENDATION_LIMIT);
        assert_eq!(ranked[0].listing.position.as_deref(), Some("Data Intern 0"));
    }

    #[tokio::test]
    async fn test_generate_keywords_parses_reply() {
        let model = CannedModel::replying("SQL, Excel");
        let keywords = generate_keywords(&model, "Data Analyst", Some("key"))
            .await
            .unwrap();
        assert_eq!(keywords, vec!["SQL", "Excel"]);
        assert!(model.calls.lock().unwrap()[0].contains("Data Analyst"));
    }

    #[tokio::test]
    async fn test_generate_keywords_empty_reply_is_an_error() {
        let model = CannedModel::replying(" , ");
        let err = generate_keywords(&model, "Data Analyst", Some("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_generate_keywords_surfaces_model_failure() {
        let model = CannedModel::failing(500);
        let err = generate_keywords(&model, "Data Analyst", Some("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}

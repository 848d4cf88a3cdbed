use serde::Serialize;
use tracing::info;

use crate::advisor::prompts::{CV_INSTRUCTIONS, CV_SYSTEM, DEFINITION_NOT_FOUND};
use crate::advisor::wiki::DefinitionLookup;
use crate::errors::AppError;
use crate::listings::models::ListingRecord;
use crate::llm_client::prompts::REPLY_IN_INDONESIAN;
use crate::llm_client::ChatModel;

#[derive(Debug, Serialize)]
pub struct CvEvaluation {
    pub slug: String,
    pub position: Option<String>,
    pub partner: Option<String>,
    pub definition: String,
    /// Model reply, markdown.
    pub evaluation: String,
}

/// First word of the listing's position, used as the definition lookup title.
pub fn position_title(listing: &ListingRecord) -> Option<&str> {
    listing.position()?.split_whitespace().next()
}

pub fn build_cv_prompt(
    listing: &ListingRecord,
    definition: &str,
    resume_text: &str,
    procedure: &str,
) -> String {
    format!(
        "{CV_INSTRUCTIONS}\n\n{procedure}\n\n\
         ### Deskripsi Lowongan\n\
         Posisi : {position}\n\
         Mitra  : {partner}\n\
         {description}\n\n\
         ### Definisi Posisi\n\
         {definition}\n\n\
         ### CV Kandidat\n\
         {resume_text}\n\n\
         {REPLY_IN_INDONESIAN}",
        position = listing.position().unwrap_or_default(),
        partner = listing.partner().unwrap_or_default(),
        description = listing.description().unwrap_or_default(),
    )
}

/// Evaluates a resume against one listing with a single model call.
pub async fn analyze_cv(
    llm: &dyn ChatModel,
    definitions: &dyn DefinitionLookup,
    listing: &ListingRecord,
    resume_text: &str,
    procedure: &str,
    api_key: Option<&str>,
) -> Result<CvEvaluation, AppError> {
    let definition = match position_title(listing) {
        Some(title) => definitions.summary(title).await,
        None => None,
    }
    .unwrap_or_else(|| DEFINITION_NOT_FOUND.to_string());

    let prompt = build_cv_prompt(listing, &definition, resume_text, procedure);
    info!(slug = %listing.slug, prompt_chars = prompt.len(), "Requesting CV evaluation");
    let evaluation = llm.complete(CV_SYSTEM, &prompt, api_key).await?;

    Ok(CvEvaluation {
        slug: listing.slug.clone(),
        position: listing.position.clone(),
        partner: listing.partner.clone(),
        definition,
        evaluation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::prompts::DEFAULT_CV_PROCEDURE;
    use crate::advisor::wiki::StaticDefinitions;
    use crate::llm_client::CannedModel;

    fn listing() -> ListingRecord {
        ListingRecord {
            slug: "data-analyst-bank".to_string(),
            position: Some("Data Analyst Intern".to_string()),
            partner: Some("Bank Nusantara".to_string()),
            description: Some("Mengolah data transaksi dengan SQL.".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_position_title_is_first_word() {
        assert_eq!(position_title(&listing()), Some("Data"));
        assert_eq!(position_title(&ListingRecord::default()), None);

        let blank = ListingRecord {
            position: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(position_title(&blank), None);
    }

    #[test]
    fn test_prompt_sections_in_order() {
        let prompt = build_cv_prompt(&listing(), "A definition.", "CV body", DEFAULT_CV_PROCEDURE);
        let order = [
            "### INSTRUKSI",
            "#### Prosedur",
            "### Deskripsi Lowongan",
            "Posisi : Data Analyst Intern",
            "Mitra  : Bank Nusantara",
            "Mengolah data transaksi",
            "### Definisi Posisi",
            "A definition.",
            "### CV Kandidat",
            "CV body",
        ];
        let mut cursor = 0;
        for marker in order {
            let found = prompt[cursor..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing or out of order: {marker}"));
            cursor += found + marker.len();
        }
    }

    #[tokio::test]
    async fn test_analyze_uses_definition_for_first_word() {
        let model = CannedModel::replying("Skor Kecocokan: 72");
        let definitions = StaticDefinitions::with("Data", "Data are facts.");

        let result = analyze_cv(
            &model,
            &definitions,
            &listing(),
            "CV body",
            DEFAULT_CV_PROCEDURE,
            Some("key"),
        )
        .await
        .unwrap();

        assert_eq!(result.definition, "Data are facts.");
        assert_eq!(result.evaluation, "Skor Kecocokan: 72");
        assert_eq!(result.slug, "data-analyst-bank");
        assert!(model.calls.lock().unwrap()[0].contains("Data are facts."));
    }

    #[tokio::test]
    async fn test_analyze_falls_back_when_definition_missing() {
        let model = CannedModel::replying("ok");
        let result = analyze_cv(
            &model,
            &StaticDefinitions::empty(),
            &listing(),
            "CV body",
            DEFAULT_CV_PROCEDURE,
            Some("key"),
        )
        .await
        .unwrap();
        assert_eq!(result.definition, DEFINITION_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_without_key_is_validation_error() {
        let model = CannedModel::replying("ok");
        let err = analyze_cv(
            &model,
            &StaticDefinitions::empty(),
            &listing(),
            "CV body",
            DEFAULT_CV_PROCEDURE,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/translate`.
///
/// Language fields are optional overrides; anything missing is filled from
/// the caller's profile, then from defaults.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranslationRequest {
    #[validate(
        required(message = "Request body must include 'word'"),
        length(min = 1, message = "'word' cannot be empty")
    )]
    pub word: Option<String>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub sentence: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub word: String,
    pub source_language: String,
    pub target_language: String,
    pub primary_translation: String,
    #[serde(default)]
    pub alternative_translations: Vec<String>,
    #[serde(default)]
    pub examples: Vec<ExampleSentence>,
    #[serde(default)]
    pub notes: String,
}

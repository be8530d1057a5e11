use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of `POST /api/random-phrase`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhraseRequest {
    #[validate(
        required(message = "Request body must include 'words' array"),
        length(min = 1, message = "'words' must be a non-empty array"),
        custom(function = "validate_words")
    )]
    pub words: Option<Vec<String>>,
}

impl PhraseRequest {
    /// Words of a validated request.
    pub fn into_words(self) -> Vec<String> {
        self.words.unwrap_or_default()
    }
}

fn validate_words(words: &Vec<String>) -> Result<(), ValidationError> {
    if words.iter().any(|w| w.trim().is_empty()) {
        let mut err = ValidationError::new("empty_word");
        err.message = Some("'words' must not contain empty strings".into());
        return Err(err);
    }
    Ok(())
}

/// Generated phrase together with the words it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseResult {
    pub phrase: String,
    pub words: Vec<String>,
}

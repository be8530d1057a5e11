//! Generation gateway: resolved parameters in, result DTO out.

use crate::dtos::{PhraseResult, TranslationResult};
use crate::services::context::{PhraseParams, TranslationParams};
use crate::services::crew::{phrase_crew, translation_crew, Crew, CrewInputs};
use crate::services::providers::{ChatProvider, ProviderError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

pub use crate::services::crew::GenerationOutcome;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Failed(String),

    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<ProviderError> for GenerationError {
    fn from(err: ProviderError) -> Self {
        GenerationError::Failed(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::InternalError(anyhow::anyhow!(err))
    }
}

#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate_phrase(&self, params: &PhraseParams)
        -> Result<PhraseResult, GenerationError>;

    async fn translate(
        &self,
        params: &TranslationParams,
    ) -> Result<TranslationResult, GenerationError>;
}

/// Wrap unstructured phrase output, echoing the words that were asked for.
pub fn phrase_from_raw(raw: String, words: &[String]) -> PhraseResult {
    PhraseResult {
        phrase: raw,
        words: words.to_vec(),
    }
}

/// Wrap unstructured translation output as the primary translation.
pub fn translation_from_raw(raw: String, params: &TranslationParams) -> TranslationResult {
    TranslationResult {
        word: params.word.clone(),
        source_language: params.source_language.clone(),
        target_language: params.target_language.clone(),
        primary_translation: raw,
        alternative_translations: Vec::new(),
        examples: Vec::new(),
        notes: String::new(),
    }
}

/// Runs the phrase and translation crews against a chat provider, each call
/// bounded by `timeout`.
pub struct CrewGateway {
    provider: Arc<dyn ChatProvider>,
    timeout: Duration,
    phrase: Crew,
    translation: Crew,
}

impl CrewGateway {
    pub fn new(provider: Arc<dyn ChatProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            phrase: phrase_crew(),
            translation: translation_crew(),
        }
    }

    async fn run<T: DeserializeOwned>(
        &self,
        crew: &Crew,
        inputs: CrewInputs,
    ) -> Result<GenerationOutcome<T>, GenerationError> {
        let started = Instant::now();

        let result = match tokio::time::timeout(
            self.timeout,
            crew.kickoff::<T>(self.provider.as_ref(), &inputs),
        )
        .await
        {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(GenerationError::from(e)),
            Err(_) => Err(GenerationError::TimedOut(self.timeout)),
        };

        let outcome = match &result {
            Ok(o) => o.kind(),
            Err(_) => "failed",
        };
        tracing::Span::current().record("outcome", outcome);

        metrics::counter!(
            "lingo_generation_total",
            "crew" => crew.name,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("lingo_generation_duration_seconds", "crew" => crew.name)
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(GenerationOutcome::Raw(_)) => {
                tracing::warn!(crew = crew.name, "Crew output did not match schema, using raw text")
            }
            Err(e) => tracing::error!(crew = crew.name, error = %e, "Crew run failed"),
            Ok(_) => {}
        }

        result
    }
}

#[async_trait]
impl GenerationGateway for CrewGateway {
    #[tracing::instrument(
        name = "generate_phrase",
        skip(self, params),
        fields(crew = "phrase", model = %self.provider.model(), words = params.words.len(), outcome)
    )]
    async fn generate_phrase(
        &self,
        params: &PhraseParams,
    ) -> Result<PhraseResult, GenerationError> {
        let mut inputs = CrewInputs::new();
        inputs.insert("words", encode(&params.words)?);
        inputs.insert("user_context", encode(&params.user_context)?);

        Ok(match self.run::<PhraseResult>(&self.phrase, inputs).await? {
            GenerationOutcome::Structured(result) => result,
            GenerationOutcome::Raw(raw) => phrase_from_raw(raw, &params.words),
        })
    }

    #[tracing::instrument(
        name = "translate_word",
        skip(self, params),
        fields(crew = "translation", model = %self.provider.model(), outcome)
    )]
    async fn translate(
        &self,
        params: &TranslationParams,
    ) -> Result<TranslationResult, GenerationError> {
        let mut inputs = CrewInputs::new();
        inputs.insert("word", params.word.clone());
        inputs.insert("source_language", params.source_language.clone());
        inputs.insert("target_language", params.target_language.clone());
        inputs.insert("user_context", params.user_context.clone());

        Ok(match self.run::<TranslationResult>(&self.translation, inputs).await? {
            GenerationOutcome::Structured(result) => result,
            GenerationOutcome::Raw(raw) => translation_from_raw(raw, params),
        })
    }
}

/// Phrase crew inputs travel JSON-encoded.
fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, GenerationError> {
    serde_json::to_string(value).map_err(|e| GenerationError::Failed(e.to_string()))
}

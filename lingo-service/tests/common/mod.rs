//! Shared fixtures for lingo-service integration tests.
//!
//! The router is exercised with in-memory collaborators so that every stage
//! of the request pipeline can be observed without Supabase or an LLM.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use lingo_service::config::{CorsConfig, LingoConfig, LlmConfig, LlmProvider, SupabaseConfig};
use lingo_service::dtos::{ExampleSentence, PhraseResult, TranslationResult};
use lingo_service::models::{Credential, UserIdentity, UserProfile};
use lingo_service::services::{
    AuthError, AuthResolver, GenerationError, GenerationGateway, IdentityVerifier, PhraseParams,
    ProfileError, ProfileStore, TranslationParams,
};
use lingo_service::startup::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_ORIGIN: &str = "http://localhost:5173";

pub fn test_config(supabase_url: &str, llm_base_url: &str) -> LingoConfig {
    LingoConfig {
        common: Config {
            port: 0,
            ..Config::default()
        },
        supabase: SupabaseConfig {
            url: supabase_url.to_string(),
            anon_key: Secret::new("anon-key".to_string()),
        },
        llm: LlmConfig {
            provider: LlmProvider::Groq,
            api_key: Secret::new("test-key".to_string()),
            model: "test-model".to_string(),
            base_url: llm_base_url.to_string(),
            timeout_secs: 5,
        },
        cors: CorsConfig {
            allowed_origins: vec![TEST_ORIGIN.to_string()],
        },
    }
}

/// Accepts exactly one token and remembers every token it was shown.
pub struct FakeVerifier {
    valid_token: String,
    user_id: String,
    seen: Mutex<Vec<String>>,
}

impl FakeVerifier {
    pub fn accepting(token: &str, user_id: &str) -> Self {
        Self {
            valid_token: token.to_string(),
            user_id: user_id.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, credential: &Credential) -> Result<UserIdentity, AuthError> {
        self.seen.lock().unwrap().push(credential.expose().to_string());

        if credential.expose() != self.valid_token {
            return Err(AuthError::AuthenticationFailed("invalid JWT".to_string()));
        }

        UserIdentity::new(self.user_id.clone())
            .ok_or_else(|| AuthError::AuthenticationFailed("no user".to_string()))
    }
}

pub enum ProfileBehaviour {
    Present(UserProfile),
    Absent,
    Failing,
}

/// Profile store with a fixed answer; records `(user_id, token)` per call.
pub struct FakeProfileStore {
    behaviour: ProfileBehaviour,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeProfileStore {
    pub fn new(behaviour: ProfileBehaviour) -> Self {
        Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn fetch_profile(
        &self,
        identity: &UserIdentity,
        credential: &Credential,
    ) -> Result<Option<UserProfile>, ProfileError> {
        self.calls
            .lock()
            .unwrap()
            .push((identity.to_string(), credential.expose().to_string()));

        match &self.behaviour {
            ProfileBehaviour::Present(profile) => Ok(Some(profile.clone())),
            ProfileBehaviour::Absent => Ok(None),
            ProfileBehaviour::Failing => Err(ProfileError::Rejected {
                status: 503,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

/// Echoes its inputs back as results and records every call.
#[derive(Default)]
pub struct RecordingGateway {
    failure: Option<String>,
    phrase_calls: Mutex<Vec<PhraseParams>>,
    translate_calls: Mutex<Vec<TranslationParams>>,
}

impl RecordingGateway {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn phrase_calls(&self) -> Vec<PhraseParams> {
        self.phrase_calls.lock().unwrap().clone()
    }

    pub fn translate_calls(&self) -> Vec<TranslationParams> {
        self.translate_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationGateway for RecordingGateway {
    async fn generate_phrase(
        &self,
        params: &PhraseParams,
    ) -> Result<PhraseResult, GenerationError> {
        self.phrase_calls.lock().unwrap().push(params.clone());
        if let Some(message) = &self.failure {
            return Err(GenerationError::Failed(message.clone()));
        }

        Ok(PhraseResult {
            phrase: format!("A phrase with {}", params.words.join(" and ")),
            words: params.words.clone(),
        })
    }

    async fn translate(
        &self,
        params: &TranslationParams,
    ) -> Result<TranslationResult, GenerationError> {
        self.translate_calls.lock().unwrap().push(params.clone());
        if let Some(message) = &self.failure {
            return Err(GenerationError::Failed(message.clone()));
        }

        Ok(TranslationResult {
            word: params.word.clone(),
            source_language: params.source_language.clone(),
            target_language: params.target_language.clone(),
            primary_translation: "hola".to_string(),
            alternative_translations: vec!["buenas".to_string()],
            examples: vec![ExampleSentence {
                sentence: "Hola, ¿qué tal?".to_string(),
                translation: "Hello, how are you?".to_string(),
            }],
            notes: String::new(),
        })
    }
}

/// Router wired to fakes, with handles on each fake for assertions.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub verifier: Arc<FakeVerifier>,
    pub profiles: Arc<FakeProfileStore>,
    pub gateway: Arc<RecordingGateway>,
}

impl TestApp {
    pub fn new(profile: ProfileBehaviour) -> Self {
        Self::with_gateway(profile, RecordingGateway::default())
    }

    pub fn with_gateway(profile: ProfileBehaviour, gateway: RecordingGateway) -> Self {
        let verifier = Arc::new(FakeVerifier::accepting("abc123", "u1"));
        let profiles = Arc::new(FakeProfileStore::new(profile));
        let gateway = Arc::new(gateway);

        let state = AppState {
            auth: AuthResolver::new(verifier.clone()),
            profiles: profiles.clone(),
            generator: gateway.clone(),
        };
        let config = test_config("http://127.0.0.1:1", "http://127.0.0.1:1");
        let router = build_router(state.clone(), &config.cors);

        Self {
            router,
            state,
            verifier,
            profiles,
            gateway,
        }
    }

    /// POST a raw body with an optional `Authorization` header.
    pub async fn post(
        &self,
        uri: &str,
        authorization: Option<&str>,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

/// Thread-local subscriber that gives every span an OpenTelemetry context.
pub struct OtelSpans {
    _provider: opentelemetry_sdk::trace::TracerProvider,
    _guard: tracing::subscriber::DefaultGuard,
}

pub fn otel_spans() -> OtelSpans {
    use opentelemetry::trace::TracerProvider as _;
    use tracing_subscriber::layer::SubscriberExt;

    let provider = opentelemetry_sdk::trace::TracerProvider::builder().build();
    let tracer = provider.tracer("lingo-service-tests");
    let subscriber =
        tracing_subscriber::registry().with(tracing_opentelemetry::layer().with_tracer(tracer));

    OtelSpans {
        _provider: provider,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}

pub fn profile(context: &str, native: &str, target: &str) -> UserProfile {
    UserProfile {
        context: Some(context.to_string()),
        native_language: Some(native.to_string()),
        target_language: Some(target.to_string()),
    }
}

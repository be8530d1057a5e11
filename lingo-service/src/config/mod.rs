use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Upper bound on a single generation call, including provider latency.
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;

const DEFAULT_SUPABASE_URL: &str = "http://127.0.0.1:54321";

/// Browser origins allowed to call `/api/*` during local development.
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:5173,http://localhost:3000,http://127.0.0.1:5173,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct LingoConfig {
    pub common: core_config::Config,
    pub supabase: SupabaseConfig,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// OpenAI-compatible chat backends the crews can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    DeepSeek,
    Groq,
}

impl LlmProvider {
    /// DeepSeek when its key is present, Groq otherwise.
    pub fn select(deepseek_key: Option<&str>) -> Self {
        match deepseek_key {
            Some(key) if !key.is_empty() => LlmProvider::DeepSeek,
            _ => LlmProvider::Groq,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "deepseek-chat",
            LlmProvider::Groq => "llama-3.3-70b-versatile",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "https://api.deepseek.com/v1",
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "DEEPSEEK_API_KEY",
            LlmProvider::Groq => "GROQ_API_KEY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "deepseek",
            LlmProvider::Groq => "groq",
        }
    }
}

impl LingoConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider = LlmProvider::select(env::var("DEEPSEEK_API_KEY").ok().as_deref());

        Ok(LingoConfig {
            common: common_config,
            supabase: SupabaseConfig {
                url: get_env("SUPABASE_URL", Some(DEFAULT_SUPABASE_URL), is_prod)?,
                anon_key: Secret::new(get_env("SUPABASE_ANON_KEY", Some(""), is_prod)?),
            },
            llm: LlmConfig {
                provider,
                api_key: Secret::new(get_env(provider.api_key_var(), Some(""), is_prod)?),
                model: get_env("LLM_MODEL", Some(provider.default_model()), false)?,
                base_url: get_env("LLM_BASE_URL", Some(provider.default_base_url()), false)?,
                timeout_secs: parse_timeout_secs(&get_env(
                    "GENERATION_TIMEOUT_SECS",
                    Some(&DEFAULT_GENERATION_TIMEOUT_SECS.to_string()),
                    false,
                )?)?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some(DEFAULT_CORS_ORIGINS),
                    false,
                )?),
            },
        })
    }
}

/// Whole seconds, at least one.
fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::ConfigError(anyhow::anyhow!(
            "GENERATION_TIMEOUT_SECS must be greater than zero"
        ))),
        Ok(secs) => Ok(secs),
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "GENERATION_TIMEOUT_SECS must be a whole number of seconds, got '{}': {}",
            raw,
            e
        ))),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

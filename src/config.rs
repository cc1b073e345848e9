use crate::domain::{InferenceConfig, MaxTokens, ModelName, Temperature, TopP};
use crate::error::Error;
use crate::providers::ProviderId;
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub use ::config::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub providers: ProviderSettings,
    pub inference: InferenceSettings,
    pub http_client: HttpClientSettings,
    pub errors: ErrorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub default_provider: String,
    pub openai: OpenAiSettings,
    pub bedrock: BedrockSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiSettings {
    pub enabled: bool,
    pub api_base: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BedrockSettings {
    pub enabled: bool,
    pub region: String,
    pub model_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpClientSettings {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub pool_max_idle_per_host: usize,
    pub tcp_keepalive_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ErrorSettings {
    /// Pass upstream error text through to clients
    pub expose_details: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 3000)?
            .set_default("application.environment", environment.clone())?
            .set_default("providers.default_provider", ProviderId::OpenAi.to_string())?
            .set_default("providers.openai.enabled", true)?
            .set_default("providers.openai.api_base", "https://api.openai.com/v1")?
            .set_default("providers.openai.model", "gpt-4o")?
            .set_default("providers.openai.api_key_env", "OPENAI_API_KEY")?
            .set_default("providers.bedrock.enabled", true)?
            .set_default("providers.bedrock.region", region)?
            .set_default(
                "providers.bedrock.model_id",
                "us.anthropic.claude-3-5-sonnet-20240620-v1:0",
            )?
            .set_default("inference.max_tokens", 2048)?
            .set_default("inference.temperature", 0.7)?
            .set_default("inference.top_p", 0.9)?
            .set_default("http_client.connect_timeout_ms", 10_000)?
            .set_default("http_client.read_timeout_ms", 300_000)?
            .set_default("http_client.pool_max_idle_per_host", 200)?
            .set_default("http_client.tcp_keepalive_ms", 60_000)?
            .set_default("errors.expose_details", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("CHAT_RELAY").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

impl ProviderSettings {
    pub fn default_provider(&self) -> Result<ProviderId, Error> {
        self.default_provider
            .parse()
            .map_err(|e| Error::invalid_setting("providers.default_provider", e))
    }
}

impl InferenceSettings {
    /// Validate the raw values into inference parameters
    pub fn to_config(&self) -> Result<InferenceConfig, Error> {
        Ok(InferenceConfig {
            max_tokens: MaxTokens::try_new(self.max_tokens)
                .map_err(|e| Error::invalid_setting("inference.max_tokens", e))?,
            temperature: Temperature::try_new(self.temperature)
                .map_err(|e| Error::invalid_setting("inference.temperature", e))?,
            top_p: TopP::try_new(self.top_p)
                .map_err(|e| Error::invalid_setting("inference.top_p", e))?,
        })
    }
}

impl OpenAiSettings {
    pub fn model_name(&self) -> Result<ModelName, Error> {
        ModelName::try_new(self.model.clone())
            .map_err(|e| Error::invalid_setting("providers.openai.model", e))
    }

    /// API key from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env).ok().filter(|key| !key.is_empty())
    }
}

impl BedrockSettings {
    pub fn model_name(&self) -> Result<ModelName, Error> {
        ModelName::try_new(self.model_id.clone())
            .map_err(|e| Error::invalid_setting("providers.bedrock.model_id", e))
    }
}

impl HttpClientSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn tcp_keepalive(&self) -> Duration {
        Duration::from_millis(self.tcp_keepalive_ms)
    }
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            read_timeout_ms: 300_000,
            pool_max_idle_per_host: 200,
            tcp_keepalive_ms: 60_000,
        }
    }
}

use crate::chat::{ChatService, ErrorExposure};
use crate::config::Settings;
use crate::error::Error;
use crate::providers::bedrock::{client::build_client, types::AwsRegion, BedrockProvider};
use crate::providers::openai::OpenAiProvider;
use crate::providers::{ModelSelector, ProviderId};
use crate::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    providers: Vec<ProviderId>,
    router: axum::Router,
}

impl Application {
    /// Load settings from the environment and build the application
    #[instrument]
    pub async fn new() -> Result<Self> {
        let settings = Settings::new()?;
        Self::build(settings).await
    }

    /// Build the application from explicit settings
    #[instrument(skip_all, fields(environment = %settings.application.environment))]
    pub async fn build(settings: Settings) -> Result<Self> {
        let default_provider = settings.providers.default_provider()?;
        let inference = settings.inference.to_config()?;
        let selector = build_selector(&settings, default_provider).await?;

        let providers: Vec<ProviderId> = ProviderId::ALL
            .into_iter()
            .filter(|id| selector.is_registered(*id))
            .collect();

        if !selector.is_registered(default_provider) {
            warn!(
                provider = %default_provider,
                "Default provider is not enabled; requests without a provider will be rejected"
            );
        }

        let exposure = ErrorExposure {
            expose_details: settings.errors.expose_details,
        };
        let router = ChatService::new(selector, inference, exposure).into_router();

        Ok(Self {
            settings,
            providers,
            router,
        })
    }

    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.settings.bind_address()).await?;
        info!(
            address = %listener.local_addr()?,
            providers = ?self.providers,
            "Starting Chat Relay server"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Providers registered at startup
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }
}

/// Construct every enabled provider and register it
async fn build_selector(settings: &Settings, default_provider: ProviderId) -> Result<ModelSelector> {
    let mut selector = ModelSelector::new(default_provider);
    let providers = &settings.providers;

    if providers.openai.enabled {
        let http = OpenAiProvider::http_client(&settings.http_client)?;
        let model = providers.openai.model_name()?;
        info!(api_base = %providers.openai.api_base, model = %model, "Registering OpenAI-compatible provider");
        selector.register(Arc::new(OpenAiProvider::new(
            http,
            &providers.openai.api_base,
            providers.openai.api_key(),
            model,
        )));
    }

    if providers.bedrock.enabled {
        let region = AwsRegion::try_new(providers.bedrock.region.clone())
            .map_err(|e| Error::invalid_setting("providers.bedrock.region", e))?;
        let model = providers.bedrock.model_name()?;
        let client = build_client(&region, &settings.http_client).await;
        info!(region = %region, model = %model, "Registering Bedrock provider");
        selector.register(Arc::new(BedrockProvider::new(client, model)));
    }

    Ok(selector)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Model selection: maps a request's provider/model choice to a provider
//!
//! Selection is an explicit lookup. A named provider wins; otherwise a
//! model name is matched against the prefix table in
//! [`constants::model_prefixes`] (longest prefix wins); otherwise the
//! configured default provider is used.

use crate::domain::ModelName;
use crate::providers::{constants, ChatProvider, ProviderError, ProviderId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Provider choice carried by a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderSelection {
    /// Use the model-name prefix if any, else the configured default
    #[default]
    Default,
    Explicit(ProviderId),
}

impl FromStr for ProviderSelection {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(constants::provider_names::DEFAULT) {
            Ok(Self::Default)
        } else {
            s.parse().map(Self::Explicit)
        }
    }
}

/// A provider bound to the model it should run
#[derive(Clone)]
pub struct ModelBinding {
    pub provider: Arc<dyn ChatProvider>,
    pub model: ModelName,
}

impl ModelBinding {
    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("provider", &self.provider.id())
            .field("model", &self.model)
            .finish()
    }
}

/// Lookup table from provider identifier to a shared provider client
pub struct ModelSelector {
    providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
    default_provider: ProviderId,
}

impl ModelSelector {
    pub fn new(default_provider: ProviderId) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
        }
    }

    /// Register a provider, replacing any previous one with the same id
    pub fn register(&mut self, provider: Arc<dyn ChatProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    pub fn is_registered(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    /// Resolve a provider choice and optional model name to a binding
    ///
    /// Fails with [`ProviderError::Configuration`] when the resolved provider
    /// is not registered or the model name is blank.
    pub fn select(
        &self,
        selection: ProviderSelection,
        model: Option<&str>,
    ) -> Result<ModelBinding, ProviderError> {
        let id = match selection {
            ProviderSelection::Explicit(id) => id,
            ProviderSelection::Default => model
                .and_then(provider_for_model)
                .unwrap_or(self.default_provider),
        };

        let provider = self.providers.get(&id).cloned().ok_or_else(|| {
            ProviderError::Configuration(format!("provider '{id}' is not configured"))
        })?;

        let model = match model {
            Some(name) => ModelName::try_new(name.to_string())
                .map_err(|e| ProviderError::Configuration(format!("invalid model name: {e}")))?,
            None => provider.default_model().clone(),
        };

        debug!(provider = %id, model = %model, "Selected model");
        Ok(ModelBinding { provider, model })
    }
}

/// Provider implied by a model name, using the longest matching prefix
pub fn provider_for_model(model: &str) -> Option<ProviderId> {
    constants::model_prefixes::TABLE
        .iter()
        .filter(|(prefix, _)| model.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChunkStream, CompletionRequest};
    use async_trait::async_trait;
    use rstest::rstest;

    struct StubProvider {
        id: ProviderId,
        model: ModelName,
    }

    impl StubProvider {
        fn arc(id: ProviderId, model: &str) -> Arc<dyn ChatProvider> {
            Arc::new(Self {
                id,
                model: ModelName::try_new(model.to_string()).unwrap(),
            })
        }
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn default_model(&self) -> &ModelName {
            &self.model
        }

        async fn stream_chat(
            &self,
            _request: CompletionRequest,
        ) -> Result<ChunkStream, ProviderError> {
            Ok(Box::pin(futures_util::stream::empty()))
        }
    }

    fn selector() -> ModelSelector {
        let mut selector = ModelSelector::new(ProviderId::OpenAi);
        selector.register(StubProvider::arc(ProviderId::OpenAi, "gpt-4o"));
        selector.register(StubProvider::arc(
            ProviderId::Bedrock,
            "us.anthropic.claude-3-5-sonnet-20240620-v1:0",
        ));
        selector
    }

    #[rstest]
    #[case("default", ProviderSelection::Default)]
    #[case("DEFAULT", ProviderSelection::Default)]
    #[case("openai", ProviderSelection::Explicit(ProviderId::OpenAi))]
    #[case("bedrock", ProviderSelection::Explicit(ProviderId::Bedrock))]
    fn test_selection_parses(#[case] input: &str, #[case] expected: ProviderSelection) {
        assert_eq!(input.parse::<ProviderSelection>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_selection_is_configuration_error() {
        let error = "azure".parse::<ProviderSelection>().unwrap_err();
        assert!(matches!(error, ProviderError::Configuration(_)));
    }

    #[rstest]
    #[case("gpt-4o-mini", Some(ProviderId::OpenAi))]
    #[case("o1-preview", Some(ProviderId::OpenAi))]
    #[case("anthropic.claude-3-haiku-20240307-v1:0", Some(ProviderId::Bedrock))]
    #[case("us.anthropic.claude-3-5-sonnet-20240620-v1:0", Some(ProviderId::Bedrock))]
    #[case("meta.llama3-70b-instruct-v1:0", Some(ProviderId::Bedrock))]
    #[case("llama3", None)]
    #[case("", None)]
    fn test_provider_for_model(#[case] model: &str, #[case] expected: Option<ProviderId>) {
        assert_eq!(provider_for_model(model), expected);
    }

    #[test]
    fn test_default_selection_uses_default_provider_and_model() {
        let binding = selector().select(ProviderSelection::Default, None).unwrap();
        assert_eq!(binding.provider_id(), ProviderId::OpenAi);
        assert_eq!(binding.model.as_ref(), "gpt-4o");
    }

    #[test]
    fn test_explicit_selection_wins() {
        let binding = selector()
            .select(ProviderSelection::Explicit(ProviderId::Bedrock), None)
            .unwrap();
        assert_eq!(binding.provider_id(), ProviderId::Bedrock);
        assert_eq!(
            binding.model.as_ref(),
            "us.anthropic.claude-3-5-sonnet-20240620-v1:0"
        );
    }

    #[test]
    fn test_model_prefix_routes_default_selection() {
        let binding = selector()
            .select(
                ProviderSelection::Default,
                Some("anthropic.claude-3-haiku-20240307-v1:0"),
            )
            .unwrap();
        assert_eq!(binding.provider_id(), ProviderId::Bedrock);
        assert_eq!(
            binding.model.as_ref(),
            "anthropic.claude-3-haiku-20240307-v1:0"
        );
    }

    #[test]
    fn test_unmatched_model_falls_back_to_default_provider() {
        let binding = selector()
            .select(ProviderSelection::Default, Some("my-finetune"))
            .unwrap();
        assert_eq!(binding.provider_id(), ProviderId::OpenAi);
        assert_eq!(binding.model.as_ref(), "my-finetune");
    }

    #[test]
    fn test_unregistered_provider_is_configuration_error() {
        let mut selector = ModelSelector::new(ProviderId::OpenAi);
        selector.register(StubProvider::arc(ProviderId::OpenAi, "gpt-4o"));

        let error = selector
            .select(ProviderSelection::Explicit(ProviderId::Bedrock), None)
            .unwrap_err();
        assert!(matches!(error, ProviderError::Configuration(_)));
        assert!(!selector.is_registered(ProviderId::Bedrock));
    }

    #[test]
    fn test_blank_model_is_configuration_error() {
        let error = selector()
            .select(ProviderSelection::Default, Some("  "))
            .unwrap_err();
        assert!(matches!(error, ProviderError::Configuration(_)));
    }
}

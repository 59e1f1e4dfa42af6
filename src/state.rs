//! Application State
//!
//! Process-wide state: the current settings and the editor host. Sessions are
//! opened from it and capture the settings in force at that moment.

use ketu_llm::{LlmProvider, ProviderClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{AssistantSettings, Notification, SettingsUpdate};
use crate::services::editor::{require_accepted, EditorHost, EditorOperation, SimulatedEditorHost};
use crate::services::orchestrator::Session;
use crate::services::retrieval::{ContextAggregator, DocsClient};
use crate::utils::error::{AppError, AppResult};

/// Outcome of applying a settings update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureReport {
    /// Settings now in force
    pub settings: AssistantSettings,
    /// Repository URL handed to the editor, when the integration is enabled
    pub repository: Option<String>,
    /// Whether the documentation server answered its health check
    pub docs_reachable: bool,
    pub notification: Notification,
}

/// Application state shared by every session
pub struct AppState {
    settings: Arc<RwLock<AssistantSettings>>,
    editor: Arc<dyn EditorHost>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(SimulatedEditorHost::new()))
    }
}

impl AppState {
    /// Create state with default settings around an editor host
    pub fn new(editor: Arc<dyn EditorHost>) -> Self {
        Self {
            settings: Arc::new(RwLock::new(AssistantSettings::default())),
            editor,
        }
    }

    /// Create state with the given settings, set up the same way as `configure`
    pub async fn with_settings(settings: AssistantSettings, editor: Arc<dyn EditorHost>) -> AppResult<Self> {
        let state = Self::new(editor);
        state.install(settings).await?;
        Ok(state)
    }

    /// Create state from `KETU_*` environment variables
    pub async fn from_env(editor: Arc<dyn EditorHost>) -> AppResult<Self> {
        Self::with_settings(AssistantSettings::from_env()?, editor).await
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub async fn from_lookup<F>(lookup: F, editor: Arc<dyn EditorHost>) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::with_settings(AssistantSettings::from_lookup(lookup)?, editor).await
    }

    /// Current settings
    pub async fn settings(&self) -> AssistantSettings {
        self.settings.read().await.clone()
    }

    pub fn editor(&self) -> Arc<dyn EditorHost> {
        self.editor.clone()
    }

    /// Validate and apply a settings update.
    ///
    /// When the repository integration is enabled the editor is pointed at the
    /// repository first; if that fails nothing is stored. The documentation
    /// health check is informational only.
    pub async fn configure(&self, update: SettingsUpdate) -> AppResult<ConfigureReport> {
        let mut candidate = self.settings().await;
        candidate.apply_update(update);
        self.install(candidate).await
    }

    async fn install(&self, candidate: AssistantSettings) -> AppResult<ConfigureReport> {
        candidate.validate().map_err(|message| {
            warn!(%message, "rejected configuration");
            AppError::Validation(message)
        })?;

        // Everything that can fail on the settings alone goes before the editor call
        let aggregator = self.aggregator_for(&candidate)?;

        let repository = candidate.active_repository().map(str::to_string);
        if let Some(url) = &repository {
            let accepted = self.editor.configure_repository(url).await?;
            require_accepted(EditorOperation::ConfigureRepository, accepted)?;
        }

        let docs_reachable = aggregator.probe().await;

        *self.settings.write().await = candidate.clone();
        info!(
            provider = %candidate.provider.provider,
            model = %candidate.provider.model,
            repository = repository.is_some(),
            docs_reachable,
            "configuration saved"
        );

        Ok(ConfigureReport {
            settings: candidate,
            repository,
            docs_reachable,
            notification: Notification::success("Configuration saved", "Your changes have been applied"),
        })
    }

    /// Open a new session using the current settings
    pub async fn open_session(&self) -> AppResult<Session> {
        let settings = self.settings().await;
        let provider: Arc<dyn LlmProvider> = Arc::new(ProviderClient::from_config(settings.provider.clone())?);
        let aggregator = Arc::new(self.aggregator_for(&settings)?);

        let session = Session::new(provider, aggregator, self.editor.clone());
        info!(session = session.id(), provider = %settings.provider.provider, "session opened");
        Ok(session)
    }

    fn aggregator_for(&self, settings: &AssistantSettings) -> AppResult<ContextAggregator> {
        let source = DocsClient::new(&settings.retrieval, settings.provider.proxy.as_ref())
            .map_err(|e| AppError::config(e.to_string()))?;
        Ok(ContextAggregator::new(Arc::new(source), self.editor.clone())
            .with_repository(settings.active_repository().is_some()))
    }
}

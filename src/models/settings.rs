//! Settings Models
//!
//! Assistant configuration: which provider to call, where documentation is
//! retrieved from, and the optional repository integration.

use ketu_core::{CoreError, CoreResult};
use ketu_llm::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};

/// Default documentation retrieval server
pub const DEFAULT_DOCS_BASE_URL: &str = "https://context7-mcp-server.example.com";

/// Documentation retrieval settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Base URL of the retrieval server
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Languages documentation is requested for
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Frameworks documentation is requested for
    #[serde(default = "default_frameworks")]
    pub frameworks: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_DOCS_BASE_URL.to_string()
}

fn default_languages() -> Vec<String> {
    ["javascript", "typescript", "python", "java"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_frameworks() -> Vec<String> {
    ["react", "node", "django", "spring"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            languages: default_languages(),
            frameworks: default_frameworks(),
        }
    }
}

/// Repository integration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepositorySettings {
    #[serde(default)]
    pub enabled: bool,
    /// Repository URL, e.g. https://github.com/user/repo
    #[serde(default)]
    pub url: String,
}

/// Assistant configuration held for the lifetime of the process
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssistantSettings {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    /// Replaces the whole provider config
    pub provider: Option<ProviderConfig>,
    pub docs_base_url: Option<String>,
    pub languages: Option<Vec<String>>,
    pub frameworks: Option<Vec<String>>,
    pub repository_enabled: Option<bool>,
    pub repository_url: Option<String>,
}

impl AssistantSettings {
    /// Apply a partial update to the settings
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(provider) = update.provider {
            self.provider = provider;
        }
        if let Some(base_url) = update.docs_base_url {
            self.retrieval.base_url = base_url;
        }
        if let Some(languages) = update.languages {
            self.retrieval.languages = languages;
        }
        if let Some(frameworks) = update.frameworks {
            self.retrieval.frameworks = frameworks;
        }
        if let Some(enabled) = update.repository_enabled {
            self.repository.enabled = enabled;
        }
        if let Some(url) = update.repository_url {
            self.repository.url = url;
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        self.provider.validate()?;

        let docs = url::Url::parse(&self.retrieval.base_url)
            .map_err(|e| format!("Invalid documentation URL '{}': {}", self.retrieval.base_url, e))?;
        if !matches!(docs.scheme(), "http" | "https") {
            return Err(format!(
                "Documentation URL must use http or https, got '{}'",
                docs.scheme()
            ));
        }

        if self.repository.enabled && self.repository.url.trim().is_empty() {
            return Err("Repository integration is enabled but no repository URL is set".to_string());
        }

        Ok(())
    }

    /// The repository URL when the integration is enabled and a URL is set
    pub fn active_repository(&self) -> Option<&str> {
        if !self.repository.enabled {
            return None;
        }
        let url = self.repository.url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Build settings from `KETU_*` environment variables over the defaults.
    ///
    /// - `KETU_PROVIDER`: openai, anthropic (or claude), groq, ollama, custom
    /// - `KETU_API_KEY`, `KETU_MODEL`, `KETU_ENDPOINT`
    /// - `KETU_DOCS_URL`: documentation retrieval base URL
    /// - `KETU_REPO_URL`: enables the repository integration
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(kind) = var("KETU_PROVIDER") {
            let kind: ProviderKind = kind.parse()?;
            let model = kind
                .suggested_models()
                .first()
                .copied()
                .unwrap_or_default();
            settings.provider = ProviderConfig::new(kind, model);
        }
        if let Some(model) = var("KETU_MODEL") {
            settings.provider.model = model;
        }
        if settings.provider.model.trim().is_empty() {
            return Err(CoreError::config(format!(
                "KETU_MODEL is required for the {} provider",
                settings.provider.provider
            )));
        }
        settings.provider.api_key = var("KETU_API_KEY");
        settings.provider.endpoint = var("KETU_ENDPOINT");

        if let Some(base_url) = var("KETU_DOCS_URL") {
            settings.retrieval.base_url = base_url;
        }
        if let Some(repo) = var("KETU_REPO_URL") {
            settings.repository = RepositorySettings {
                enabled: true,
                url: repo,
            };
        }

        Ok(settings)
    }
}

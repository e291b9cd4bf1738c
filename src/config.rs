use crate::application::pipeline::PipelineOptions;
use crate::domain::error::DomainError;
use crate::domain::values::quantity_semantics::QuantitySemantics;
use crate::domain::values::source_kind::SourceKind;
use crate::infrastructure::events::file::DEFAULT_EVENTS_FILE;
use crate::infrastructure::llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub source: SourceKind,
    pub events_file: PathBuf,
    /// Backend serving token prices and storing signals.
    pub backend_url: Option<String>,
    pub parallelism: usize,
    pub quantity_semantics: QuantitySemantics,
    pub model_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let options = PipelineOptions::default();
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            source: SourceKind::File,
            events_file: PathBuf::from(DEFAULT_EVENTS_FILE),
            backend_url: None,
            parallelism: options.parallelism,
            quantity_semantics: options.quantity_semantics,
            model_timeout: options.model_timeout,
        }
    }
}

impl Config {
    /// Parse the environment. Cross-field checks are left to `validate`, so
    /// command-line overrides can still be applied on top.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Config::default();

        config.openai_api_key = get("OPENAI_API_KEY");
        if let Some(url) = get("OPENAI_BASE_URL") {
            config.openai_base_url = url;
        }
        if let Some(model) = get("SIGNALCHAIN_MODEL") {
            config.model = model;
        }
        if let Some(source) = get("SIGNALCHAIN_SOURCE") {
            config.source = source.parse().map_err(DomainError::Config)?;
        }
        if let Some(path) = get("SIGNALCHAIN_EVENTS_FILE") {
            config.events_file = PathBuf::from(path);
        }
        config.backend_url = get("BACKEND_URL");
        if let Some(n) = get("SIGNALCHAIN_PARALLELISM") {
            config.parallelism = n
                .parse()
                .map_err(|e| DomainError::Config(format!("SIGNALCHAIN_PARALLELISM: {e}")))?;
        }
        if let Some(q) = get("SIGNALCHAIN_QUANTITY") {
            config.quantity_semantics = q.parse().map_err(DomainError::Config)?;
        }
        if let Some(secs) = get("SIGNALCHAIN_MODEL_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| DomainError::Config(format!("SIGNALCHAIN_MODEL_TIMEOUT_SECS: {e}")))?;
            config.model_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.parallelism == 0 {
            return Err(DomainError::Config("parallelism must be at least 1".into()));
        }
        if self.model_timeout.is_zero() {
            return Err(DomainError::Config("model timeout must be positive".into()));
        }
        if self.source == SourceKind::Http && self.backend_url.is_none() {
            return Err(DomainError::Config(
                "BACKEND_URL is required when the event source is http".into(),
            ));
        }
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            parallelism: self.parallelism,
            quantity_semantics: self.quantity_semantics,
            model_timeout: self.model_timeout,
        }
    }
}

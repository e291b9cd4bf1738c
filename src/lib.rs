pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logger;

use crate::application::pipeline::{PipelineOptions, PipelineOutcome, SignalPipeline};
use crate::application::tool_registry::ToolRegistry;
use crate::config::Config;
use crate::domain::entities::tool::ToolSpec;
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::ChatModel;
use crate::domain::ports::event_source::EventSource;
use crate::domain::ports::signal_sink::SignalSink;
use crate::domain::values::source_kind::SourceKind;
use crate::infrastructure::events::file::FileEventSource;
use crate::infrastructure::events::http::HttpEventSource;
use crate::infrastructure::llm::openai::OpenAiChatModel;
use crate::infrastructure::sinks::backend::BackendSignalSink;
use crate::infrastructure::tools::retrieve_events::{RetrieveEventsTool, RETRIEVE_EVENTS};
use std::sync::Arc;

pub struct SignalChain {
    pipeline: SignalPipeline,
    events: Arc<dyn EventSource>,
}

impl SignalChain {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        config.validate()?;
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| DomainError::Config("OPENAI_API_KEY is not set".into()))?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(
            api_key,
            Some(config.model.clone()),
            Some(config.openai_base_url.clone()),
        ));
        let sink = config
            .backend_url
            .as_deref()
            .map(|url| Arc::new(BackendSignalSink::new(url)) as Arc<dyn SignalSink>);

        Self::with_providers(
            config.pipeline_options(),
            model,
            Self::event_source(config)?,
            sink,
        )
    }

    pub fn with_providers(
        options: PipelineOptions,
        model: Arc<dyn ChatModel>,
        events: Arc<dyn EventSource>,
        sink: Option<Arc<dyn SignalSink>>,
    ) -> Result<Self, DomainError> {
        let registry = ToolRegistry::new(Self::declared_tools())
            .register(RETRIEVE_EVENTS, Arc::new(RetrieveEventsTool::new(events.clone())));

        Ok(Self {
            pipeline: SignalPipeline::new(options, model, registry, sink)?,
            events,
        })
    }

    /// Event source selected by the config.
    pub fn event_source(config: &Config) -> Result<Arc<dyn EventSource>, DomainError> {
        Ok(match config.source {
            SourceKind::File => Arc::new(FileEventSource::new(config.events_file.clone())),
            SourceKind::Http => {
                let url = config.backend_url.as_deref().ok_or_else(|| {
                    DomainError::Config("BACKEND_URL is required for the http source".into())
                })?;
                Arc::new(HttpEventSource::new(url))
            }
        })
    }

    pub fn declared_tools() -> Vec<ToolSpec> {
        vec![RetrieveEventsTool::spec()]
    }

    pub async fn run(&self, question: &str, save: bool) -> Result<PipelineOutcome, DomainError> {
        self.pipeline.run(question, save).await
    }

    pub async fn fetch_events(&self, question: &str) -> Result<serde_json::Value, DomainError> {
        self.events.fetch(question).await
    }

    pub fn pipeline(&self) -> &SignalPipeline {
        &self.pipeline
    }
}

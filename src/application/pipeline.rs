//! The full signal run: tool resolution, fan-out generation, aggregation and
//! best-effort persistence.

use crate::application::aggregate_signals::SignalAggregator;
use crate::application::generate_signal::SignalGenerator;
use crate::application::prompts::ASSISTANT_SYSTEM_PROMPT;
use crate::application::resolve_tools::ToolResolver;
use crate::application::tool_registry::ToolRegistry;
use crate::domain::entities::conversation::Conversation;
use crate::domain::entities::signal::Signal;
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::ChatModel;
use crate::domain::ports::signal_sink::{SaveOutcome, SignalSink};
use crate::domain::values::quantity_semantics::QuantitySemantics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Instrument};

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Number of independent raw signals drawn per run.
    pub parallelism: usize,
    pub quantity_semantics: QuantitySemantics,
    /// Upper bound for every single model call.
    pub model_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallelism: 3,
            quantity_semantics: QuantitySemantics::Absolute,
            model_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineOutcome {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub quantity_semantics: QuantitySemantics,
    pub raw_signals: Vec<Signal>,
    pub final_signal: Signal,
    /// `None` when no sink is configured or saving was skipped.
    pub persistence: Option<SaveOutcome>,
}

pub struct SignalPipeline {
    options: PipelineOptions,
    resolver: ToolResolver,
    generator: SignalGenerator,
    aggregator: SignalAggregator,
    sink: Option<Arc<dyn SignalSink>>,
}

impl SignalPipeline {
    /// Fails with a config error when the registry's declarations and
    /// handlers disagree or the options are unusable.
    pub fn new(
        options: PipelineOptions,
        model: Arc<dyn ChatModel>,
        registry: ToolRegistry,
        sink: Option<Arc<dyn SignalSink>>,
    ) -> Result<Self, DomainError> {
        if options.parallelism == 0 {
            return Err(DomainError::Config("parallelism must be at least 1".into()));
        }
        registry.validate()?;

        let registry = Arc::new(registry);
        let semantics = options.quantity_semantics;
        let timeout = options.model_timeout;

        Ok(Self {
            options,
            resolver: ToolResolver::new(model.clone(), registry.clone(), timeout),
            generator: SignalGenerator::new(
                model.clone(),
                registry.declared().to_vec(),
                semantics,
                timeout,
            ),
            aggregator: SignalAggregator::new(model, semantics, timeout),
            sink,
        })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn resolver(&self) -> &ToolResolver {
        &self.resolver
    }

    pub fn generator(&self) -> &SignalGenerator {
        &self.generator
    }

    pub fn aggregator(&self) -> &SignalAggregator {
        &self.aggregator
    }

    pub fn opening_conversation(question: &str) -> Conversation {
        Conversation::with_system(ASSISTANT_SYSTEM_PROMPT).push_user(question)
    }

    /// Run every stage for `question`. Persistence happens only when `save`
    /// is set and a sink is configured, and never fails the run.
    pub async fn run(&self, question: &str, save: bool) -> Result<PipelineOutcome, DomainError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("signal_run", run_id = %run_id);

        async move {
            info!(question, parallelism = self.options.parallelism, "Starting signal run");

            let conversation = self
                .resolver
                .resolve(Self::opening_conversation(question))
                .await?;

            let raw_signals = self
                .generator
                .generate_many(&conversation, self.options.parallelism)
                .await?;
            for (i, s) in raw_signals.iter().enumerate() {
                info!("Raw signal {}: {s}", i + 1);
            }

            let final_signal = self.aggregator.aggregate(&raw_signals).await?;
            info!(
                signal = %final_signal.side(),
                symbol = final_signal.symbol(),
                confidence = final_signal.confidence_score(),
                "Final signal ready"
            );

            let persistence = if save {
                self.persist(&final_signal).await
            } else {
                None
            };

            Ok(PipelineOutcome {
                run_id,
                generated_at: Utc::now(),
                quantity_semantics: self.options.quantity_semantics,
                raw_signals,
                final_signal,
                persistence,
            })
        }
        .instrument(span)
        .await
    }

    /// Save through the configured sink, if any. The signal stays valid
    /// whatever the outcome.
    pub async fn persist(&self, signal: &Signal) -> Option<SaveOutcome> {
        let sink = self.sink.as_ref()?;
        Some(match sink.save(signal).await {
            Ok(data) => {
                info!(sink = sink.name(), "Signal saved");
                SaveOutcome::saved(data)
            }
            Err(e) => {
                warn!(sink = sink.name(), "Signal not saved: {e}");
                SaveOutcome::failed(&e)
            }
        })
    }
}

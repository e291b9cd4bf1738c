//! Shared test helpers: in-process fakes for the model, event source and sink.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use signalchain::application::pipeline::PipelineOptions;
use signalchain::application::prompts::AGGREGATOR_SYSTEM_PROMPT;
use signalchain::domain::entities::conversation::Conversation;
use signalchain::domain::entities::signal::Signal;
use signalchain::domain::entities::tool::ToolCallRequest;
use signalchain::domain::error::DomainError;
use signalchain::domain::ports::chat_model::{ChatModel, ChatRequest, ModelReply};
use signalchain::domain::ports::event_source::EventSource;
use signalchain::domain::ports::signal_sink::SignalSink;
use signalchain::infrastructure::sinks::backend::SignalPayload;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake model was asked.
#[derive(Debug, Clone)]
pub struct Seen {
    pub conversation: Conversation,
    pub tools: Vec<String>,
    pub schema: Option<Value>,
}

type Responder = Box<dyn Fn(&ChatRequest<'_>) -> Result<ModelReply, DomainError> + Send + Sync>;

pub struct ScriptedModel {
    responder: Responder,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedModel {
    pub fn new(
        responder: impl Fn(&ChatRequest<'_>) -> Result<ModelReply, DomainError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    /// Structured calls whose conversation is not an aggregation.
    pub fn generation_calls(&self) -> Vec<Seen> {
        self.seen()
            .into_iter()
            .filter(|s| s.schema.is_some() && !is_aggregation(&s.conversation))
            .collect()
    }

    pub fn aggregation_calls(&self) -> Vec<Seen> {
        self.seen()
            .into_iter()
            .filter(|s| is_aggregation(&s.conversation))
            .collect()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ChatRequest<'_>) -> Result<ModelReply, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(Seen {
            conversation: request.conversation.clone(),
            tools: request.tools.iter().map(|t| t.name.clone()).collect(),
            schema: request.response_schema.map(|s| s.schema.clone()),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        (self.responder)(&request)
    }
}

pub fn is_aggregation(conversation: &Conversation) -> bool {
    conversation
        .messages()
        .first()
        .and_then(|m| m.text())
        .map(|t| t == AGGREGATOR_SYSTEM_PROMPT)
        .unwrap_or(false)
}

pub fn signal_json(side: &str, symbol: &str, confidence: f64, event_id: i64) -> Value {
    json!({
        "signal": side,
        "symbol": symbol,
        "quantity": 5.0,
        "confidence_score": confidence,
        "event_id": event_id,
        "motivation": format!("{side} {symbol} after event {event_id}")
    })
}

pub fn tool_call(id: &str, name: &str, arguments: &str) -> ModelReply {
    ModelReply::ToolCalls {
        text: None,
        calls: vec![ToolCallRequest {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }],
    }
}

/// Pull the embedded raw signals back out of a synthesis message.
pub fn raw_signals_in(text: &str) -> Vec<Value> {
    text.split("Raw signal ")
        .skip(1)
        .filter_map(|part| {
            let start = part.find('{')?;
            let end = part.rfind('}')?;
            serde_json::from_str(&part[start..=end]).ok()
        })
        .collect()
}

/// Majority vote over (signal, symbol); ties go to the smallest pair so the
/// answer does not depend on presentation order.
pub fn majority(raw: &[Value]) -> Value {
    let mut votes: BTreeMap<(String, String), Vec<&Value>> = BTreeMap::new();
    for v in raw {
        let key = (
            v["signal"].as_str().unwrap_or_default().to_string(),
            v["symbol"].as_str().unwrap_or_default().to_string(),
        );
        votes.entry(key).or_default().push(v);
    }
    // Keys iterate in ascending order; only a strictly larger group wins.
    let group = votes
        .values()
        .fold(None::<&Vec<&Value>>, |best, g| match best {
            Some(b) if b.len() >= g.len() => Some(b),
            _ => Some(g),
        })
        .expect("at least one raw signal");
    let confidence = group
        .iter()
        .map(|v| v["confidence_score"].as_f64().unwrap_or_default())
        .sum::<f64>()
        / group.len() as f64;
    let first = group[0];
    json!({
        "signal": first["signal"],
        "symbol": first["symbol"],
        "quantity": first["quantity"],
        "confidence_score": confidence,
        "event_id": first["event_id"],
        "motivation": format!("{} of {} raw signals agree", group.len(), raw.len())
    })
}

/// A model that asks for `retrieve_events` once, answers generation calls
/// with `raw` in rotation and aggregates by majority vote.
pub fn pipeline_model(raw: Vec<Value>) -> ScriptedModel {
    let next = Arc::new(AtomicUsize::new(0));
    ScriptedModel::new(move |req| {
        if req.response_schema.is_none() {
            return Ok(tool_call("call_1", "retrieve_events", r#"{"question":"What trade should I do today?"}"#));
        }
        if is_aggregation(req.conversation) {
            let text = req.conversation.last().and_then(|m| m.text()).unwrap_or_default();
            return Ok(ModelReply::Structured(majority(&raw_signals_in(text))));
        }
        let i = next.fetch_add(1, Ordering::SeqCst);
        Ok(ModelReply::Structured(raw[i % raw.len()].clone()))
    })
}

pub fn options(parallelism: usize) -> PipelineOptions {
    PipelineOptions {
        parallelism,
        model_timeout: Duration::from_secs(5),
        ..PipelineOptions::default()
    }
}

pub fn whale_events() -> Value {
    json!({"events": [{"id": 42, "symbol": "ETH", "type": "whale_sell", "amount": 10000}]})
}

pub struct StaticEventSource(pub Value);

#[async_trait]
impl EventSource for StaticEventSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, _question: &str) -> Result<Value, DomainError> {
        Ok(self.0.clone())
    }
}

pub struct FailingEventSource;

#[async_trait]
impl EventSource for FailingEventSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self, _question: &str) -> Result<Value, DomainError> {
        Err(DomainError::EventSource("backend unreachable".into()))
    }
}

/// Keeps the wire payload of every saved signal.
#[derive(Default)]
pub struct RecordingSink {
    pub saved: Mutex<Vec<Value>>,
}

impl RecordingSink {
    pub fn saved(&self) -> Vec<Value> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignalSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn save(&self, signal: &Signal) -> Result<Value, DomainError> {
        let payload = serde_json::to_value(SignalPayload::from(signal))
            .map_err(|e| DomainError::Sink(e.to_string()))?;
        self.saved.lock().unwrap().push(payload.clone());
        Ok(payload)
    }
}

pub struct FailingSink;

#[async_trait]
impl SignalSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn save(&self, _signal: &Signal) -> Result<Value, DomainError> {
        Err(DomainError::Sink("Backend 500 Internal Server Error".into()))
    }
}

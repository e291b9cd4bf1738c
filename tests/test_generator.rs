mod common;

use common::{signal_json, ScriptedModel};
use signalchain::application::pipeline::SignalPipeline;
use signalchain::application::generate_signal::SignalGenerator;
use signalchain::domain::error::DomainError;
use signalchain::domain::ports::chat_model::ModelReply;
use signalchain::domain::values::quantity_semantics::QuantitySemantics;
use signalchain::domain::values::signal_side::SignalSide;
use signalchain::infrastructure::tools::retrieve_events::RetrieveEventsTool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn generator(model: Arc<ScriptedModel>, timeout: Duration) -> SignalGenerator {
    SignalGenerator::new(
        model,
        vec![RetrieveEventsTool::spec()],
        QuantitySemantics::Absolute,
        timeout,
    )
}

#[tokio::test]
async fn test_generate_returns_validated_signal() {
    let model = Arc::new(ScriptedModel::new(|_| {
        Ok(ModelReply::Structured(signal_json("SELL", "eth", 0.7, 42)))
    }));
    let g = generator(model.clone(), Duration::from_secs(5));

    let signal = g
        .generate(&SignalPipeline::opening_conversation("q"))
        .await
        .unwrap();
    assert_eq!(signal.side(), SignalSide::Sell);
    assert_eq!(signal.symbol(), "ETH");
    assert_eq!(signal.event_id(), 42);

    let seen = &model.seen()[0];
    let schema = seen.schema.as_ref().unwrap();
    assert_eq!(schema["properties"]["signal"]["enum"][0], "BUY");
}

#[tokio::test]
async fn test_out_of_range_confidence_is_schema_error() {
    let model = Arc::new(ScriptedModel::new(|_| {
        Ok(ModelReply::Structured(signal_json("BUY", "ETH", 1.5, 42)))
    }));
    let g = generator(model, Duration::from_secs(5));

    let result = g.generate(&SignalPipeline::opening_conversation("q")).await;
    assert!(matches!(result, Err(DomainError::SchemaValidation(_))));
}

#[tokio::test]
async fn test_free_text_is_generation_error() {
    let model = Arc::new(ScriptedModel::new(|_| {
        Ok(ModelReply::Text("I would buy ETH.".into()))
    }));
    let g = generator(model, Duration::from_secs(5));

    let result = g.generate(&SignalPipeline::opening_conversation("q")).await;
    assert!(matches!(result, Err(DomainError::Generation(_))));
}

#[tokio::test]
async fn test_generate_many_fans_out_over_identical_input() {
    let model = Arc::new(
        ScriptedModel::new(|_| Ok(ModelReply::Structured(signal_json("SELL", "ETH", 0.6, 42))))
            .with_delay(Duration::from_millis(50)),
    );
    let g = generator(model.clone(), Duration::from_secs(5));
    let conversation = SignalPipeline::opening_conversation("What trade should I do today?");

    let signals = g.generate_many(&conversation, 4).await.unwrap();

    assert_eq!(signals.len(), 4);
    assert_eq!(model.calls(), 4);
    assert_eq!(model.max_in_flight(), 4, "calls should run concurrently");
    assert!(model.seen().iter().all(|s| s.conversation == conversation));
}

#[tokio::test]
async fn test_one_failed_sample_fails_the_batch() {
    let n = Arc::new(AtomicUsize::new(0));
    let model = Arc::new(ScriptedModel::new(move |_| {
        if n.fetch_add(1, Ordering::SeqCst) == 1 {
            Err(DomainError::Generation("rate limited".into()))
        } else {
            Ok(ModelReply::Structured(signal_json("BUY", "ETH", 0.5, 42)))
        }
    }));
    let g = generator(model, Duration::from_secs(5));

    let result = g
        .generate_many(&SignalPipeline::opening_conversation("q"), 3)
        .await;
    assert!(matches!(result, Err(DomainError::Generation(_))));
}

#[tokio::test]
async fn test_zero_samples_rejected() {
    let model = Arc::new(ScriptedModel::new(|_| {
        Ok(ModelReply::Structured(signal_json("BUY", "ETH", 0.5, 42)))
    }));
    let g = generator(model.clone(), Duration::from_secs(5));

    let result = g
        .generate_many(&SignalPipeline::opening_conversation("q"), 0)
        .await;
    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_slow_model_times_out_as_generation_error() {
    let model = Arc::new(
        ScriptedModel::new(|_| Ok(ModelReply::Structured(signal_json("BUY", "ETH", 0.5, 42))))
            .with_delay(Duration::from_millis(500)),
    );
    let g = generator(model, Duration::from_millis(20));

    let result = g.generate(&SignalPipeline::opening_conversation("q")).await;
    match result {
        Err(DomainError::Generation(msg)) => assert!(msg.contains("did not answer")),
        other => panic!("expected timeout, got {other:?}"),
    }
}

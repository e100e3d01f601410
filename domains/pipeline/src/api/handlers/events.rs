//! Pipeline event stream (SSE)

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::StreamExt;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::api::middleware::PipelineState;

/// Stream pipeline events; the first event is the current snapshot
pub async fn pipeline_events(
    State(state): State<PipelineState>,
) -> Sse<impl futures_core::Stream<Item = std::result::Result<Event, Infallible>>> {
    // subscribe before taking the snapshot so nothing falls in between
    let mut events = BroadcastStream::new(state.orchestrator.subscribe());
    let snapshot = state.orchestrator.snapshot();

    let stream = async_stream::stream! {
        let data = serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string());
        yield Ok(Event::default().event("snapshot").data(data));

        let mut sequence: u64 = 0;
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    sequence += 1;
                    let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
                    yield Ok(Event::default()
                        .id(format!("{}:{}", event.run_id(), sequence))
                        .event(event.name())
                        .data(data));
                }
                Err(BroadcastStreamRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event subscriber lagged");
                    yield Ok(Event::default()
                        .event("lagged")
                        .data(format!("{{\"missed\":{}}}", missed)));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

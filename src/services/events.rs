use std::sync::Mutex;

use crate::models::EngineEvent;

/// Consumer of engine state-transition events.
///
/// The engine calls `notify` exactly once per transition, synchronously
/// with it; delivery (push, email, UI refresh) is the sink's problem.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: EngineEvent);
}

/// Production sink: emits each event as a structured log record for the
/// downstream delivery pipeline to pick up
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&self, event: EngineEvent) {
        match &event {
            EngineEvent::LikeRecorded { from, to } => {
                tracing::info!(event = "like_recorded", from = %from, to = %to);
            }
            EngineEvent::MatchCreated { pair_key, actor_a, actor_b } => {
                tracing::info!(
                    event = "match_created",
                    pair_key = %pair_key,
                    actor_a = %actor_a,
                    actor_b = %actor_b
                );
            }
            EngineEvent::Unmatched { pair_key } => {
                tracing::info!(event = "unmatched", pair_key = %pair_key);
            }
        }
    }
}

/// Test sink: collects events so exactly-once properties can be asserted
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    pub fn count_matches_created(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, EngineEvent::MatchCreated { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn notify(&self, event: EngineEvent) {
        self.events.lock().expect("event log poisoned").push(event);
    }
}

//! # Turn Session Tracking
//!
//! Tracks the lifecycle of one text-to-speech exchange for logging. Exactly
//! one session exists at a time; it lives from the moment the user submits
//! text until playback finishes or fails.
//!
//! ## Session Lifecycle:
//! 1. **Idle**: Session created, nothing sent yet
//! 2. **Connecting**: WebSocket connection and setup handshake in progress
//! 3. **Receiving**: Audio chunks arriving from the synthesis API
//! 4. **Buffered**: Full response written to the container file
//! 5. **Playing**: Background playback task running
//! 6. **Done** / **Error**: Exchange finished

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Current phase of a synthesis turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnPhase {
    /// Session created but nothing sent yet
    Idle,
    /// Connecting and performing the setup handshake
    Connecting,
    /// Receiving audio chunks from the API
    Receiving,
    /// Full response buffered and flushed to the container file
    Buffered,
    /// Playback task running
    Playing,
    /// Exchange finished successfully
    Done,
    /// Exchange failed
    Error(String),
}

impl TurnPhase {
    /// Convert the phase to a string for log output.
    pub fn as_str(&self) -> &str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Connecting => "connecting",
            TurnPhase::Receiving => "receiving",
            TurnPhase::Buffered => "buffered",
            TurnPhase::Playing => "playing",
            TurnPhase::Done => "done",
            TurnPhase::Error(_) => "error",
        }
    }
}

/// One text-to-speech exchange, from text submission to end of playback.
pub struct TurnSession {
    /// Unique identifier for this turn (used in log lines)
    pub id: String,

    /// When the turn started
    created_at: DateTime<Utc>,

    /// Current phase
    phase: TurnPhase,
}

impl TurnSession {
    /// Create a new session in the Idle phase.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            phase: TurnPhase::Idle,
        }
    }

    /// Get the current phase.
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Advance the session to a new phase.
    pub fn set_phase(&mut self, phase: TurnPhase) {
        debug!(
            session_id = %self.id,
            from = self.phase.as_str(),
            to = phase.as_str(),
            "Turn phase transition"
        );
        self.phase = phase;
    }

    /// Seconds elapsed since the turn started.
    pub fn elapsed_seconds(&self) -> f64 {
        let elapsed = Utc::now().signed_duration_since(self.created_at);
        elapsed.num_milliseconds() as f64 / 1000.0
    }
}

impl Default for TurnSession {
    fn default() -> Self {
        Self::new()
    }
}

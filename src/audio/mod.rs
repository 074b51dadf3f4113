//! # Audio Module
//!
//! Everything that happens to the audio after it leaves the websocket: PCM
//! accumulation, WAV container writing, playback, and per-turn session
//! tracking.
//!
//! ## Key Components:
//! - **Audio Buffer**: Ordered accumulation of decoded PCM chunks
//! - **Playback**: Background sink with cooperative stop-flag cancellation
//! - **Turn Session**: Phase tracking (idle → connecting → receiving →
//!   buffered → playing → done/error) for log output
//!
//! ## Audio Format Requirements:
//! - **Sample Rate**: 24kHz (24,000 Hz)
//! - **Bit Depth**: 16-bit PCM
//! - **Channels**: Mono (1 channel)
//! - **Encoding**: Little-endian signed integers

pub mod buffer;    // Per-turn PCM accumulation and WAV flush
pub mod playback;  // Background playback with stop-flag polling
pub mod session;   // Turn phase tracking for logging

pub use buffer::{AudioBuffer, AudioFormat};
pub use playback::play_file;
pub use session::{TurnPhase, TurnSession};

//! # Synthesis Module
//!
//! The remote half of the pipeline: the JSON wire protocol and the
//! websocket client that runs one text-to-speech exchange per connection.
//!
//! ## Key Components:
//! - **Protocol**: Typed setup/turn/response messages (outbound snake_case,
//!   inbound camelCase)
//! - **Client**: Connect, setup handshake, one turn, close

pub mod client;    // WebSocket client, one connection per turn
pub mod protocol;  // Typed wire messages

pub use client::SynthesisClient;

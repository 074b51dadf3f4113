//! # Error Handling
//!
//! This module defines the custom error type used throughout the application.
//!
//! ## Key Rust Concepts for Error Handling:
//!
//! ### Result<T, E> Type
//! - **Purpose**: Forces you to handle both success and failure cases
//! - **T**: The success type (what you get when everything works)
//! - **E**: The error type (what you get when something goes wrong)
//! - **No exceptions**: Rust doesn't have try/catch, it uses Result instead
//!
//! ### Enums for Error Types
//! - **Variants**: Each enum variant represents a different kind of error
//! - **Data**: Each variant carries a human-readable message
//! - **Pattern matching**: Use `match` to handle different error types
//!
//! ## Error Categories:
//! Errors mirror the failure points of the pipeline: configuration problems
//! at startup, missing input files, websocket connection failures, malformed
//! protocol frames, and audio playback failures. Everything except
//! configuration errors is recoverable - the prompt loop reports the message
//! and continues.

use std::fmt;  // For implementing the Display trait

/// Custom error types for the application.
///
/// ## Error Categories:
/// - **Config**: Configuration problems (missing API key, bad values) - fatal at startup
/// - **FileNotFound**: File-mode input pointed at a nonexistent path
/// - **Connection**: WebSocket refused, dropped, or closed mid-turn
/// - **Protocol**: A frame the remote sent could not be understood
/// - **Playback**: Audio output failed (missing file, codec error, no device)
/// - **Internal**: Anything else (filesystem, runtime)
///
/// ## Usage Example:
/// ```rust
/// return Err(AppError::FileNotFound("notes.txt".to_string()));
/// ```
#[derive(Debug)]
pub enum AppError {
    /// Configuration file or environment variable problems
    Config(String),

    /// Input file does not exist
    FileNotFound(String),

    /// WebSocket connection failed or closed before the turn completed
    Connection(String),

    /// The remote sent a frame we could not parse or decode
    Protocol(String),

    /// Audio playback failed (missing/corrupt file, device error)
    Playback(String),

    /// Unexpected internal errors (I/O, task join failures, etc.)
    Internal(String),
}

/// Implementation of the Display trait for AppError.
///
/// ## Purpose:
/// This trait defines how errors are formatted as human-readable strings.
/// The prompt loop prints these messages directly to the user.
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::FileNotFound(path) => write!(f, "File not found: {}", path),
            AppError::Connection(msg) => write!(f, "Connection error: {}", msg),
            AppError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            AppError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Automatic conversion from anyhow::Error to AppError.
///
/// ## Purpose:
/// The anyhow crate provides general-purpose error handling at the `main`
/// boundary. This conversion allows anyhow errors to flow into the
/// application error type when needed.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Automatic conversion from JSON parsing errors to AppError.
///
/// ## Why Protocol:
/// JSON parsing only happens on frames received from the synthesis API, so
/// a parse failure means the remote sent something malformed.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Protocol(format!("JSON parsing error: {}", err))
    }
}

/// Automatic conversion from websocket transport errors to AppError.
///
/// ## When this happens:
/// - TLS handshake or TCP connect fails
/// - The socket errors while sending the setup/text messages
/// - The socket errors while reading response frames
impl From<tokio_tungstenite::tungstenite::Error> for AppError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        AppError::Connection(err.to_string())
    }
}

/// Automatic conversion from base64 decode errors to AppError.
///
/// ## Why Protocol:
/// The base64 payloads come straight out of response frames; a decode
/// failure means the frame content was malformed.
impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::Protocol(format!("Invalid base64 audio payload: {}", err))
    }
}

/// Automatic conversion from configuration errors to AppError.
///
/// ## When this happens:
/// - config.toml has invalid syntax
/// - Configuration values fail to deserialize
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Automatic conversion from I/O errors to AppError.
///
/// Call sites that know the failing path map to more specific variants
/// (FileNotFound, Playback) instead of relying on this blanket conversion.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Type alias for Results that use our custom error type.
///
/// ## Usage Example:
/// ```rust
/// fn read_from_file(path: &str) -> AppResult<String> {
///     // Equivalent to: Result<String, AppError>
///     ...
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that error messages include the category prefix the prompt loop prints.
    #[test]
    fn test_display_messages() {
        let err = AppError::FileNotFound("missing.txt".to_string());
        assert_eq!(err.to_string(), "File not found: missing.txt");

        let err = AppError::Connection("connection refused".to_string());
        assert!(err.to_string().starts_with("Connection error:"));
    }

    /// Test that remote-originated library errors map to Protocol.
    #[test]
    fn test_protocol_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Protocol(_)));

        use base64::Engine as _;
        let b64_err = base64::engine::general_purpose::STANDARD
            .decode("!!!")
            .unwrap_err();
        let err: AppError = b64_err.into();
        assert!(matches!(err, AppError::Protocol(_)));
    }
}

//! # Configuration Management
//!
//! This module handles loading and managing application configuration from multiple sources:
//! - TOML configuration files (config.toml)
//! - Environment variables (with APP_ prefix, plus the API's own variables)
//! - Default values (built into the code)
//!
//! ## Key Rust Concepts Used:
//! - **Serde**: Serialization/deserialization library for converting between Rust structs and data formats
//! - **derive macros**: Automatically generate code for common traits (Debug, Clone, Serialize, Deserialize)
//! - **struct**: Custom data types that group related fields together
//! - **impl blocks**: Add methods to structs
//!
//! ## Configuration Priority (highest to lowest):
//! 1. API environment variables (GOOGLE_API_KEY, MODEL, VOICE)
//! 2. Environment variables with APP_ prefix
//! 3. Configuration file (config.toml)
//! 4. Default values (defined in the Default impl)

use anyhow::Result;                   // Better error handling with context
use serde::{Deserialize, Serialize};  // For converting to/from TOML, JSON, etc.
use std::env;                         // For reading environment variables

/// Voices the synthesis API currently offers for prebuilt voice selection.
pub const VOICES: [&str; 5] = ["Puck", "Charon", "Kore", "Fenrir", "Aoede"];

/// Main application configuration that contains all settings.
///
/// ## Why separate config structs:
/// Breaking configuration into logical groups (api, audio) makes it easier
/// to understand and maintain as the application grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub audio: AudioConfig,
}

/// Synthesis API configuration settings.
///
/// ## Fields:
/// - `api_key`: API key for the speech synthesis service (required, no default)
/// - `model`: Model identifier sent in the setup message
/// - `voice`: Prebuilt voice name, one of the VOICES catalog
/// - `host`: API hostname (overridable so tests can target a local server)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api_key: String,
    pub model: String,
    pub voice: String,
    pub host: String,
}

/// Audio output configuration settings.
///
/// ## Fields:
/// - `sample_rate`: PCM sample rate of the synthesized audio (24000 Hz)
/// - `channels`: Channel count (1 = mono)
/// - `bit_depth`: Bits per sample (16-bit PCM)
/// - `output_path`: Where the WAV container file is written before playback
/// - `poll_interval_ms`: How often the playback task checks the busy/stop state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
    pub output_path: String,
    pub poll_interval_ms: u64,
}

/// Provides default configuration values.
///
/// ## Why defaults matter:
/// Default values ensure the application can start with nothing but an API
/// key in the environment. They also document reasonable starting values.
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                api_key: String::new(),                            // Must come from GOOGLE_API_KEY
                model: "models/gemini-2.0-flash-exp".to_string(),  // Default synthesis model
                voice: "Kore".to_string(),                         // Default prebuilt voice
                host: "generativelanguage.googleapis.com".to_string(),
            },
            audio: AudioConfig {
                sample_rate: 24000,                  // 24kHz - what the API streams back
                channels: 1,                         // Mono audio
                bit_depth: 16,                       // 16-bit PCM
                output_path: "output.wav".to_string(),
                poll_interval_ms: 100,               // Playback busy-poll interval
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources in priority order.
    ///
    /// ## Configuration Loading Process:
    /// 1. Start with built-in defaults
    /// 2. Override with values from config.toml (if it exists)
    /// 3. Override with environment variables prefixed with APP_
    /// 4. Handle the API's own environment variables (GOOGLE_API_KEY, MODEL, VOICE)
    ///
    /// ## Environment Variable Examples:
    /// - `GOOGLE_API_KEY=...`: API key (required; there is no default)
    /// - `MODEL=models/gemini-2.0-flash-exp`: Override the synthesis model
    /// - `VOICE=Puck`: Override the prebuilt voice
    /// - `APP_AUDIO_POLL_INTERVAL_MS=50`: Override the playback poll interval
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            // 1. Start with defaults - converts our Default impl to config format
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // 2. Load from config.toml file (if it exists) - required(false) means "don't error if missing"
            .add_source(config::File::with_name("config").required(false))
            // 3. Load from environment variables with APP_ prefix
            .add_source(config::Environment::with_prefix("APP").separator("_"));

        // The synthesis API's own environment variables don't follow the
        // APP_ prefix convention, so they're handled as explicit overrides.
        if let Ok(key) = env::var("GOOGLE_API_KEY") {
            settings = settings.set_override("api.api_key", key)?;
        }

        if let Ok(model) = env::var("MODEL") {
            settings = settings.set_override("api.model", model)?;
        }

        if let Ok(voice) = env::var("VOICE") {
            settings = settings.set_override("api.voice", voice)?;
        }

        // Build the final configuration and convert it back to our AppConfig struct
        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense.
    ///
    /// ## What this checks:
    /// - API key is present (a missing key is an unrecoverable startup error)
    /// - Voice is one of the catalog entries the API accepts
    /// - Audio format matches what the container writer supports
    /// - Playback poll interval is nonzero
    pub fn validate(&self) -> Result<()> {
        if self.api.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "GOOGLE_API_KEY environment variable is not set"
            ));
        }

        if !VOICES.contains(&self.api.voice.as_str()) {
            return Err(anyhow::anyhow!(
                "Unknown voice '{}'. Available voices: {}",
                self.api.voice,
                VOICES.join(", ")
            ));
        }

        if self.audio.sample_rate == 0 {
            return Err(anyhow::anyhow!("Sample rate cannot be 0"));
        }

        if self.audio.channels == 0 {
            return Err(anyhow::anyhow!("Channel count cannot be 0"));
        }

        if self.audio.bit_depth != 16 {
            return Err(anyhow::anyhow!(
                "Only 16-bit PCM is supported, got {}-bit",
                self.audio.bit_depth
            ));
        }

        if self.audio.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("Playback poll interval cannot be 0"));
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Build the websocket endpoint URL for the bidirectional synthesis service.
    ///
    /// ## URL Format:
    /// `wss://{host}/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent?key={api_key}`
    pub fn endpoint_url(&self) -> String {
        format!(
            "wss://{}/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent?key={}",
            self.host, self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that the default configuration has expected values and only
    /// fails validation for the missing API key.
    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.voice, "Kore");
        assert_eq!(config.audio.sample_rate, 24000);
        assert_eq!(config.audio.channels, 1);
        // No API key by default, so validation must fail
        assert!(config.validate().is_err());
    }

    /// Test that a config with an API key passes validation.
    #[test]
    fn test_config_with_key_is_valid() {
        let mut config = AppConfig::default();
        config.api.api_key = "test-key".to_string();
        assert!(config.validate().is_ok());
    }

    /// Test that validation catches voices outside the catalog.
    #[test]
    fn test_unknown_voice_rejected() {
        let mut config = AppConfig::default();
        config.api.api_key = "test-key".to_string();
        config.api.voice = "Nonexistent".to_string();
        assert!(config.validate().is_err());
    }

    /// Test that validation rejects unsupported audio formats.
    #[test]
    fn test_bit_depth_validation() {
        let mut config = AppConfig::default();
        config.api.api_key = "test-key".to_string();
        config.audio.bit_depth = 24;
        assert!(config.validate().is_err());
    }

    /// Test that the endpoint URL embeds host and key.
    #[test]
    fn test_endpoint_url() {
        let mut config = AppConfig::default();
        config.api.api_key = "abc123".to_string();
        let url = config.api.endpoint_url();
        assert!(url.starts_with("wss://generativelanguage.googleapis.com/ws/"));
        assert!(url.ends_with("?key=abc123"));
        assert!(url.contains("BidiGenerateContent"));
    }
}

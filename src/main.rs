//! # Toned Speech Synthesis CLI - Main Application Entry Point
//!
//! Interactive command-line tool that sends text to a remote speech
//! synthesis API over a websocket, optionally wrapping the text in a
//! stylistic "tone" instruction first, and plays the returned audio through
//! the default output device.
//!
//! ## Key Rust Concepts Used:
//! - **async/await**: The websocket exchange and playback wait are asynchronous
//! - **modules**: Code is organized into separate modules (mod statements)
//! - **Result<T, E>**: Error handling using Rust's Result type
//! - **Arc & AtomicBool**: The shared stop flag read by the playback task
//!
//! ## Application Architecture:
//! - **config**: Handles application configuration (TOML file + environment variables)
//! - **error**: Custom error types for the pipeline's failure points
//! - **tone**: The stylistic tone catalog and text preparation
//! - **cli**: The interactive prompt loop
//! - **synthesis**: Wire protocol and websocket client (one connection per turn)
//! - **audio**: PCM buffering, WAV container writing, playback

// Module declarations - These tell Rust about our other source files
mod audio;      // PCM buffer, WAV container, playback (audio/ directory)
mod cli;        // Interactive prompt loop (cli.rs)
mod config;     // Configuration management (config.rs)
mod error;      // Error handling types (error.rs)
mod synthesis;  // Wire protocol and websocket client (synthesis/ directory)
mod tone;       // Stylistic tone transformations (tone.rs)

use anyhow::Result;
use config::AppConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The main application entry point.
///
/// ## What this function does:
/// 1. **Loads configuration** from .env, config.toml and environment variables
/// 2. **Sets up logging** for debugging and monitoring
/// 3. **Installs the interrupt handler** that feeds the shared stop flag
/// 4. **Runs the prompt loop** until the user exits
///
/// ## Error Handling:
/// A missing API key (or any other invalid configuration) is unrecoverable:
/// the function returns the error and the process exits. Everything after
/// startup is handled inside the prompt loop.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Set up structured logging (tracing) for debugging and monitoring
    init_tracing()?;

    // Load application configuration and make sure it is usable
    let config = AppConfig::load()?;
    config.validate()?;

    info!("Starting tone-speech v{}", env!("CARGO_PKG_VERSION"));
    info!(
        model = %config.api.model,
        voice = %config.api.voice,
        "Configuration loaded"
    );

    // Shared stop flag: written by the interrupt handler, read by the
    // playback task between polls and by the prompt loop between turns.
    let stop = Arc::new(AtomicBool::new(false));
    setup_signal_handler(stop.clone());

    cli::run(config, stop).await?;

    info!("Exited prompt loop");
    Ok(())
}

/// Initialize the tracing (logging) system for the application.
///
/// ## Environment Variables:
/// - `RUST_LOG`: Controls what gets logged (e.g., "debug", "tone_speech=debug")
/// - If not set, defaults to "tone_speech=info"
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            // Try to read RUST_LOG environment variable, or use defaults
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tone_speech=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Install the Ctrl+C handler that sets the shared stop flag.
///
/// ## Cooperative cancellation:
/// Nothing is interrupted forcibly. The playback task polls the flag between
/// busy checks and stops within one polling interval; the prompt loop checks
/// it before starting the next turn.
fn setup_signal_handler(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            return;
        }

        info!("Received interrupt signal");
        stop.store(true, Ordering::SeqCst);
    });
}

//! # Interactive Prompt Loop
//!
//! The CLI surface: prompts for a tone number, an input mode (direct text,
//! file, or exit), and the corresponding text or filename, then drives one
//! synthesis turn per submission.
//!
//! ## Prompt Flow:
//! 1. **Tone selection**: a number from the menu; 0 skips tone styling
//! 2. **Input mode**: `1` = direct text, `2` = read a whole file, `exit` quits
//! 3. **Turn**: connect → synthesize → flush container → play back
//!
//! ## Error Handling:
//! Every turn-level failure (file not found, connection refused, malformed
//! frame, playback failure) is printed and the loop returns to the tone
//! prompt. Only startup errors terminate the process.

use crate::audio::{self, AudioBuffer, AudioFormat, TurnPhase, TurnSession};
use crate::config::{AppConfig, VOICES};
use crate::error::{AppError, AppResult};
use crate::synthesis::SynthesisClient;
use crate::tone;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// What the user chose at the input-mode prompt.
#[derive(Debug, PartialEq)]
pub enum InputMode {
    /// Type the text directly
    Text,
    /// Read the text from a file
    File,
    /// Leave the program
    Exit,
}

/// Parse the input-mode prompt answer. Returns None for anything that
/// should trigger a re-prompt.
pub fn parse_input_mode(input: &str) -> Option<InputMode> {
    match input.trim().to_lowercase().as_str() {
        "1" => Some(InputMode::Text),
        "2" => Some(InputMode::File),
        "exit" => Some(InputMode::Exit),
        _ => None,
    }
}

/// Parse a tone selection. 0 explicitly skips tone styling; numbers outside
/// the menu trigger a re-prompt rather than being forwarded.
pub fn parse_tone_selection(input: &str) -> Option<u8> {
    let number = input.trim().parse::<u8>().ok()?;
    if number == 0 || tone::by_number(number).is_some() {
        Some(number)
    } else {
        None
    }
}

/// Read the whole content of a text file.
///
/// ## Error Handling:
/// A nonexistent path is surfaced as FileNotFound; the caller re-prompts
/// before anything is sent to the API.
pub fn read_from_file(path: &str) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AppError::FileNotFound(path.to_string()),
        _ => AppError::Internal(format!("Error reading file '{}': {}", path, e)),
    })
}

/// Print a prompt and read one trimmed line from stdin.
fn prompt(message: &str) -> AppResult<String> {
    print!("{}", message);
    io::stdout()
        .flush()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut line = String::new();
    let bytes = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if bytes == 0 {
        // stdin closed underneath us; nothing more to read, ever
        return Err(AppError::Internal("Standard input closed".to_string()));
    }

    Ok(line.trim().to_string())
}

/// Run the interactive prompt loop until the user exits or an interrupt is
/// requested.
pub async fn run(config: AppConfig, stop: Arc<AtomicBool>) -> AppResult<()> {
    println!("Available voices: {}", VOICES.join(", "));
    println!(
        "Voice is set to: {} (override with the VOICE environment variable)",
        config.api.voice
    );

    loop {
        if stop.load(Ordering::SeqCst) {
            info!("Interrupt received, leaving prompt loop");
            break;
        }

        let selection = prompt_tone_selection()?;
        let Some(text) = prompt_input_text()? else {
            break;
        };

        let prepared = tone::prepare(&text, selection);

        if let Err(e) = run_turn(&config, &prepared, &stop).await {
            error!("Turn failed: {}", e);
            println!("{}", e);
        }
    }

    Ok(())
}

/// Show the tone menu and read a selection, re-prompting on invalid input.
fn prompt_tone_selection() -> AppResult<u8> {
    println!("Available Tones:");
    for tone in tone::catalog() {
        println!("{}: {} {}", tone.number, tone.emoji, tone.name);
    }

    loop {
        let line = prompt("Select a tone by number (or type '0' to skip tone selection): ")?;
        match parse_tone_selection(&line) {
            Some(selection) => return Ok(selection),
            None => println!("Invalid tone option. Please enter a number from the list."),
        }
    }
}

/// Read the input mode and the text itself. Returns None when the user
/// chose to exit.
fn prompt_input_text() -> AppResult<Option<String>> {
    loop {
        let line = prompt("Enter input mode (1 for text, 2 for file, or 'exit' to quit): ")?;
        match parse_input_mode(&line) {
            Some(InputMode::Exit) => return Ok(None),
            Some(InputMode::Text) => {
                return Ok(Some(prompt("Enter your text: ")?));
            }
            Some(InputMode::File) => {
                let filename = prompt("Enter filename: ")?;
                match read_from_file(&filename) {
                    Ok(content) => return Ok(Some(content)),
                    // Report and re-prompt; no turn has started yet
                    Err(e) => println!("{}", e),
                }
            }
            None => {
                println!("Invalid input mode: enter 1 for text, 2 for file, or 'exit'.")
            }
        }
    }
}

/// Drive one complete exchange: connect, synthesize, flush, play.
async fn run_turn(
    config: &AppConfig,
    prepared_text: &str,
    stop: &Arc<AtomicBool>,
) -> AppResult<()> {
    let mut session = TurnSession::new();
    info!(session_id = %session.id, "Starting synthesis turn");

    session.set_phase(TurnPhase::Connecting);
    let mut client = match SynthesisClient::connect(&config.api).await {
        Ok(client) => client,
        Err(e) => {
            session.set_phase(TurnPhase::Error(e.to_string()));
            return Err(e);
        }
    };

    session.set_phase(TurnPhase::Receiving);
    let mut buffer = AudioBuffer::new(AudioFormat::from(&config.audio));
    if let Err(e) = client.synthesize(prepared_text, &mut buffer).await {
        session.set_phase(TurnPhase::Error(e.to_string()));
        client.close().await;
        return Err(e);
    }
    client.close().await;

    if buffer.is_empty() {
        warn!(session_id = %session.id, "No audio received");
        println!("No audio received");
        session.set_phase(TurnPhase::Done);
        return Ok(());
    }

    // Playback starts only after the full response is in the container file
    let output_path = Path::new(&config.audio.output_path);
    if let Err(e) = buffer.write_wav(output_path) {
        session.set_phase(TurnPhase::Error(e.to_string()));
        return Err(e);
    }
    session.set_phase(TurnPhase::Buffered);
    info!(
        session_id = %session.id,
        duration_seconds = buffer.duration_seconds(),
        "Audio buffered"
    );

    session.set_phase(TurnPhase::Playing);
    let poll_interval = Duration::from_millis(config.audio.poll_interval_ms);
    if let Err(e) = audio::play_file(output_path, stop.clone(), poll_interval).await {
        session.set_phase(TurnPhase::Error(e.to_string()));
        return Err(e);
    }

    session.set_phase(TurnPhase::Done);
    info!(
        session_id = %session.id,
        elapsed_seconds = session.elapsed_seconds(),
        "Turn finished"
    );
    Ok(())
}

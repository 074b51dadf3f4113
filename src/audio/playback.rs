//! # Audio Playback
//!
//! Plays a completed WAV container file through the default output device on
//! a background task. Playback is cooperative: the task polls the sink's
//! busy state at a fixed interval and also checks a shared stop flag, so an
//! interrupt ends playback within one polling interval rather than cutting
//! the task off mid-instruction.
//!
//! ## Key Components:
//! - **play_file**: Async entry point, runs the blocking player off the runtime
//! - **wait_while_busy**: The poll loop shared by playback and its tests
//!
//! ## Why spawn_blocking:
//! The audio output stream must live on the thread that created it, and the
//! decode/poll loop sleeps between checks. Running it on the blocking pool
//! keeps the async runtime free to service other tasks.

use crate::error::{AppError, AppResult};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Play a WAV file to completion, or until the stop flag is set.
///
/// ## Parameters:
/// - **path**: Path to the completed container file
/// - **stop**: Shared cancellation flag, written by the interrupt handler
/// - **poll_interval**: How often the busy/stop state is checked
///
/// ## Error Handling:
/// A missing file, a codec failure, or an unavailable output device is
/// reported as a playback error; nothing is played in that case.
pub async fn play_file(
    path: &Path,
    stop: Arc<AtomicBool>,
    poll_interval: Duration,
) -> AppResult<()> {
    let path: PathBuf = path.to_path_buf();

    tokio::task::spawn_blocking(move || play_blocking(&path, &stop, poll_interval))
        .await
        .map_err(|e| AppError::Internal(format!("Playback task failed: {}", e)))?
}

/// The blocking playback body: open, decode, append, poll until drained.
fn play_blocking(path: &Path, stop: &AtomicBool, poll_interval: Duration) -> AppResult<()> {
    let file = File::open(path).map_err(|e| {
        AppError::Playback(format!(
            "Cannot open audio file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| AppError::Playback(format!("No audio output device: {}", e)))?;
    let sink = Sink::try_new(&stream_handle)
        .map_err(|e| AppError::Playback(format!("Failed to open audio sink: {}", e)))?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| {
        AppError::Playback(format!(
            "Cannot decode audio file '{}': {}",
            path.display(),
            e
        ))
    })?;

    info!("Starting playback: {}", path.display());
    sink.append(source);

    wait_while_busy(|| !sink.empty(), stop, poll_interval);

    // Stopping an already-drained sink is a no-op; stopping an interrupted
    // one releases the device immediately.
    sink.stop();
    debug!("Playback finished: {}", path.display());

    Ok(())
}

/// Poll the busy predicate at a fixed interval until it clears or the stop
/// flag is set.
///
/// ## Cancellation:
/// The flag is checked once per interval, so a stop request takes effect
/// within one polling interval.
fn wait_while_busy(busy: impl Fn() -> bool, stop: &AtomicBool, poll_interval: Duration) {
    while busy() && !stop.load(Ordering::SeqCst) {
        std::thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Setting the stop flag ends the poll loop within one interval even
    /// though the sink never drains.
    #[test]
    fn test_stop_flag_ends_polling_within_one_interval() {
        let stop = Arc::new(AtomicBool::new(false));
        let interval = Duration::from_millis(10);

        let flag = stop.clone();
        let setter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(25));
            flag.store(true, Ordering::SeqCst);
        });

        let start = Instant::now();
        wait_while_busy(|| true, &stop, interval);
        let elapsed = start.elapsed();

        setter.join().unwrap();
        // Stop was requested at ~25ms; the loop must notice on the next poll.
        assert!(
            elapsed < Duration::from_millis(200),
            "poll loop ran too long: {:?}",
            elapsed
        );
    }

    /// A sink that is already drained never enters the sleep.
    #[test]
    fn test_idle_sink_returns_immediately() {
        let stop = Arc::new(AtomicBool::new(false));
        let start = Instant::now();
        wait_while_busy(|| false, &stop, Duration::from_millis(100));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    /// A missing container file is a playback error, reported before any
    /// device is touched.
    #[tokio::test]
    async fn test_missing_file_is_playback_error() {
        let stop = Arc::new(AtomicBool::new(false));
        let result = play_file(
            Path::new("definitely-not-here.wav"),
            stop,
            Duration::from_millis(10),
        )
        .await;
        assert!(matches!(result, Err(AppError::Playback(_))));
    }
}

//! # Audio Buffer Management
//!
//! Implements the in-memory accumulation buffer for one synthesis turn.
//! Decoded PCM chunks arrive one websocket frame at a time and are appended
//! in order; once the turn completes, the whole buffer is flushed to a WAV
//! container file for playback.
//!
//! ## Key Features:
//! - **Ordered accumulation**: Chunks are appended in arrival order
//! - **Format validation**: Rejects empty and odd-length chunks (16-bit PCM)
//! - **Container flush**: Writes one WAV file with the configured format
//!
//! ## Audio Format:
//! The synthesis API streams 24kHz, 16-bit, mono PCM as little-endian
//! signed integers.

use crate::config::AudioConfig;
use crate::error::{AppError, AppResult};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// PCM format parameters for the buffer and its container file.
#[derive(Debug, Clone)]
pub struct AudioFormat {
    /// Sample rate in Hz (24000 for the synthesis API)
    pub sample_rate: u32,

    /// Number of audio channels (1 for mono)
    pub channels: u16,

    /// Bit depth (16 for PCM)
    pub bit_depth: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 24000,  // 24kHz - what the synthesis API streams
            channels: 1,         // Mono audio
            bit_depth: 16,       // 16-bit PCM
        }
    }
}

impl From<&AudioConfig> for AudioFormat {
    fn from(config: &AudioConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            channels: config.channels,
            bit_depth: config.bit_depth,
        }
    }
}

/// In-memory audio buffer for one synthesis turn.
///
/// ## Memory Management:
/// A turn's audio is bounded by the length of the synthesized speech, so the
/// buffer simply grows for the duration of one exchange and is dropped (or
/// cleared) afterwards. There is no sliding window.
pub struct AudioBuffer {
    /// The accumulated audio samples (16-bit signed integers)
    samples: Vec<i16>,

    /// Format parameters for this buffer
    format: AudioFormat,
}

impl AudioBuffer {
    /// Create a new, empty audio buffer with the given format.
    pub fn new(format: AudioFormat) -> Self {
        Self {
            samples: Vec::new(),
            format,
        }
    }

    /// Append one raw PCM chunk to the buffer.
    ///
    /// ## Parameters:
    /// - **data**: Raw bytes decoded from one response frame
    ///   (16-bit PCM, little-endian)
    ///
    /// ## Error Handling:
    /// Empty chunks and chunks with an odd byte count are rejected as
    /// protocol errors - the remote always sends whole 16-bit samples.
    pub fn append_pcm_data(&mut self, data: &[u8]) -> AppResult<()> {
        if data.is_empty() {
            return Err(AppError::Protocol("Empty audio chunk".to_string()));
        }
        if data.len() % 2 != 0 {
            return Err(AppError::Protocol(
                "Audio chunk length must be even for 16-bit samples".to_string(),
            ));
        }

        // Convert raw bytes to 16-bit signed integers (little-endian)
        let mut cursor = Cursor::new(data);
        while let Ok(sample) = cursor.read_i16::<LittleEndian>() {
            self.samples.push(sample);
        }

        Ok(())
    }

    /// Number of samples currently in the buffer.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty (no audio was received this turn).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the buffered audio in seconds.
    pub fn duration_seconds(&self) -> f64 {
        let frames = self.samples.len() / self.format.channels.max(1) as usize;
        frames as f64 / self.format.sample_rate as f64
    }

    /// Borrow the accumulated samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Clear all audio data so the buffer can be reused for another turn.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Flush the buffer to a WAV container file.
    ///
    /// ## Invariant:
    /// Called only after the turn completed, so the file always holds the
    /// full response; playback never starts on a partial container.
    pub fn write_wav(&self, path: &Path) -> AppResult<()> {
        let mut file = File::create(path).map_err(|e| {
            AppError::Playback(format!(
                "Failed to create audio file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let header = wav::Header::new(
            wav::header::WAV_FORMAT_PCM,
            self.format.channels,
            self.format.sample_rate,
            self.format.bit_depth,
        );

        wav::write(header, &wav::BitDepth::Sixteen(self.samples.clone()), &mut file).map_err(
            |e| {
                AppError::Playback(format!(
                    "Failed to write audio file '{}': {}",
                    path.display(),
                    e
                ))
            },
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chunks appended across multiple calls land in arrival order, exactly
    /// as if they had arrived in one frame.
    #[test]
    fn test_chunks_reassembled_in_order() {
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        buffer.append_pcm_data(&[0x01, 0x00, 0x02, 0x00]).unwrap();
        buffer.append_pcm_data(&[0x03, 0x00]).unwrap();
        buffer.append_pcm_data(&[0xFF, 0xFF]).unwrap();

        // Little-endian: [1, 2] ++ [3] ++ [-1]
        assert_eq!(buffer.samples(), &[1, 2, 3, -1]);
        assert_eq!(buffer.len(), 4);
    }

    /// Empty and odd-length chunks are protocol errors.
    #[test]
    fn test_invalid_chunks_rejected() {
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        assert!(matches!(
            buffer.append_pcm_data(&[]),
            Err(AppError::Protocol(_))
        ));
        assert!(matches!(
            buffer.append_pcm_data(&[0x01, 0x00, 0x02]),
            Err(AppError::Protocol(_))
        ));
        // A failed append leaves the buffer untouched
        assert!(buffer.is_empty());
    }

    /// Duration accounting follows the configured sample rate.
    #[test]
    fn test_duration_seconds() {
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        let one_second = vec![0u8; 24000 * 2];  // 24000 samples * 2 bytes
        buffer.append_pcm_data(&one_second).unwrap();
        assert!((buffer.duration_seconds() - 1.0).abs() < f64::EPSILON);
    }

    /// The container file payload equals the accumulated samples.
    #[test]
    fn test_wav_payload_matches_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turn.wav");

        let mut buffer = AudioBuffer::new(AudioFormat::default());
        buffer.append_pcm_data(&[0x01, 0x00, 0x02, 0x00]).unwrap();
        buffer.append_pcm_data(&[0x03, 0x00, 0x04, 0x00]).unwrap();
        buffer.write_wav(&path).unwrap();

        let mut file = File::open(&path).unwrap();
        let (header, data) = wav::read(&mut file).unwrap();
        assert_eq!(header.sampling_rate, 24000);
        assert_eq!(header.channel_count, 1);
        match data {
            wav::BitDepth::Sixteen(samples) => assert_eq!(samples, vec![1, 2, 3, 4]),
            other => panic!("unexpected bit depth: {:?}", other),
        }
    }

    /// clear() makes the buffer reusable for the next turn.
    #[test]
    fn test_clear() {
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        buffer.append_pcm_data(&[0x01, 0x00]).unwrap();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration_seconds(), 0.0);
    }
}

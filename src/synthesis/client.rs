//! # Synthesis Client
//!
//! Drives one text-to-speech exchange over a websocket connection. One
//! client instance corresponds to exactly one connection and one turn:
//! connect, perform the setup handshake, send the prepared text, collect
//! audio chunks until the server signals completion, close.
//!
//! ## Error Handling:
//! There is no retry and no timeout. A refused or dropped connection is a
//! connection error; a frame that cannot be parsed or decoded is a protocol
//! error. Both abort the exchange and bubble up to the prompt loop.

use crate::audio::AudioBuffer;
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::synthesis::protocol::{ServerMessage, SetupMessage, TextTurnMessage};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

/// One live synthesis session (one websocket connection, one turn).
pub struct SynthesisClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl SynthesisClient {
    /// Connect to the configured synthesis endpoint and complete the setup
    /// handshake.
    pub async fn connect(api: &ApiConfig) -> AppResult<Self> {
        Self::connect_to(&api.endpoint_url(), api).await
    }

    /// Connect to an explicit endpoint URL.
    ///
    /// Split out from `connect` so tests can point the client at a local
    /// mock server over plain `ws://`.
    pub async fn connect_to(url: &str, api: &ApiConfig) -> AppResult<Self> {
        debug!(host = %api.host, "Connecting to synthesis endpoint");
        let (ws, _response) = connect_async(url).await?;

        let mut client = Self { ws };
        client.send_setup(api).await?;
        client.await_setup_ack().await?;

        info!(model = %api.model, voice = %api.voice, "Synthesis session established");
        Ok(client)
    }

    /// Send the setup payload describing model, voice, and response modality.
    async fn send_setup(&mut self, api: &ApiConfig) -> AppResult<()> {
        let setup = SetupMessage::new(&api.model, &api.voice);
        self.ws
            .send(Message::Text(serde_json::to_string(&setup)?))
            .await?;
        Ok(())
    }

    /// Wait for the server to acknowledge the setup message.
    async fn await_setup_ack(&mut self) -> AppResult<()> {
        loop {
            let Some(raw) = self.next_json_frame().await? else {
                return Err(AppError::Connection(
                    "Connection closed during setup handshake".to_string(),
                ));
            };

            let message: ServerMessage = serde_json::from_str(&raw)?;
            if message.is_setup_complete() {
                debug!("Setup acknowledged");
                return Ok(());
            }

            warn!("Ignoring unexpected frame before setup acknowledgement");
        }
    }

    /// Run one synthesis turn: send the prepared text and append every
    /// decoded audio chunk to the buffer until the server ends the turn.
    ///
    /// ## Reassembly:
    /// Chunks are appended strictly in arrival order, so the buffer ends up
    /// equal to the concatenation of the decoded payloads.
    pub async fn synthesize(&mut self, text: &str, buffer: &mut AudioBuffer) -> AppResult<()> {
        let turn = TextTurnMessage::user_text(text);
        self.ws
            .send(Message::Text(serde_json::to_string(&turn)?))
            .await?;
        debug!(chars = text.len(), "Text turn sent");

        let mut chunks = 0usize;
        loop {
            let Some(raw) = self.next_json_frame().await? else {
                return Err(AppError::Connection(
                    "Connection closed before turn completion".to_string(),
                ));
            };

            let message: ServerMessage = serde_json::from_str(&raw)?;

            for payload in message.audio_payloads() {
                let bytes = BASE64.decode(payload)?;
                buffer.append_pcm_data(&bytes)?;
                chunks += 1;
            }

            if message.is_turn_complete() {
                debug!(chunks, samples = buffer.len(), "Turn complete");
                return Ok(());
            }
        }
    }

    /// Read the next frame carrying JSON. The API delivers JSON in both
    /// text and binary frames; transport frames (ping/pong) are skipped.
    /// Returns `None` when the server closes the connection.
    async fn next_json_frame(&mut self) -> AppResult<Option<String>> {
        while let Some(frame) = self.ws.next().await {
            match frame? {
                Message::Text(text) => return Ok(Some(text)),
                Message::Binary(data) => {
                    let text = String::from_utf8(data).map_err(|_| {
                        AppError::Protocol("Binary frame is not valid UTF-8".to_string())
                    })?;
                    return Ok(Some(text));
                }
                Message::Close(reason) => {
                    debug!(?reason, "Server closed the connection");
                    return Ok(None);
                }
                _ => continue,
            }
        }
        Ok(None)
    }

    /// Close the session. One connection lives for exactly one exchange.
    pub async fn close(mut self) {
        if let Err(e) = self.ws.close(None).await {
            debug!("Error closing synthesis session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioFormat;
    use crate::config::AppConfig;
    use tokio::net::TcpListener;

    /// Spawn a one-shot mock synthesis server: acknowledge setup, swallow
    /// the text turn, replay the given frames, close. Returns the ws:// URL.
    async fn spawn_mock_server(frames: Vec<ServerFrame>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            // Setup message from the client
            let _ = ws.next().await;
            ws.send(Message::Text(r#"{"setupComplete": {}}"#.to_string()))
                .await
                .unwrap();

            // Text turn from the client
            let _ = ws.next().await;

            for frame in frames {
                let msg = match frame {
                    ServerFrame::Text(raw) => Message::Text(raw),
                    ServerFrame::Binary(raw) => Message::Binary(raw.into_bytes()),
                };
                ws.send(msg).await.unwrap();
            }
            let _ = ws.close(None).await;
        });

        format!("ws://{}", addr)
    }

    enum ServerFrame {
        Text(String),
        Binary(String),
    }

    fn audio_frame(pcm: &[u8]) -> String {
        format!(
            r#"{{"serverContent": {{"modelTurn": {{"parts": [{{"inlineData": {{"mimeType": "audio/pcm", "data": "{}"}}}}]}}}}}}"#,
            BASE64.encode(pcm)
        )
    }

    fn test_api() -> crate::config::ApiConfig {
        let mut config = AppConfig::default();
        config.api.api_key = "test-key".to_string();
        config.api
    }

    /// A response split across frames is reassembled into the concatenation
    /// of the decoded payloads in arrival order, and the flushed container
    /// file carries exactly that payload.
    #[tokio::test]
    async fn test_synthesize_reassembles_split_response() {
        let chunk_a: [u8; 4] = [0x01, 0x00, 0x02, 0x00];
        let chunk_b: [u8; 4] = [0x03, 0x00, 0x04, 0x00];

        let url = spawn_mock_server(vec![
            ServerFrame::Text(audio_frame(&chunk_a)),
            // The API mixes text and binary frames; both must decode
            ServerFrame::Binary(audio_frame(&chunk_b)),
            ServerFrame::Text(r#"{"serverContent": {"turnComplete": true}}"#.to_string()),
        ])
        .await;

        let api = test_api();
        let mut client = SynthesisClient::connect_to(&url, &api).await.unwrap();
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        client.synthesize("Hello", &mut buffer).await.unwrap();
        client.close().await;

        assert_eq!(buffer.samples(), &[1, 2, 3, 4]);

        // Flushing yields a container whose payload equals the concatenation
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        buffer.write_wav(&path).unwrap();
        let mut file = std::fs::File::open(&path).unwrap();
        let (_, data) = wav::read(&mut file).unwrap();
        match data {
            wav::BitDepth::Sixteen(samples) => assert_eq!(samples, vec![1, 2, 3, 4]),
            other => panic!("unexpected bit depth: {:?}", other),
        }
    }

    /// generationComplete ends the turn just like turnComplete.
    #[tokio::test]
    async fn test_generation_complete_ends_turn() {
        let url = spawn_mock_server(vec![
            ServerFrame::Text(audio_frame(&[0x05, 0x00])),
            ServerFrame::Text(r#"{"serverContent": {"generationComplete": true}}"#.to_string()),
        ])
        .await;

        let api = test_api();
        let mut client = SynthesisClient::connect_to(&url, &api).await.unwrap();
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        client.synthesize("Hi", &mut buffer).await.unwrap();
        assert_eq!(buffer.samples(), &[5]);
    }

    /// A connection closed before the completion marker is a connection
    /// error, not a silent short read.
    #[tokio::test]
    async fn test_close_before_completion_is_connection_error() {
        let url = spawn_mock_server(vec![ServerFrame::Text(audio_frame(&[0x01, 0x00]))]).await;

        let api = test_api();
        let mut client = SynthesisClient::connect_to(&url, &api).await.unwrap();
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        let result = client.synthesize("Hello", &mut buffer).await;
        assert!(matches!(result, Err(AppError::Connection(_))));
    }

    /// A frame that is not JSON aborts the exchange as a protocol error.
    #[tokio::test]
    async fn test_malformed_frame_is_protocol_error() {
        let url =
            spawn_mock_server(vec![ServerFrame::Text("this is not json".to_string())]).await;

        let api = test_api();
        let mut client = SynthesisClient::connect_to(&url, &api).await.unwrap();
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        let result = client.synthesize("Hello", &mut buffer).await;
        assert!(matches!(result, Err(AppError::Protocol(_))));
    }

    /// Frames that parse but carry neither audio nor a completion marker are
    /// ignored rather than treated as errors.
    #[tokio::test]
    async fn test_unknown_frames_are_ignored() {
        let url = spawn_mock_server(vec![
            ServerFrame::Text(r#"{"usageMetadata": {"totalTokenCount": 3}}"#.to_string()),
            ServerFrame::Text(audio_frame(&[0x07, 0x00])),
            ServerFrame::Text(r#"{"serverContent": {"turnComplete": true}}"#.to_string()),
        ])
        .await;

        let api = test_api();
        let mut client = SynthesisClient::connect_to(&url, &api).await.unwrap();
        let mut buffer = AudioBuffer::new(AudioFormat::default());
        client.synthesize("Hello", &mut buffer).await.unwrap();
        assert_eq!(buffer.samples(), &[7]);
    }
}

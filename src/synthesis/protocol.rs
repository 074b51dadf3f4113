//! # Synthesis Wire Protocol
//!
//! Typed messages for the JSON-framed websocket protocol of the
//! bidirectional synthesis service.
//!
//! ## Message Flow:
//! 1. **Client → Server**: setup payload (model, voice, AUDIO response modality)
//! 2. **Server → Client**: setup acknowledgement (`setupComplete`)
//! 3. **Client → Server**: one user text turn with `turn_complete: true`
//! 4. **Server → Client**: frames carrying base64 PCM chunks under
//!    `serverContent.modelTurn.parts[].inlineData.data`, then a frame with
//!    `serverContent.turnComplete` (or `generationComplete`) ending the turn
//!
//! ## Casing:
//! Outbound messages use snake_case field names; the server replies in
//! camelCase. Both are accepted by the endpoint, but the asymmetry is real,
//! so the serialize and deserialize structs are kept separate.

use serde::{Deserialize, Serialize};

// --- Outbound messages -----------------------------------------------------

/// The connection setup message, sent once right after connecting.
#[derive(Debug, Serialize)]
pub struct SetupMessage {
    pub setup: Setup,
}

#[derive(Debug, Serialize)]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

impl SetupMessage {
    /// Build a setup message requesting audio responses with the given
    /// model and prebuilt voice.
    pub fn new(model: &str, voice: &str) -> Self {
        Self {
            setup: Setup {
                model: model.to_string(),
                generation_config: GenerationConfig {
                    response_modalities: vec!["AUDIO".to_string()],
                    speech_config: SpeechConfig {
                        voice_config: VoiceConfig {
                            prebuilt_voice_config: PrebuiltVoiceConfig {
                                voice_name: voice.to_string(),
                            },
                        },
                    },
                },
            },
        }
    }
}

/// One user text turn. `turn_complete: true` tells the server the client is
/// done talking and a response should be generated.
#[derive(Debug, Serialize)]
pub struct TextTurnMessage {
    pub client_content: ClientContent,
}

#[derive(Debug, Serialize)]
pub struct ClientContent {
    pub turns: Vec<Turn>,
    pub turn_complete: bool,
}

#[derive(Debug, Serialize)]
pub struct Turn {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

impl TextTurnMessage {
    /// Build a single-part user turn carrying the prepared text.
    pub fn user_text(text: &str) -> Self {
        Self {
            client_content: ClientContent {
                turns: vec![Turn {
                    role: "user".to_string(),
                    parts: vec![Part {
                        text: text.to_string(),
                    }],
                }],
                turn_complete: true,
            },
        }
    }
}

// --- Inbound messages ------------------------------------------------------

/// Any frame the server sends. Unknown fields are ignored; a frame carrying
/// none of these keys is valid but uninteresting.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<ServerContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    pub model_turn: Option<ModelTurn>,
    pub turn_complete: Option<bool>,
    pub generation_complete: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ModelTurn {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
pub struct InlineData {
    pub data: Option<String>,
}

impl ServerMessage {
    /// Whether this frame acknowledges the setup message.
    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.is_some()
    }

    /// Collect the base64 audio payloads carried by this frame, in order.
    pub fn audio_payloads(&self) -> Vec<&str> {
        let mut payloads = Vec::new();
        if let Some(content) = &self.server_content {
            if let Some(model_turn) = &content.model_turn {
                if let Some(parts) = &model_turn.parts {
                    for part in parts {
                        if let Some(inline) = &part.inline_data {
                            if let Some(data) = &inline.data {
                                payloads.push(data.as_str());
                            }
                        }
                    }
                }
            }
        }
        payloads
    }

    /// Whether this frame ends the turn. The server signals completion with
    /// `turnComplete`, though `generationComplete` has been observed too.
    pub fn is_turn_complete(&self) -> bool {
        match &self.server_content {
            Some(content) => {
                content.turn_complete.unwrap_or(false)
                    || content.generation_complete.unwrap_or(false)
            }
            None => false,
        }
    }
}

//! # Stylistic Tone Transformations
//!
//! Maps tone numbers to fixed instruction phrases that are prepended to the
//! user's text before it is sent for synthesis. The instruction biases how
//! the generated speech sounds (whispering, yelling, pirate, ...).
//!
//! ## Key Components:
//! - **Tone catalog**: 14 numbered tones with display name, emoji, and transform
//! - **prepare()**: Applies the selected tone, or passes text through unchanged
//!
//! ## Selection Rules:
//! - Numbers 1-14 select the corresponding tone
//! - 0 or any out-of-range number applies no transformation at all

/// A single stylistic tone: menu metadata plus the text transform.
pub struct Tone {
    /// Menu number the user types to select this tone
    pub number: u8,

    /// Emoji shown next to the name in the menu
    pub emoji: &'static str,

    /// Display name shown in the menu
    pub name: &'static str,

    /// The transformation applied to the user's text
    transform: fn(&str) -> String,
}

impl Tone {
    /// Apply this tone's transformation to the given text.
    pub fn apply(&self, text: &str) -> String {
        (self.transform)(text)
    }
}

/// The full tone catalog, in menu order.
static TONES: [Tone; 14] = [
    Tone { number: 1, emoji: "💬", name: "Neutral", transform: neutral },
    Tone { number: 2, emoji: "🔮", name: "Mysterious", transform: mysterious },
    Tone { number: 3, emoji: "😃", name: "Excited", transform: excited },
    Tone { number: 4, emoji: "😮", name: "Surprised", transform: surprised },
    Tone { number: 5, emoji: "😔", name: "Sad", transform: sad },
    Tone { number: 6, emoji: "😡", name: "Angry", transform: angry },
    Tone { number: 7, emoji: "❓", name: "Uncertain", transform: uncertain },
    Tone { number: 8, emoji: "🦗", name: "Whispering", transform: whispering },
    Tone { number: 9, emoji: "🗯️", name: "Yelling", transform: yelling },
    Tone { number: 10, emoji: "🐢", name: "Slow", transform: slow },
    Tone { number: 11, emoji: "🐰", name: "Fast", transform: fast },
    Tone { number: 12, emoji: "🏄", name: "Surfer", transform: surfer },
    Tone { number: 13, emoji: "🎭", name: "Shakespeare", transform: shakespeare },
    Tone { number: 14, emoji: "🏴‍☠️", name: "Pirate", transform: pirate },
];

/// Get the full tone catalog for menu display.
pub fn catalog() -> &'static [Tone] {
    &TONES
}

/// Look up a tone by its menu number.
pub fn by_number(number: u8) -> Option<&'static Tone> {
    TONES.iter().find(|tone| tone.number == number)
}

/// Prepare text for synthesis by applying the selected tone.
///
/// ## Selection Rules:
/// - 1-14: the text is wrapped in the tone's instruction phrase
/// - 0 or out-of-range: the text is returned unchanged
pub fn prepare(text: &str, selection: u8) -> String {
    match by_number(selection) {
        Some(tone) => tone.apply(text),
        None => text.to_string(),
    }
}

fn neutral(text: &str) -> String {
    format!("Say: \"{}\"", text)
}

fn mysterious(text: &str) -> String {
    format!(
        "Say this like a dramatic wizard speaking very mysteriously: \"{}\"",
        text
    )
}

fn excited(text: &str) -> String {
    format!(
        "Say this like a very enthusiastic excited fast-talking friend: \"{}!\"",
        text.to_uppercase()
    )
}

fn surprised(text: &str) -> String {
    format!("Say with genuine shock and amazement: \"Oh wow! {}!\"", text)
}

fn sad(text: &str) -> String {
    format!("Say in a melancholic and dejected tone: \"*sigh* {}...\"", text)
}

fn angry(text: &str) -> String {
    format!(
        "Say with intense anger and frustration: \"{}!!!\"",
        text.to_uppercase()
    )
}

fn uncertain(text: &str) -> String {
    format!(
        "Say this like a question, even if it's not a question, as if you are very uncertain and confused about what you're saying: \"Hmm... {}?\"",
        text
    )
}

fn whispering(text: &str) -> String {
    format!(
        "Whisper in a hushed, secretive voice: \"{}\"",
        text.to_lowercase()
    )
}

fn yelling(text: &str) -> String {
    format!(
        "Shout with maximum volume, with urgency like you are yelling at someone: \"{}!!!\"",
        text.to_uppercase()
    )
}

fn slow(text: &str) -> String {
    let spaced = text.split_whitespace().collect::<Vec<_>>().join("... ");
    format!("Say very slowly and deliberately: \"{}...\"", spaced)
}

fn fast(text: &str) -> String {
    let dashed = text.split_whitespace().collect::<Vec<_>>().join("-");
    format!("Say rapidly and energetically: \"{}\"", dashed)
}

fn surfer(text: &str) -> String {
    format!(
        "Say this like a mellow, laid-back surfer, speaking slowly and using surfer slang: \"Woah... {}, like, totally radical!\"",
        text
    )
}

fn shakespeare(text: &str) -> String {
    format!(
        "Say this like a Shakespearean actor speaking a very dramatic monologue: \"{}\"",
        text
    )
}

fn pirate(text: &str) -> String {
    format!(
        "Say this like a pirate: \"Arrg, {}... arrg\"",
        text.replace('r', "rrr")
    )
}

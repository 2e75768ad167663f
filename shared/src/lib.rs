//! Wire contract shared by the chat server and client.
//!
//! Every application message travels as one newline-terminated line whose
//! characters have been shifted by [`CODEC_SHIFT`]. Both peers import the
//! constant from here so the two sides can never disagree on it.

/// Default TCP port the server listens on and the client connects to.
pub const DEFAULT_PORT: u16 = 54321;

/// Per-character code point offset applied to message bodies on the wire.
///
/// This only obscures text. It is not a security mechanism.
pub const CODEC_SHIFT: u32 = 3;

/// Prompt broadcast when a new connection arrives.
pub const NAME_PROMPT: &str = "Enter your name";

/// Display name used for lines typed at the server console.
pub const ADMIN_NAME: &str = "Administrator";

/// Shifts every character forward by [`CODEC_SHIFT`].
///
/// Characters whose shifted code point is not a valid `char` (past
/// `char::MAX` or inside the surrogate gap) are passed through unchanged.
pub fn encode(text: &str) -> String {
    text.chars()
        .map(|c| shift_char((c as u32).checked_add(CODEC_SHIFT), c))
        .collect()
}

/// Shifts every character back by [`CODEC_SHIFT`]; the inverse of [`encode`].
pub fn decode(text: &str) -> String {
    text.chars()
        .map(|c| shift_char((c as u32).checked_sub(CODEC_SHIFT), c))
        .collect()
}

fn shift_char(shifted: Option<u32>, original: char) -> char {
    shifted.and_then(char::from_u32).unwrap_or(original)
}

pub fn join_announcement(name: &str) -> String {
    format!("{} joined the chat.", name)
}

pub fn leave_announcement(name: &str) -> String {
    format!("{} left the chat.", name)
}

/// Formats a relayed chat line as `<name>: <text>`.
pub fn chat_line(name: &str, text: &str) -> String {
    format!("{}: {}", name, text)
}

pub fn admin_line(text: &str) -> String {
    chat_line(ADMIN_NAME, text)
}

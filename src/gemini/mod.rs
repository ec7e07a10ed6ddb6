//! Gemini `generateContent` client backing semantic query parsing and candidate scoring.

pub mod client;
mod decode;
mod semantic;
pub mod types;

//! OpenAI-compatible chat completions client.

mod client;
mod conversion;
mod dto;

pub use client::OpenAiCompatibleClient;

//! Backend provider integrations for Vasari.
//!
//! This crate provides concrete [`vasari_interface::VasariDriver`]
//! implementations. The OpenAI chat-completions wire format is the lingua
//! franca of hosted inference (OpenAI, Groq, Together, OpenRouter, local
//! llama.cpp servers), so a single compatible client covers most
//! deployments.
//!
//! # Example
//!
//! ```no_run
//! use vasari_models::OpenAiCompatibleClient;
//! use vasari_interface::VasariDriver;
//! use vasari_core::{ChatRequest, ChatMessage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiCompatibleClient::new(
//!     std::env::var("GROQ_API_KEY")?,
//!     "llama-3.3-70b-versatile".to_string(),
//!     "https://api.groq.com/openai/v1/chat/completions".to_string(),
//!     "groq",
//! );
//! let request = ChatRequest::new(vec![ChatMessage::user("Hello")]);
//! let response = client.complete(&request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai_compat;

pub use openai_compat::OpenAiCompatibleClient;

//! Client for the external generation service.
//!
//! Two call shapes, both single request/response with no internal state:
//!
//! - [`GenerationClient::try_on`] - resolve a person photo and a product
//!   photo to encoded bytes, issue one multimodal generation request,
//!   and unwrap the single image the model is expected to return.
//! - [`GenerationClient::ask`] - plain text generation with an optional
//!   system instruction, used for product copy.
//!
//! The service speaks a Gemini-style `generateContent` API; the key is
//! held in a [`secrecy::SecretString`] and attached as a request header.

mod client;
mod error;
mod types;

pub use client::{AiConfig, GenerationClient};
pub use error::AiError;
pub use types::{AskOptions, GeneratedImage, PhotoSource, TryOnRequest};

//! Request/response types for the generation client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use url::Url;

// =============================================================================
// Public API types
// =============================================================================

/// Where the person photo comes from.
///
/// UI flows that just captured a photo pass its bytes inline; flows
/// reusing a saved photo pass its URL and the client fetches it
/// server-side.
#[derive(Debug, Clone)]
pub enum PhotoSource {
    Url(Url),
    Bytes { data: Vec<u8>, mime_type: String },
}

/// One try-on generation request.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub person_photo: PhotoSource,
    pub product_photo_url: Url,
    pub product_name: String,
    pub product_category: String,
}

/// The image the model generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Options for text generation.
#[derive(Debug, Clone)]
pub struct AskOptions {
    /// Optional system/context instruction.
    pub system_prompt: Option<String>,
    /// Cap on response tokens.
    pub max_tokens: u32,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_tokens: 500,
        }
    }
}

// =============================================================================
// Wire types (generateContent)
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub(crate) fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_owned()),
            parts,
        }
    }

    pub(crate) fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub(crate) fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            ..Self::default()
        }
    }

    pub(crate) fn inline(mime_type: &str, data: &[u8]) -> Self {
        Self {
            inline_data: Some(Blob {
                mime_type: mime_type.to_owned(),
                data: BASE64.encode(data),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Blob {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

//! Generation service client.
//!
//! One `reqwest` client with the API key in its default headers for
//! generation calls, and a second plain client for photo fetches so the
//! key never travels to blob hosts. Product photos are cached for a few
//! minutes; person photos are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::error::AiError;
use super::types::{
    AskOptions, Content, GenerateRequest, GenerateResponse, GeneratedImage, GenerationConfig,
    Part, PhotoSource, TryOnRequest,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const PHOTO_CACHE_TTL: Duration = Duration::from_secs(300);
const ERROR_BODY_LIMIT: usize = 200;

/// Generation service configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for the generation service.
    pub api_key: SecretString,
    /// Model name (e.g. `gemini-1.5-flash`).
    pub model: String,
    /// API base URL, overridable for tests and proxies.
    pub base_url: String,
    /// Bound on the whole generation call.
    pub timeout: Duration,
}

impl AiConfig {
    /// Configuration with the default model, endpoint, and timeout.
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
struct Photo {
    data: Vec<u8>,
    mime_type: String,
}

/// Client for the generation service.
#[derive(Clone)]
pub struct GenerationClient {
    inner: Arc<GenerationClientInner>,
}

struct GenerationClientInner {
    api: reqwest::Client,
    fetcher: reqwest::Client,
    base_url: String,
    model: String,
    photo_cache: Cache<String, Photo>,
}

impl GenerationClient {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(config.api_key.expose_secret())
                .expect("Invalid API key for header"),
        );

        let api = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        let fetcher = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        let photo_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(PHOTO_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(GenerationClientInner {
                api,
                fetcher,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                model: config.model.clone(),
                photo_cache,
            }),
        }
    }

    /// Generate text from a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::InvalidInput`] for an empty prompt, and the
    /// transport/API/parse errors of the underlying call otherwise.
    #[instrument(skip(self, prompt, options), fields(model = %self.inner.model))]
    pub async fn ask(&self, prompt: &str, options: AskOptions) -> Result<String, AiError> {
        if prompt.trim().is_empty() {
            return Err(AiError::InvalidInput("a prompt is required".to_owned()));
        }

        let request = GenerateRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            system_instruction: options.system_prompt.as_deref().map(Content::system),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(options.max_tokens),
            }),
        };

        let response = self.execute(&request).await?;
        let text = text_from_response(&response);
        if text.is_empty() {
            Err(AiError::Empty)
        } else {
            Ok(text)
        }
    }

    /// Run a virtual try-on: one multimodal request, exactly one image
    /// expected back.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::InvalidInput`] before any I/O when required
    /// fields are missing, [`AiError::Http`] when a photo fetch or the
    /// generation call fails, and [`AiError::NoImage`] when the model
    /// answers with text instead of an image.
    #[instrument(skip(self, request), fields(model = %self.inner.model, product = %request.product_name))]
    pub async fn try_on(&self, request: TryOnRequest) -> Result<GeneratedImage, AiError> {
        if request.product_name.trim().is_empty() {
            return Err(AiError::InvalidInput(
                "a product name is required".to_owned(),
            ));
        }

        let person = match request.person_photo {
            PhotoSource::Bytes { data, mime_type } => {
                if data.is_empty() {
                    return Err(AiError::InvalidInput("the person photo is empty".to_owned()));
                }
                Photo { data, mime_type }
            }
            PhotoSource::Url(url) => self.fetch_photo(&url).await?,
        };
        let product = self.fetch_product_photo(&request.product_photo_url).await?;

        let instruction = format!(
            "Generate a photorealistic image of the person in the first photo \
             wearing the product in the second photo ({name}, category: {category}). \
             Keep the person's pose, face, and background unchanged.",
            name = request.product_name,
            category = request.product_category,
        );

        let body = GenerateRequest {
            contents: vec![Content::user(vec![
                Part::inline(&person.mime_type, &person.data),
                Part::inline(&product.mime_type, &product.data),
                Part::text(&instruction),
            ])],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.execute(&body).await?;
        image_from_response(response)
    }

    async fn execute(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.inner.base_url, self.inner.model
        );

        let response = self.inner.api.post(&endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AiError::Api {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a product photo, caching it briefly: the same garment gets
    /// tried on far more often than the catalog changes.
    async fn fetch_product_photo(&self, url: &Url) -> Result<Photo, AiError> {
        if let Some(photo) = self.inner.photo_cache.get(url.as_str()).await {
            debug!(url = %url, "product photo cache hit");
            return Ok(photo);
        }

        let photo = self.fetch_photo(url).await?;
        self.inner
            .photo_cache
            .insert(url.as_str().to_owned(), photo.clone())
            .await;
        Ok(photo)
    }

    async fn fetch_photo(&self, url: &Url) -> Result<Photo, AiError> {
        let response = self
            .inner
            .fetcher
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_owned())
            .unwrap_or_else(|| "image/jpeg".to_owned());

        let data = response.bytes().await?.to_vec();
        Ok(Photo { data, mime_type })
    }
}

fn text_from_response(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

fn image_from_response(response: GenerateResponse) -> Result<GeneratedImage, AiError> {
    use base64::Engine as _;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let mut text = String::new();
    for part in parts {
        if let Some(blob) = part.inline_data {
            let bytes = base64::engine::general_purpose::STANDARD.decode(blob.data.as_bytes())?;
            return Ok(GeneratedImage {
                bytes,
                mime_type: blob.mime_type,
            });
        }
        if let Some(t) = part.text {
            text.push_str(&t);
        }
    }

    if text.is_empty() {
        Err(AiError::Empty)
    } else {
        Err(AiError::NoImage(text))
    }
}

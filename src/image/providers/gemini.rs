//! Gemini (Google) image editing provider.

use crate::error::{sanitize_error_message, Result, StudioError, ENTITY_NOT_FOUND};
use crate::image::provider::{EditProvider, EditRequest};
use crate::image::types::{ImageData, ImageFormat};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "API_KEY"];

/// Reads the first non-empty API key from the environment.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| !key.trim().is_empty())
}

/// Builder for GeminiEditor.
#[derive(Debug, Clone, Default)]
pub struct GeminiEditorBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiEditorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY`, then `API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API root (e.g., for a proxy).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the editor.
    ///
    /// A missing key is not an error: the standard tier may be reachable
    /// without one, and a rejected call is classified later.
    pub fn build(self) -> Result<GeminiEditor> {
        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(GeminiEditor {
            client: client.build()?,
            api_key: self.api_key.or_else(api_key_from_env),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Gemini image editing provider.
pub struct GeminiEditor {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiEditor {
    /// Creates a new `GeminiEditorBuilder`.
    pub fn builder() -> GeminiEditorBuilder {
        GeminiEditorBuilder::new()
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<ImageData> {
        let start = Instant::now();
        let model = request.mode.model_id();
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let body = GeminiRequest::from_edit_request(request);

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(ref key) = self.api_key {
            builder = builder.header("x-goog-api-key", key);
        }

        tracing::debug!(model, mode = %request.mode, "submitting Gemini edit request");
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let image = gemini_response.into_first_image()?;

        tracing::debug!(
            model,
            duration_ms = start.elapsed().as_millis() as u64,
            bytes = image.size(),
            "Gemini edit complete"
        );
        Ok(image)
    }
}

#[async_trait]
impl EditProvider for GeminiEditor {
    async fn edit(&self, request: &EditRequest) -> Result<ImageData> {
        self.edit_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

fn parse_error(status: u16, text: &str) -> StudioError {
    let message = ApiErrorBody::message_from(text);
    let message = sanitize_error_message(&message);
    if status == 404 || message.contains(ENTITY_NOT_FOUND) {
        return StudioError::AuthRequired;
    }
    let lower = message.to_lowercase();
    if lower.contains("safety") || lower.contains("blocked") || lower.contains("prohibited") {
        return StudioError::ContentBlocked(message);
    }
    StudioError::Api { status, message }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
    image_size: &'static str,
}

impl GeminiRequest {
    fn from_edit_request(req: &EditRequest) -> Self {
        // The payload is always labelled PNG, whatever the source encoding.
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: ImageFormat::Png.mime_type().to_string(),
                    data: req.image.to_base64(),
                },
            },
            GeminiRequestPart::Text {
                text: req.instruction.clone(),
            },
        ];

        let generation_config = req
            .mode
            .output_config()
            .map(|(ratio, size)| GeminiConfig {
                image_config: ImageConfig {
                    aspect_ratio: ratio.as_str(),
                    image_size: size.as_str(),
                },
            });

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<Segment>,
}

/// One segment of a candidate's content.
///
/// The model may interleave commentary with images; anything that is
/// neither is kept as `Other` so it never aborts parsing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Segment {
    Image {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

impl GeminiResponse {
    /// Selects the first image segment of the first candidate.
    fn into_first_image(self) -> Result<ImageData> {
        if let Some(ref feedback) = self.prompt_feedback {
            if let Some(ref reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(StudioError::ContentBlocked(msg));
            }
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            StudioError::UnexpectedResponse("No response from AI model".into())
        })?;

        if let Some(ref finish_reason) = candidate.finish_reason {
            match finish_reason.as_str() {
                "SAFETY"
                | "IMAGE_SAFETY"
                | "IMAGE_PROHIBITED_CONTENT"
                | "RECITATION"
                | "PROHIBITED_CONTENT"
                | "BLOCKLIST" => {
                    return Err(StudioError::ContentBlocked(format!(
                        "Content blocked by Gemini safety filter: {}",
                        finish_reason
                    )));
                }
                _ => {} // STOP, MAX_TOKENS, etc. are normal
            }
        }

        let segments = candidate.content.map(|c| c.parts).unwrap_or_default();
        for segment in segments {
            match segment {
                Segment::Image { inline_data } => {
                    let format =
                        ImageFormat::from_mime_type(&inline_data.mime_type).unwrap_or_default();
                    return ImageData::from_base64(&inline_data.data, format);
                }
                Segment::Text { text } => {
                    tracing::debug!(len = text.len(), "skipping text segment");
                }
                Segment::Other(_) => {}
            }
        }

        Err(StudioError::UnexpectedResponse(
            "No image data found in AI response".into(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl ApiErrorBody {
    /// Extracts `error.message` from a Google error envelope, else the raw text.
    fn message_from(text: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(text) {
            Ok(body) if !body.error.message.is_empty() => body.error.message,
            _ => text.to_string(),
        }
    }
}

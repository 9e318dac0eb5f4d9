//! Edit provider trait and the single-shot submission entry point.

use crate::error::{Result, SubmitError};
use crate::image::types::{AspectRatio, ImageData, ImageSize};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which remote model tier processes an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditingMode {
    /// Fast tier, usable without a configured credential.
    #[default]
    Standard,
    /// High-quality tier; requires a credential from the host.
    Professional,
}

impl EditingMode {
    /// Returns the model identifier this mode selects.
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Standard => "gemini-2.5-flash-image",
            Self::Professional => "gemini-3-pro-image-preview",
        }
    }

    /// Returns true if this mode needs a configured credential.
    pub fn requires_credential(&self) -> bool {
        matches!(self, Self::Professional)
    }

    /// Output geometry forced by this mode, if any.
    pub fn output_config(&self) -> Option<(AspectRatio, ImageSize)> {
        match self {
            Self::Standard => None,
            Self::Professional => Some((AspectRatio::StandardPortrait, ImageSize::OneK)),
        }
    }
}

impl std::fmt::Display for EditingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Professional => write!(f, "professional"),
        }
    }
}

impl std::str::FromStr for EditingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "professional" | "pro" => Ok(Self::Professional),
            other => Err(format!("unknown editing mode: {other}")),
        }
    }
}

/// A request to restyle one image.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// The image to edit.
    pub image: ImageData,
    /// Natural-language instruction.
    pub instruction: String,
    /// Model tier.
    pub mode: EditingMode,
}

impl EditRequest {
    /// Creates a new request.
    pub fn new(image: ImageData, instruction: impl Into<String>, mode: EditingMode) -> Self {
        Self {
            image,
            instruction: instruction.into(),
            mode,
        }
    }
}

/// A remote service that can edit images.
#[async_trait]
pub trait EditProvider: Send + Sync {
    /// Sends one edit request and returns the first image produced.
    async fn edit(&self, request: &EditRequest) -> Result<ImageData>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;
}

/// Submits one edit, collapsing failures to [`SubmitError`].
///
/// Exactly one attempt is made.
pub async fn submit(
    provider: &dyn EditProvider,
    request: &EditRequest,
) -> std::result::Result<ImageData, SubmitError> {
    match provider.edit(request).await {
        Ok(image) => Ok(image),
        Err(e) => {
            let classified = SubmitError::classify(e);
            tracing::warn!(
                provider = provider.name(),
                mode = %request.mode,
                "edit failed: {classified}"
            );
            Err(classified)
        }
    }
}

//! Error types for capture, editing and session handling.

/// Marker the Gemini API uses when the selected key cannot reach a model.
///
/// For the professional tier this is the only signal that no usable
/// credential is configured, so it is matched verbatim.
pub const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Maximum length of a remote error body kept in an error value.
const MAX_ERROR_LEN: usize = 500;

/// Errors that can occur while acquiring or editing an image.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Camera permission denied or no capture device available.
    #[error("camera unavailable: {0}")]
    CameraAccess(String),

    /// The professional tier has no valid credential configured.
    #[error("a credential is required for this editing mode")]
    AuthRequired,

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API answered, but not with anything usable.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 or data URL payloads.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudioError {
    /// Returns true if this error means the credential has to be (re)configured.
    ///
    /// Besides the explicit variant, a 404 from the API or a message carrying
    /// [`ENTITY_NOT_FOUND`] counts.
    pub fn is_auth_required(&self) -> bool {
        match self {
            Self::AuthRequired => true,
            Self::Api { status: 404, .. } => true,
            Self::Api { message, .. } => message.contains(ENTITY_NOT_FOUND),
            Self::UnexpectedResponse(msg) | Self::InvalidRequest(msg) => {
                msg.contains(ENTITY_NOT_FOUND)
            }
            _ => false,
        }
    }
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;

/// Failure of a single edit submission, as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Credential missing or rejected; recovered by configuring one.
    #[error("credential required")]
    AuthRequired,

    /// Any other remote or network failure. Carries local diagnostics only.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

impl SubmitError {
    /// Collapses a [`StudioError`] into the two outcomes a submission can have.
    pub fn classify(err: StudioError) -> Self {
        if err.is_auth_required() {
            Self::AuthRequired
        } else {
            Self::ProcessingFailed(err.to_string())
        }
    }
}

impl From<StudioError> for SubmitError {
    fn from(err: StudioError) -> Self {
        Self::classify(err)
    }
}

/// Redacts API keys and truncates a remote error body.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let redacted: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let bare = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_');
            if bare.starts_with("AIza") && bare.len() > 20 {
                word.replace(bare, "[REDACTED]")
            } else {
                word.to_string()
            }
        })
        .collect();
    let mut joined = redacted.join(" ");
    if joined.len() > MAX_ERROR_LEN {
        let mut cut = MAX_ERROR_LEN;
        while !joined.is_char_boundary(cut) {
            cut -= 1;
        }
        joined.truncate(cut);
        joined.push_str("...");
    }
    joined
}

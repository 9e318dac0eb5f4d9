//! Image editing providers.

mod gemini;

pub use gemini::{
    api_key_from_env, GeminiEditor, GeminiEditorBuilder, API_KEY_ENV_VARS, DEFAULT_BASE_URL,
};

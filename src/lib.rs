#![warn(missing_docs)]
//! Banano - AI photo styling studio.
//!
//! This crate models a small photo-editing studio: pick a picture (file or
//! camera), optionally square-crop it, restyle it with a preset or free-form
//! instruction through Gemini, and share the result to an in-memory gallery.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use banano::{EnvCredentials, GeminiEditor, SessionController, StudioConfig, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> banano::Result<()> {
//!     let editor = GeminiEditor::builder().build()?;
//!     let mut session = SessionController::new(
//!         StudioConfig::from_env()?,
//!         Arc::new(editor),
//!         Arc::new(EnvCredentials),
//!     );
//!
//!     let photo = std::fs::read("portrait.jpg")?;
//!     session.upload_file(Some(photo.as_slice()))?;
//!     session.select_preset("editorial-retouch");
//!     if session.submit().await == SubmitOutcome::Edited {
//!         session.save_edited(".")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `banano` command-line driver

pub mod brand;
pub mod config;
pub mod credential;
mod error;
pub mod gallery;
pub mod image;
pub mod presets;
pub mod session;

// Re-export error types at crate root
pub use error::{Result, StudioError, SubmitError, ENTITY_NOT_FOUND};

pub use brand::{Branding, AMNA, NANO_BANANO};
pub use config::{StudioConfig, StudioConfigBuilder};
pub use credential::{CredentialPoller, CredentialService, EnvCredentials};
pub use gallery::{Gallery, GalleryItem};
pub use self::image::providers::{GeminiEditor, GeminiEditorBuilder};
pub use self::image::{EditProvider, EditRequest, EditingMode, ImageData, ImageFormat};
pub use presets::{list_presets, resolve_instruction, Preset};
pub use session::{ImageState, SessionController, SubmitOutcome, UiFlags};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, StudioError, SubmitError};
    pub use crate::image::capture::{CameraDevice, VideoStream};
    pub use crate::image::providers::GeminiEditor;
    pub use crate::image::{EditProvider, EditingMode, ImageData};
    pub use crate::session::{SessionController, SubmitOutcome};
}

//! Image acquisition, types and the edit providers.

pub mod capture;
pub(crate) mod provider;
pub mod providers;
pub(crate) mod types;

pub use provider::{submit, EditProvider, EditRequest, EditingMode};
pub use types::{AspectRatio, ImageData, ImageFormat, ImageSize};

//! Session state controller.
//!
//! Owns the current image pair, the gallery and every dialog flag. Each
//! public method corresponds to one user action and runs to completion
//! before the next; the only awaits are the camera prompt, the credential
//! check and the edit call.

use crate::config::StudioConfig;
use crate::credential::{CredentialPoller, CredentialService};
use crate::error::{Result, SubmitError};
use crate::gallery::{Gallery, GalleryItem};
use crate::image::capture::{self, CameraDevice, CaptureSession};
use crate::image::{submit, EditProvider, EditRequest, EditingMode, ImageData};
use crate::presets::{self, Preset};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The current original/edited pair and its processing status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageState {
    /// Image supplied by the user.
    pub original: Option<ImageData>,
    /// Latest successful edit of `original`.
    pub edited: Option<ImageData>,
    /// True while an edit request is in flight.
    pub is_processing: bool,
    /// User-facing message of the last failure.
    pub error: Option<String>,
}

impl ImageState {
    fn fresh(original: ImageData) -> Self {
        Self {
            original: Some(original),
            ..Default::default()
        }
    }
}

/// Dialog and panel visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiFlags {
    /// Live camera panel.
    pub camera_open: bool,
    /// Share-to-gallery dialog.
    pub share_open: bool,
    /// Credential configuration dialog.
    pub credential_open: bool,
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No original, or an edit already in flight.
    NotReady,
    /// Intercepted or rejected for a missing credential; the dialog is open.
    CredentialRequired,
    /// `edited` holds the new result.
    Edited,
    /// `error` holds the failure message.
    Failed,
    /// The original changed while the request was in flight; result dropped.
    Stale,
}

/// An accepted submission waiting for its network call.
pub struct PendingEdit {
    generation: u64,
    request: EditRequest,
    provider: Arc<dyn EditProvider>,
}

impl std::fmt::Debug for PendingEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingEdit")
            .field("generation", &self.generation)
            .field("mode", &self.request.mode)
            .finish()
    }
}

impl PendingEdit {
    /// The request that will be sent.
    pub fn request(&self) -> &EditRequest {
        &self.request
    }

    /// Performs the single remote attempt.
    pub async fn run(self) -> CompletedEdit {
        let result = submit(self.provider.as_ref(), &self.request).await;
        CompletedEdit {
            generation: self.generation,
            result,
        }
    }
}

/// Result of [`PendingEdit::run`], to be handed back to the controller.
#[derive(Debug)]
pub struct CompletedEdit {
    generation: u64,
    result: std::result::Result<ImageData, SubmitError>,
}

/// Single source of truth for one studio session.
pub struct SessionController {
    config: StudioConfig,
    provider: Arc<dyn EditProvider>,
    credentials: Arc<dyn CredentialService>,
    image: ImageState,
    // Bumped whenever `original` changes, so late results can be dropped.
    generation: u64,
    mode: EditingMode,
    selected_preset: &'static str,
    custom_prompt: String,
    gallery: Gallery,
    flags: UiFlags,
    author_name: String,
    share_preview: Option<ImageData>,
    has_credential: Arc<AtomicBool>,
    camera: Option<CaptureSession>,
    poller: Option<CredentialPoller>,
}

impl SessionController {
    /// Creates a session with the brand's seeded gallery.
    pub fn new(
        config: StudioConfig,
        provider: Arc<dyn EditProvider>,
        credentials: Arc<dyn CredentialService>,
    ) -> Self {
        Self {
            config,
            provider,
            credentials,
            image: ImageState::default(),
            generation: 0,
            mode: config.default_mode,
            selected_preset: presets::default_preset().id,
            custom_prompt: String::new(),
            gallery: Gallery::seeded(config.brand),
            flags: UiFlags::default(),
            author_name: String::new(),
            share_preview: None,
            has_credential: Arc::new(AtomicBool::new(false)),
            camera: None,
            poller: None,
        }
    }

    /// Starts the credential status poller. Must run inside a tokio runtime.
    pub fn mount(&mut self) {
        if self.poller.is_none() {
            self.poller = Some(CredentialPoller::start(
                self.credentials.clone(),
                self.has_credential.clone(),
                self.config.poll_interval,
            ));
        }
    }

    /// Stops the poller and releases the camera if it is still open.
    pub async fn unmount(&mut self) {
        self.stop_camera();
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Current image pair.
    pub fn image_state(&self) -> &ImageState {
        &self.image
    }

    /// Dialog visibility.
    pub fn flags(&self) -> UiFlags {
        self.flags
    }

    /// Gallery, newest first.
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Current editing mode.
    pub fn mode(&self) -> EditingMode {
        self.mode
    }

    /// Last observed credential status (display only).
    pub fn has_credential(&self) -> bool {
        self.has_credential.load(Ordering::Relaxed)
    }

    /// Returns true while the poller runs.
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(CredentialPoller::is_running)
    }

    /// Currently selected preset.
    pub fn selected_preset(&self) -> &'static Preset {
        presets::find_preset(self.selected_preset).unwrap_or_else(presets::default_preset)
    }

    /// Image awaiting share confirmation.
    pub fn share_preview(&self) -> Option<&ImageData> {
        self.share_preview.as_ref()
    }

    /// Switches the model tier.
    pub fn set_mode(&mut self, mode: EditingMode) {
        self.mode = mode;
    }

    /// Selects a preset. Unknown ids are ignored.
    pub fn select_preset(&mut self, id: &str) -> bool {
        match presets::find_preset(id) {
            Some(preset) => {
                self.selected_preset = preset.id;
                true
            }
            None => false,
        }
    }

    /// Sets the free-form instruction; blank text defers to the preset.
    pub fn set_custom_prompt(&mut self, text: impl Into<String>) {
        self.custom_prompt = text.into();
    }

    /// Instruction the next submission would send.
    pub fn instruction(&self) -> String {
        presets::resolve_instruction(self.selected_preset, &self.custom_prompt)
    }

    fn replace_original(&mut self, original: ImageData) {
        self.generation += 1;
        self.image = ImageState::fresh(original);
    }

    /// Uses an uploaded file as the new original. `None` is a no-op.
    pub fn upload_file(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        if let Some(image) = capture::import_from_file(bytes)? {
            self.replace_original(image);
            self.stop_camera();
        }
        Ok(())
    }

    /// Opens the camera panel and acquires a stream.
    ///
    /// On failure the panel closes and the brand's camera message is shown.
    pub async fn start_camera(&mut self, device: &dyn CameraDevice) {
        self.stop_camera();
        self.flags.camera_open = true;
        match capture::import_from_device(device).await {
            Ok(session) => self.camera = Some(session),
            Err(e) => {
                tracing::warn!("camera error: {e}");
                self.image.error = Some(self.config.brand.copy.camera_error.to_string());
                self.flags.camera_open = false;
            }
        }
    }

    /// Captures the current frame as the new original and closes the camera.
    ///
    /// Returns `Ok(false)` when no camera is open.
    pub fn capture_photo(&mut self) -> Result<bool> {
        let Some(session) = self.camera.take() else {
            return Ok(false);
        };
        self.flags.camera_open = false;
        let image = session.capture()?;
        self.replace_original(image);
        Ok(true)
    }

    /// Releases the camera without capturing.
    pub fn stop_camera(&mut self) {
        if let Some(session) = self.camera.take() {
            session.release();
        }
        self.flags.camera_open = false;
    }

    /// Replaces the original with its centered square crop.
    ///
    /// An edit still in flight for the uncropped image is abandoned.
    pub fn crop_to_square(&mut self) -> Result<()> {
        let Some(ref original) = self.image.original else {
            return Ok(());
        };
        let cropped = capture::center_crop_to_square(original)?;
        self.replace_original(cropped);
        Ok(())
    }

    /// Drops the current image pair.
    pub fn discard(&mut self) {
        self.generation += 1;
        self.image = ImageState::default();
    }

    /// Gates and starts a submission.
    ///
    /// Returns `None` without an original, while another edit is in flight,
    /// or when the professional tier has no credential (the credential
    /// dialog opens instead and nothing is sent).
    pub async fn begin_submit(&mut self) -> Option<PendingEdit> {
        self.gate().await.ok()
    }

    async fn gate(&mut self) -> std::result::Result<PendingEdit, SubmitOutcome> {
        let Some(original) = self.image.original.clone() else {
            return Err(SubmitOutcome::NotReady);
        };
        if self.image.is_processing {
            return Err(SubmitOutcome::NotReady);
        }

        if self.mode.requires_credential() && !self.credentials.has_credential().await {
            tracing::debug!("professional mode without credential, opening dialog");
            self.flags.credential_open = true;
            return Err(SubmitOutcome::CredentialRequired);
        }

        self.image.is_processing = true;
        self.image.error = None;

        Ok(PendingEdit {
            generation: self.generation,
            request: EditRequest::new(original, self.instruction(), self.mode),
            provider: self.provider.clone(),
        })
    }

    /// Applies the result of a submission.
    pub fn finish_submit(&mut self, completed: CompletedEdit) -> SubmitOutcome {
        if completed.generation != self.generation {
            tracing::debug!("dropping edit for a replaced original");
            return SubmitOutcome::Stale;
        }

        self.image.is_processing = false;
        match completed.result {
            Ok(edited) => {
                self.image.edited = Some(edited);
                SubmitOutcome::Edited
            }
            Err(SubmitError::AuthRequired) => {
                self.flags.credential_open = true;
                SubmitOutcome::CredentialRequired
            }
            Err(SubmitError::ProcessingFailed(detail)) => {
                tracing::warn!(%detail, "edit failed");
                self.image.error = Some(self.config.brand.copy.processing_error.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Runs a whole submission: gate, remote call, state update.
    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.gate().await {
            Ok(pending) => {
                let completed = pending.run().await;
                self.finish_submit(completed)
            }
            Err(outcome) => outcome,
        }
    }

    /// File name and bytes for saving the edited image.
    pub fn download_edited(&self) -> Option<(String, &ImageData)> {
        let edited = self.image.edited.as_ref()?;
        let name = format!(
            "{}-{}.{}",
            self.config.brand.slug,
            chrono::Utc::now().timestamp_millis(),
            edited.format.extension()
        );
        Some((name, edited))
    }

    /// Writes the edited image into `dir`. Returns the written path.
    pub fn save_edited(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let Some((name, edited)) = self.download_edited() else {
            return Ok(None);
        };
        let path = dir.as_ref().join(name);
        edited.save(&path)?;
        Ok(Some(path))
    }

    /// Opens the share dialog with the edited image as preview.
    pub fn share_to_gallery(&mut self) -> bool {
        let Some(ref edited) = self.image.edited else {
            return false;
        };
        self.share_preview = Some(edited.clone());
        self.flags.share_open = true;
        true
    }

    /// Swaps the share preview for an uploaded file. `None` is a no-op.
    pub fn replace_share_preview(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        if let Some(image) = capture::import_from_file(bytes)? {
            self.share_preview = Some(image);
        }
        Ok(())
    }

    /// Sets the author name typed into the share dialog.
    pub fn set_author_name(&mut self, name: impl Into<String>) {
        self.author_name = name.into();
    }

    /// Publishes the preview (or the edited image) and closes the dialog.
    pub fn confirm_share(&mut self) -> Option<GalleryItem> {
        let image = self
            .share_preview
            .as_ref()
            .or(self.image.edited.as_ref())?;
        let url = image.to_data_url();

        let item = self
            .gallery
            .share(url, Some(self.author_name.as_str()), self.config.brand)
            .clone();

        self.flags.share_open = false;
        self.author_name.clear();
        self.share_preview = None;
        Some(item)
    }

    /// Closes the share dialog without publishing.
    pub fn cancel_share(&mut self) {
        self.flags.share_open = false;
        self.share_preview = None;
    }

    /// Adds one vote to a gallery item.
    pub fn vote(&mut self, id: &str) -> bool {
        self.gallery.vote(id)
    }

    /// Opens the credential dialog.
    pub fn open_credential_dialog(&mut self) {
        self.flags.credential_open = true;
    }

    /// Closes the credential dialog.
    pub fn close_credential_dialog(&mut self) {
        self.flags.credential_open = false;
    }

    /// Opens the host picker, then refreshes the credential flag.
    pub async fn manage_credential(&mut self) {
        if let Err(e) = self.credentials.open_picker().await {
            tracing::warn!("credential picker failed: {e}");
        }
        let present = self.credentials.has_credential().await;
        self.has_credential.store(present, Ordering::Relaxed);
    }
}

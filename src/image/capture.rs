//! Image acquisition: file import, camera capture and square cropping.

use crate::error::{Result, StudioError};
use crate::image::types::{ImageData, ImageFormat};
use async_trait::async_trait;

/// A camera that can hand out live video streams.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Requests a live stream. Fails when permission is denied or no
    /// device is present.
    async fn open(&self) -> Result<Box<dyn VideoStream>>;
}

/// A live video stream owned by exactly one [`CaptureSession`].
pub trait VideoStream: Send {
    /// Returns the current frame at the stream's native resolution.
    fn current_frame(&mut self) -> Result<image::RgbaImage>;

    /// Stops every underlying media track.
    fn stop(&mut self);
}

/// Scoped ownership of an acquired stream.
///
/// The stream is stopped exactly once: by [`capture`](Self::capture),
/// [`release`](Self::release), or on drop.
pub struct CaptureSession {
    stream: Option<Box<dyn VideoStream>>,
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("live", &self.stream.is_some())
            .finish()
    }
}

impl CaptureSession {
    fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Snapshots the current frame as PNG, then releases the stream.
    ///
    /// The stream is released even when the snapshot fails.
    pub fn capture(mut self) -> Result<ImageData> {
        let frame = match self.stream.as_mut() {
            Some(stream) => stream.current_frame(),
            None => Err(StudioError::CameraAccess("stream already released".into())),
        };
        self.release_stream();
        let frame = frame?;
        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            "captured camera frame"
        );
        ImageData::encode_png(&image::DynamicImage::ImageRgba8(frame))
    }

    /// Stops the stream without capturing.
    pub fn release(mut self) {
        self.release_stream();
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("camera stream released");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release_stream();
    }
}

/// Opens a camera stream, mapping any failure to [`StudioError::CameraAccess`].
pub async fn import_from_device(device: &dyn CameraDevice) -> Result<CaptureSession> {
    match device.open().await {
        Ok(stream) => Ok(CaptureSession::new(stream)),
        Err(StudioError::CameraAccess(msg)) => Err(StudioError::CameraAccess(msg)),
        Err(e) => Err(StudioError::CameraAccess(e.to_string())),
    }
}

/// Imports an uploaded file.
///
/// Returns `Ok(None)` when no file was supplied. Supported encodings are
/// kept as-is; anything else the decoder understands is re-encoded as PNG.
pub fn import_from_file(bytes: Option<&[u8]>) -> Result<Option<ImageData>> {
    let Some(bytes) = bytes else {
        return Ok(None);
    };

    if let Some(format) = ImageFormat::from_magic_bytes(bytes) {
        return Ok(Some(ImageData::new(bytes.to_vec(), format)));
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| StudioError::Decode(format!("unsupported image: {e}")))?;
    ImageData::encode_png(&img).map(Some)
}

/// Crops to a centered square whose side is the shorter dimension.
///
/// Square input is returned unchanged; anything else is re-encoded as PNG.
pub fn center_crop_to_square(image: &ImageData) -> Result<ImageData> {
    let img = image.decode()?;
    let (width, height) = (img.width(), img.height());
    if width == height {
        return Ok(image.clone());
    }

    let size = width.min(height);
    let x = (width - size) / 2;
    let y = (height - size) / 2;
    ImageData::encode_png(&img.crop_imm(x, y, size, size))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::image::types::tests::png;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// A camera returning a fixed-size frame and counting stops.
    #[derive(Default, Clone)]
    pub(crate) struct FakeCamera {
        pub(crate) width: u32,
        pub(crate) height: u32,
        pub(crate) deny: bool,
        pub(crate) opened: Arc<AtomicUsize>,
        pub(crate) stopped: Arc<AtomicUsize>,
    }

    impl FakeCamera {
        pub(crate) fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ..Default::default()
            }
        }

        pub(crate) fn denied() -> Self {
            Self {
                deny: true,
                ..Default::default()
            }
        }
    }

    struct FakeStream {
        width: u32,
        height: u32,
        stopped: Arc<AtomicUsize>,
    }

    impl VideoStream for FakeStream {
        fn current_frame(&mut self) -> Result<image::RgbaImage> {
            Ok(image::RgbaImage::from_pixel(
                self.width,
                self.height,
                image::Rgba([10, 20, 30, 255]),
            ))
        }

        fn stop(&mut self) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CameraDevice for FakeCamera {
        async fn open(&self) -> Result<Box<dyn VideoStream>> {
            if self.deny {
                return Err(StudioError::InvalidRequest("NotAllowedError".into()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                width: self.width,
                height: self.height,
                stopped: self.stopped.clone(),
            }))
        }
    }

    #[test]
    fn test_import_from_file_none_is_noop() {
        assert!(import_from_file(None).unwrap().is_none());
    }

    #[test]
    fn test_import_from_file_keeps_png() {
        let img = png(4, 4);
        let imported = import_from_file(Some(img.data.as_slice())).unwrap().unwrap();
        assert_eq!(imported, img);
    }

    #[test]
    fn test_import_from_file_normalizes_gif_to_png() {
        const GIF: [u8; 43] = [
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF,
            0xFF, 0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00,
            0x3B,
        ];
        let imported = import_from_file(Some(GIF.as_slice())).unwrap().unwrap();
        assert_eq!(imported.format, ImageFormat::Png);
        assert_eq!(imported.dimensions().unwrap(), (1, 1));
    }

    #[test]
    fn test_import_from_file_normalizes_bmp_to_png() {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image::RgbImage::new(3, 2))
            .write_to(&mut buf, image::ImageFormat::Bmp)
            .unwrap();
        let imported = import_from_file(Some(buf.get_ref().as_slice())).unwrap().unwrap();
        assert_eq!(imported.format, ImageFormat::Png);
        assert_eq!(imported.dimensions().unwrap(), (3, 2));
    }

    #[test]
    fn test_import_from_file_rejects_garbage() {
        let err = import_from_file(Some(b"definitely not an image".as_slice())).unwrap_err();
        assert!(matches!(err, StudioError::Decode(_)));
    }

    #[test]
    fn test_center_crop_landscape() {
        let cropped = center_crop_to_square(&png(10, 4)).unwrap();
        assert_eq!(cropped.format, ImageFormat::Png);
        assert_eq!(cropped.dimensions().unwrap(), (4, 4));

        // Offset is (10 - 4) / 2 = 3, so the first column has red channel 3.
        let pixels = cropped.decode().unwrap().to_rgba8();
        assert_eq!(pixels.get_pixel(0, 0)[0], 3);
    }

    #[test]
    fn test_center_crop_portrait() {
        let cropped = center_crop_to_square(&png(5, 9)).unwrap();
        assert_eq!(cropped.dimensions().unwrap(), (5, 5));
        let pixels = cropped.decode().unwrap().to_rgba8();
        assert_eq!(pixels.get_pixel(0, 0)[1], 2);
    }

    #[test]
    fn test_center_crop_idempotent() {
        let once = center_crop_to_square(&png(12, 7)).unwrap();
        let twice = center_crop_to_square(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_capture_releases_once() {
        let camera = FakeCamera::new(6, 3);
        let session = import_from_device(&camera).await.unwrap();
        let image = session.capture().unwrap();
        assert_eq!(image.dimensions().unwrap(), (6, 3));
        assert_eq!(camera.opened.load(Ordering::SeqCst), 1);
        assert_eq!(camera.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_and_drop_release_once() {
        let camera = FakeCamera::new(2, 2);
        import_from_device(&camera).await.unwrap().release();
        assert_eq!(camera.stopped.load(Ordering::SeqCst), 1);

        {
            let _session = import_from_device(&camera).await.unwrap();
        }
        assert_eq!(camera.stopped.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_denied_camera_maps_to_camera_access() {
        let camera = FakeCamera::denied();
        let err = import_from_device(&camera).await.unwrap_err();
        assert!(matches!(err, StudioError::CameraAccess(_)));
        assert_eq!(camera.stopped.load(Ordering::SeqCst), 0);
    }
}

/// Turning raw camera frames into something displayable
///
/// The preview is shown mirrored (like looking into a mirror), so the
/// still photo is mirrored the same way before it is encoded.
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, RgbImage};
use iced::widget::image::Handle;

use crate::error::CaptureError;
use crate::state::data::{Photo, PhotoSource};

/// Mirror a frame and encode it as a JPEG photo
pub fn still_from_frame(frame: &RgbImage, quality: u8) -> Result<Photo, CaptureError> {
    let mirrored = imageops::flip_horizontal(frame);
    let (width, height) = mirrored.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(&mirrored)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    tracing::info!("📸 Captured {}x{} selfie ({} KB)", width, height, jpeg.len() / 1024);
    Ok(Photo::new(jpeg, width, height, PhotoSource::Camera))
}

/// Mirrored RGBA handle for the live preview
pub fn preview_handle(frame: &RgbImage) -> Handle {
    let mirrored = imageops::flip_horizontal(frame);
    let (width, height) = mirrored.dimensions();
    let rgba = DynamicImage::ImageRgb8(mirrored).to_rgba8();
    Handle::from_rgba(width, height, rgba.into_raw())
}

/// Screenshot pixels ready for encoding
use iced::{Rectangle, Size};
use image::{imageops, ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::error::ShareError;

/// An RGBA pixel buffer
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    rgba: Vec<u8>,
}

impl Raster {
    /// Wrap raw RGBA bytes, checking the length matches the size
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ShareError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(ShareError::Screenshot(format!(
                "{}x{} screenshot with {} bytes",
                width,
                height,
                rgba.len()
            )));
        }
        Ok(Self { width, height, rgba })
    }

    /// Build from an iced window screenshot, keeping only `bounds`
    ///
    /// `bounds` are logical window coordinates, as reported by
    /// `container::visible_bounds`.
    pub fn from_screenshot(shot: &iced::window::Screenshot, bounds: Rectangle) -> Result<Self, ShareError> {
        let region = physical_region(bounds, shot.scale_factor, shot.size).ok_or_else(|| {
            ShareError::Screenshot(format!("card bounds {:?} fall outside the window", bounds))
        })?;
        Self::new(shot.size.width, shot.size.height, shot.as_ref().to_vec())?.crop(region)
    }

    /// Cut out a sub-rectangle in pixels
    pub fn crop(&self, region: Rectangle<u32>) -> Result<Self, ShareError> {
        let fits = region.width > 0
            && region.height > 0
            && region.x + region.width <= self.width
            && region.y + region.height <= self.height;
        if !fits {
            return Err(ShareError::Screenshot(format!(
                "crop {:?} outside {}x{} screenshot",
                region, self.width, self.height
            )));
        }

        let img = self.to_image()?;
        let cropped = imageops::crop_imm(&img, region.x, region.y, region.width, region.height).to_image();
        Self::new(region.width, region.height, cropped.into_raw())
    }

    fn to_image(&self) -> Result<RgbaImage, ShareError> {
        RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or_else(|| ShareError::Encode("pixel buffer size mismatch".to_string()))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ShareError> {
        let img = self.to_image()?;

        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)
            .map_err(|e| ShareError::Encode(e.to_string()))?;
        Ok(png.into_inner())
    }
}

/// Logical bounds scaled to screenshot pixels and clipped to the image
pub fn physical_region(bounds: Rectangle, scale_factor: f64, size: Size<u32>) -> Option<Rectangle<u32>> {
    let scale = scale_factor as f32;
    let left = (bounds.x * scale).floor().max(0.0) as u32;
    let top = (bounds.y * scale).floor().max(0.0) as u32;
    let right = (((bounds.x + bounds.width) * scale).ceil().max(0.0) as u32).min(size.width);
    let bottom = (((bounds.y + bounds.height) * scale).ceil().max(0.0) as u32).min(size.height);

    if left >= right || top >= bottom {
        return None;
    }
    Some(Rectangle {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    })
}

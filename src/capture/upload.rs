/// Photo upload from disk
///
/// The file bytes are kept exactly as read. Decoding only validates the
/// file and measures it; the image widget does its own decoding later.
use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::CaptureError;
use crate::state::data::{Photo, PhotoSource};

/// Extensions offered in the file picker
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Show the picker and load the chosen file
///
/// Returns `None` when the user cancels the dialog.
pub async fn choose_photo() -> Option<Result<Photo, CaptureError>> {
    let file = AsyncFileDialog::new()
        .set_title("Choose a Photo to Roast")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
        .await?;

    Some(load_photo(file.path().to_path_buf()).await)
}

/// Read a file and turn it into a photo
pub async fn load_photo(path: PathBuf) -> Result<Photo, CaptureError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| CaptureError::Read(format!("{}: {}", path.display(), e)))?;

    tracing::info!("📁 Read {} ({} KB)", file_label(&path), bytes.len() / 1024);

    // Decoding is CPU-bound
    task::spawn_blocking(move || decode_photo(bytes))
        .await
        .map_err(|e| CaptureError::Decode(format!("Task join error: {}", e)))?
}

/// Validate encoded bytes and wrap them as an uploaded photo
pub fn decode_photo(bytes: Vec<u8>) -> Result<Photo, CaptureError> {
    let decoded = image::load_from_memory(&bytes).map_err(|e| CaptureError::Decode(e.to_string()))?;
    Ok(Photo::new(bytes, decoded.width(), decoded.height(), PhotoSource::Upload))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

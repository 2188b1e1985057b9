/// Sharing a finished roast
///
/// This module handles:
/// - Caption text for sharing and copying (caption.rs)
/// - Turning a window screenshot into a PNG (raster.rs)
/// - Handing the PNG to a native share sheet, or saving it to disk
pub mod caption;
pub mod raster;

use rfd::AsyncFileDialog;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ShareError;
use raster::Raster;

/// File name used when the image goes to a share sheet
pub const SHARE_FILE_NAME: &str = "roast.png";

/// Default file name for the save dialog fallback
pub const DOWNLOAD_FILE_NAME: &str = "ugly-face-roast.png";

pub const SHARE_TITLE: &str = "Ugly Face Detector Result";

/// What a share sheet receives
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub file_name: String,
    pub png: Vec<u8>,
}

/// A platform share sheet that may or may not exist
pub trait ShareSheet: Send + Sync {
    /// Whether image attachments can be shared
    fn supports_files(&self) -> bool;

    fn share(&self, payload: SharePayload) -> Result<(), ShareError>;
}

/// Desktop platforms have no share sheet; every share takes the fallback
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn supports_files(&self) -> bool {
        false
    }

    fn share(&self, _payload: SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

/// Future resolving to the chosen save location, `None` when cancelled
pub type SaveLocation = Pin<Box<dyn Future<Output = Option<PathBuf>> + Send>>;

/// Where the fallback asks for a file name
pub trait SaveDialog: Send + Sync {
    fn choose(&self, default_name: &str) -> SaveLocation;
}

/// Native "Save As" dialog
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSaveDialog;

impl SaveDialog for NativeSaveDialog {
    fn choose(&self, default_name: &str) -> SaveLocation {
        let pending = AsyncFileDialog::new()
            .set_title("Save Your Roast")
            .set_file_name(default_name)
            .add_filter("PNG image", &["png"])
            .save_file();

        Box::pin(async move { pending.await.map(|file| file.path().to_path_buf()) })
    }
}

/// How a share finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the share sheet
    Shared,
    /// Saved to disk; the caption still needs to go to the clipboard
    Saved { path: PathBuf, caption: String },
}

/// Encode the screenshot and send it out
pub async fn deliver(
    sheet: Arc<dyn ShareSheet>,
    dialog: Arc<dyn SaveDialog>,
    raster: Raster,
    caption: String,
) -> Result<ShareOutcome, ShareError> {
    let png = raster.encode_png()?;
    tracing::info!("🖼️  Rendered {}x{} share image ({} KB)", raster.width, raster.height, png.len() / 1024);

    if sheet.supports_files() {
        sheet.share(SharePayload {
            title: SHARE_TITLE.to_string(),
            text: caption,
            file_name: SHARE_FILE_NAME.to_string(),
            png,
        })?;
        return Ok(ShareOutcome::Shared);
    }

    let path = save_png(dialog.as_ref(), png).await?;
    Ok(ShareOutcome::Saved { path, caption })
}

/// Ask where to put the image and write it there
async fn save_png(dialog: &dyn SaveDialog, png: Vec<u8>) -> Result<PathBuf, ShareError> {
    let path = dialog
        .choose(DOWNLOAD_FILE_NAME)
        .await
        .ok_or(ShareError::Cancelled)?;

    tokio::fs::write(&path, png)
        .await
        .map_err(|e| ShareError::Write(format!("{}: {}", path.display(), e)))?;

    tracing::info!("💾 Saved roast to {}", path.display());
    Ok(path)
}

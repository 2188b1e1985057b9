/// Photo capture module
///
/// This module handles:
/// - Live camera streaming on a worker thread (camera.rs)
/// - Mirroring and encoding camera stills (snapshot.rs)
/// - Picking and validating uploaded files (upload.rs)
///
/// `CaptureScreen` below is the state of the capture screen itself.
pub mod camera;
pub mod snapshot;
pub mod upload;

use iced::widget::image::Handle;
use std::time::Instant;

use crate::error::CaptureError;
use crate::state::data::Photo;
use camera::{CameraDevice, CameraSession, StreamStatus};

/// How the capture screen gets its photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Camera,
    Upload,
}

impl CaptureMode {
    /// Parse the `mode` route parameter; anything unknown means camera
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("upload") => CaptureMode::Upload,
            _ => CaptureMode::Camera,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            CaptureMode::Camera => "camera",
            CaptureMode::Upload => "upload",
        }
    }
}

/// Where the capture screen currently is
pub enum Stage {
    /// Camera worker running (starting up or streaming)
    Live {
        session: CameraSession,
        preview: Option<Handle>,
        seen_generation: u64,
    },
    /// Camera refused or broke; nothing to preview
    NoPreview { reason: CaptureError },
    /// Upload mode, waiting for a file
    Chooser { loading: bool },
    /// A still photo waiting for confirmation
    Still { photo: Photo },
    /// Fake analysis running
    Analyzing { photo: Photo, started: Instant },
}

pub struct CaptureScreen {
    mode: CaptureMode,
    stage: Stage,
    camera: CameraDevice,
}

impl CaptureScreen {
    /// Enter the screen in the given mode; camera mode starts streaming
    pub fn enter(mode: CaptureMode, camera: CameraDevice) -> Self {
        let stage = Self::initial_stage(mode, &camera);
        Self { mode, stage, camera }
    }

    fn initial_stage(mode: CaptureMode, camera: &CameraDevice) -> Stage {
        match mode {
            CaptureMode::Camera => Stage::Live {
                session: CameraSession::start(camera),
                preview: None,
                seen_generation: 0,
            },
            CaptureMode::Upload => Stage::Chooser { loading: false },
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// True while a camera frame can be snapped
    pub fn is_streaming(&self) -> bool {
        matches!(&self.stage, Stage::Live { session, .. } if session.is_streaming())
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.stage, Stage::Analyzing { .. })
    }

    /// Whether the screen animates: a live preview or the analyzing view
    pub fn needs_ticks(&self) -> bool {
        matches!(self.stage, Stage::Live { .. } | Stage::Analyzing { .. })
    }

    /// The still photo awaiting confirmation, if any
    pub fn still(&self) -> Option<&Photo> {
        match &self.stage {
            Stage::Still { photo } => Some(photo),
            _ => None,
        }
    }

    /// Refresh the preview from the camera worker
    ///
    /// Returns the error once when the camera turns out to be unusable;
    /// the screen then drops to the no-preview state.
    pub fn poll(&mut self) -> Option<CaptureError> {
        let Stage::Live {
            session,
            preview,
            seen_generation,
        } = &mut self.stage
        else {
            return None;
        };

        match session.status() {
            StreamStatus::Failed(reason) => {
                self.stage = Stage::NoPreview { reason: reason.clone() };
                Some(reason)
            }
            StreamStatus::Streaming => {
                let generation = session.generation();
                if generation != *seen_generation {
                    if let Some(frame) = session.latest_frame() {
                        *preview = Some(snapshot::preview_handle(&frame));
                    }
                    *seen_generation = generation;
                }
                None
            }
            StreamStatus::Starting | StreamStatus::Stopped => None,
        }
    }

    /// Freeze the current camera frame into a still and release the camera
    pub fn snap(&mut self, jpeg_quality: u8) -> Result<(), CaptureError> {
        let Stage::Live { session, .. } = &self.stage else {
            return Err(CaptureError::NoFrame);
        };

        let frame = session.snapshot()?;
        let photo = snapshot::still_from_frame(&frame, jpeg_quality)?;

        // Replacing the stage drops the session, which releases the camera
        self.stage = Stage::Still { photo };
        Ok(())
    }

    /// The file picker opened (upload mode)
    pub fn begin_upload(&mut self) -> bool {
        match self.stage {
            Stage::Chooser { loading: false } => {
                self.stage = Stage::Chooser { loading: true };
                true
            }
            _ => false,
        }
    }

    /// The picker closed, with or without a usable photo
    pub fn finish_upload(&mut self, outcome: Option<Result<Photo, CaptureError>>) -> Option<CaptureError> {
        if !matches!(self.stage, Stage::Chooser { loading: true }) {
            return None;
        }

        match outcome {
            Some(Ok(photo)) => {
                tracing::info!("🖼️  Upload ready: {}x{}", photo.width, photo.height);
                self.stage = Stage::Still { photo };
                None
            }
            Some(Err(e)) => {
                tracing::warn!("⚠️  Upload rejected: {}", e);
                self.stage = Stage::Chooser { loading: false };
                Some(e)
            }
            None => {
                self.stage = Stage::Chooser { loading: false };
                None
            }
        }
    }

    /// Throw away the still and go back to acquiring
    pub fn retake(&mut self) {
        if matches!(self.stage, Stage::Analyzing { .. }) {
            return;
        }
        tracing::debug!("Retake in {} mode", self.mode.as_param());
        // Drop the old stage (and any camera session) before starting a new one
        self.stage = Stage::Chooser { loading: false };
        self.stage = Self::initial_stage(self.mode, &self.camera);
    }

    /// Move the still into analysis, returning the photo to analyze
    pub fn begin_analysis(&mut self, started: Instant) -> Option<Photo> {
        let Stage::Still { photo } = &self.stage else {
            return None;
        };
        let photo = photo.clone();
        self.stage = Stage::Analyzing {
            photo: photo.clone(),
            started,
        };
        Some(photo)
    }

    /// Take the analyzed photo out once the verdict arrives
    pub fn finish_analysis(&mut self) -> Option<Photo> {
        let Stage::Analyzing { photo, .. } = &self.stage else {
            return None;
        };
        let photo = photo.clone();
        self.stage = Stage::Still { photo: photo.clone() };
        Some(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera::tests::{wait_until, FakeCamera};
    use camera::CameraProvider;
    use std::sync::Arc;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::Ordering;

    fn working_camera() -> (Arc<FakeCamera>, CameraDevice) {
        let camera = Arc::new(FakeCamera::working(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]))));
        let provider: Arc<dyn CameraProvider> = camera.clone();
        (camera, CameraDevice::new(provider))
    }

    fn streaming_screen(provider: CameraDevice) -> CaptureScreen {
        let mut screen = CaptureScreen::enter(CaptureMode::Camera, provider);
        assert!(wait_until(|| {
            screen.poll();
            matches!(screen.stage(), Stage::Live { preview: Some(_), .. })
        }));
        screen
    }

    #[test]
    fn test_mode_param() {
        assert_eq!(CaptureMode::from_param(Some("upload")), CaptureMode::Upload);
        assert_eq!(CaptureMode::from_param(Some("camera")), CaptureMode::Camera);
        assert_eq!(CaptureMode::from_param(Some("selfie-stick")), CaptureMode::Camera);
        assert_eq!(CaptureMode::from_param(None), CaptureMode::Camera);
    }

    #[test]
    fn test_camera_mode_snap_then_retake_restreams() {
        let (camera, provider) = working_camera();
        let mut screen = streaming_screen(provider);
        assert!(screen.is_streaming());

        screen.snap(80).unwrap();
        let first = screen.still().cloned().unwrap();
        assert!(wait_until(|| camera.closed.load(Ordering::SeqCst)));

        screen.retake();
        assert!(screen.still().is_none());
        assert!(matches!(screen.stage(), Stage::Live { preview: None, .. }));
        assert!(wait_until(|| camera.opened.load(Ordering::SeqCst) == 2));
        assert!(wait_until(|| screen.is_streaming()));
        assert_ne!(screen.still(), Some(&first));
    }

    #[test]
    fn test_retake_on_busy_camera_streams_again() {
        let camera = Arc::new(FakeCamera::slow(RgbImage::new(4, 4)));
        let provider: Arc<dyn CameraProvider> = camera.clone();
        let mut screen = streaming_screen(CameraDevice::new(provider));

        screen.retake();
        assert!(wait_until(|| {
            screen.poll();
            screen.is_streaming() || matches!(screen.stage(), Stage::NoPreview { .. })
        }));
        assert!(screen.is_streaming());
        assert_eq!(camera.opened.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ticks_only_while_live_or_analyzing() {
        let (_, provider) = working_camera();
        let mut upload = CaptureScreen::enter(CaptureMode::Upload, provider.clone());
        assert!(!upload.needs_ticks());
        upload.begin_upload();
        let photo = Photo::new(vec![1], 1, 1, crate::state::data::PhotoSource::Upload);
        upload.finish_upload(Some(Ok(photo)));
        assert!(!upload.needs_ticks());
        upload.begin_analysis(Instant::now());
        assert!(upload.needs_ticks());

        let mut camera = streaming_screen(provider);
        assert!(camera.needs_ticks());
        camera.snap(80).unwrap();
        assert!(!camera.needs_ticks());
    }

    #[test]
    fn test_upload_mode_retake_returns_to_chooser() {
        let (_, provider) = working_camera();
        let mut screen = CaptureScreen::enter(CaptureMode::Upload, provider);
        assert!(matches!(screen.stage(), Stage::Chooser { loading: false }));

        assert!(screen.begin_upload());
        let photo = Photo::new(vec![1, 2, 3], 1, 1, crate::state::data::PhotoSource::Upload);
        assert!(screen.finish_upload(Some(Ok(photo.clone()))).is_none());
        assert_eq!(screen.still(), Some(&photo));

        screen.retake();
        assert!(matches!(screen.stage(), Stage::Chooser { loading: false }));
        assert!(screen.still().is_none());
    }

    #[test]
    fn test_cancelled_picker_keeps_chooser() {
        let (_, provider) = working_camera();
        let mut screen = CaptureScreen::enter(CaptureMode::Upload, provider);
        screen.begin_upload();
        assert!(screen.finish_upload(None).is_none());
        assert!(matches!(screen.stage(), Stage::Chooser { loading: false }));
    }

    #[test]
    fn test_bad_upload_reports_error() {
        let (_, provider) = working_camera();
        let mut screen = CaptureScreen::enter(CaptureMode::Upload, provider);
        screen.begin_upload();
        let error = screen.finish_upload(Some(Err(CaptureError::Decode("bad".into()))));
        assert_eq!(error, Some(CaptureError::Decode("bad".into())));
        assert!(screen.still().is_none());
    }

    #[test]
    fn test_denied_camera_leaves_no_preview() {
        let mut screen = CaptureScreen::enter(CaptureMode::Camera, CameraDevice::new(Arc::new(FakeCamera::denied())));

        let mut reported = None;
        assert!(wait_until(|| {
            reported = reported.take().or_else(|| screen.poll());
            reported.is_some()
        }));
        assert!(matches!(reported, Some(CaptureError::Denied(_))));
        assert!(matches!(screen.stage(), Stage::NoPreview { .. }));
        assert!(!screen.is_streaming());
        assert_eq!(screen.snap(80), Err(CaptureError::NoFrame));
        assert!(screen.still().is_none());
        // Reported once only
        assert!(screen.poll().is_none());
    }

    #[test]
    fn test_analysis_round_trip() {
        let (_, provider) = working_camera();
        let mut screen = streaming_screen(provider);
        screen.snap(80).unwrap();

        let photo = screen.begin_analysis(Instant::now()).unwrap();
        assert!(screen.is_analyzing());
        // Retake is ignored while analyzing
        screen.retake();
        assert!(screen.is_analyzing());

        assert_eq!(screen.finish_analysis(), Some(photo));
    }
}

use iced::widget::{container, Space};
use iced::{task, window, Element, Length, Subscription, Task, Theme};
use std::sync::Arc;
use std::time::Instant;

mod capture;
mod config;
mod error;
mod roast;
mod route;
mod share;
mod state;
mod ui;

use capture::camera::{CameraDevice, CameraProvider, NokhwaProvider};
use capture::{upload, CaptureScreen};
use config::AppConfig;
use error::{AnalysisError, CaptureError, ShareError};
use roast::{FakeAnalyzer, ResultProducer};
use route::Route;
use share::raster::Raster;
use share::{caption, NativeSaveDialog, NoShareSheet, SaveDialog, ShareOutcome, ShareSheet};
use state::data::{Photo, RoastResult};
use state::session::Handoff;

const SHARE_FAILED: &str = "Sharing failed, but you can screenshot this result!";
const SHARE_FALLBACK: &str = "Image downloaded and text copied to clipboard!";
const COPIED: &str = "Copied to clipboard!";

/// Which screen is showing
enum Screen {
    Landing,
    Capture(CaptureScreen),
    /// Only entered when the hand-off holds both a photo and a result
    Result,
}

/// Main application state
struct UglyFaceDetector {
    config: AppConfig,
    screen: Screen,
    /// Photo and verdict handed from capture to result
    handoff: Handoff,
    camera: CameraDevice,
    producer: Arc<dyn ResultProducer>,
    share_sheet: Arc<dyn ShareSheet>,
    save_dialog: Arc<dyn SaveDialog>,
    /// Running fake analysis; dropping it aborts the task
    analysis: Option<task::Handle>,
    /// Share pipeline in flight
    sharing: bool,
    /// Blocking message for the user
    notice: Option<String>,
    /// Latest animation tick
    now: Instant,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Go to another screen
    Navigate(Route),
    /// Animation / camera preview frame
    Tick(Instant),
    /// Shutter pressed
    Snap,
    /// Upload tile pressed
    PickFile,
    /// File picker closed (`None` when cancelled)
    PhotoChosen(Option<Result<Photo, CaptureError>>),
    /// Discard the still
    Retake,
    /// "Roast This Face!"
    Analyze,
    AnalysisComplete(Result<RoastResult, AnalysisError>),
    Share,
    /// Window screenshot taken for sharing
    RasterReady(Result<Raster, ShareError>),
    ShareFinished(Result<ShareOutcome, ShareError>),
    CopyText,
    DismissNotice,
}

impl UglyFaceDetector {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();
        NokhwaProvider::initialize();
        let camera = Arc::new(NokhwaProvider::new(config.camera_index));
        let producer = Arc::new(FakeAnalyzer::new(config.analysis_delay_ms));

        let mut app = Self::with_parts(
            config,
            camera,
            producer,
            Arc::new(NoShareSheet),
            Arc::new(NativeSaveDialog),
        );

        // Optional deep link, e.g. `ugly-face-detector /camera?mode=upload`
        if let Some(path) = std::env::args().nth(1) {
            app.navigate(Route::parse(&path));
        }

        tracing::info!("🤡 Ugly Face Detector ready");
        (app, Task::none())
    }

    fn with_parts(
        config: AppConfig,
        camera: Arc<dyn CameraProvider>,
        producer: Arc<dyn ResultProducer>,
        share_sheet: Arc<dyn ShareSheet>,
        save_dialog: Arc<dyn SaveDialog>,
    ) -> Self {
        Self {
            config,
            screen: Screen::Landing,
            handoff: Handoff::new(),
            camera: CameraDevice::new(camera),
            producer,
            share_sheet,
            save_dialog,
            analysis: None,
            sharing: false,
            notice: None,
            now: Instant::now(),
        }
    }

    /// Switch screens
    ///
    /// Leaving a capture screen drops it, which stops any camera stream
    /// and aborts any running analysis. Going back resets the hand-off.
    fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating to {}", route.path());
        self.analysis = None;
        self.screen = Screen::Landing;

        match route {
            Route::Landing => self.handoff.clear(),
            Route::Capture { mode } => {
                self.handoff.clear();
                self.screen = Screen::Capture(CaptureScreen::enter(mode, self.camera.clone()));
            }
            Route::Result => {
                if self.handoff.is_complete() {
                    self.screen = Screen::Result;
                } else {
                    tracing::debug!("No roast to show, redirecting to landing");
                    self.handoff.clear();
                }
            }
        }
    }

    fn capture_screen(&mut self) -> Option<&mut CaptureScreen> {
        match &mut self.screen {
            Screen::Capture(screen) => Some(screen),
            _ => None,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => {
                self.navigate(route);
                Task::none()
            }
            Message::Tick(now) => {
                self.now = now;
                if let Some(error) = self.capture_screen().and_then(CaptureScreen::poll) {
                    self.notice = Some(error.user_message());
                }
                Task::none()
            }
            Message::Snap => {
                let quality = self.config.jpeg_quality;
                if let Some(Err(e)) = self.capture_screen().map(|screen| screen.snap(quality)) {
                    tracing::warn!("⚠️  Snapshot failed: {}", e);
                    self.notice = Some(e.user_message());
                }
                Task::none()
            }
            Message::PickFile => {
                if self.capture_screen().is_some_and(|screen| screen.begin_upload()) {
                    Task::perform(upload::choose_photo(), Message::PhotoChosen)
                } else {
                    Task::none()
                }
            }
            Message::PhotoChosen(outcome) => {
                if let Some(error) = self.capture_screen().and_then(|screen| screen.finish_upload(outcome)) {
                    self.notice = Some(error.user_message());
                }
                Task::none()
            }
            Message::Retake => {
                if let Some(screen) = self.capture_screen() {
                    screen.retake();
                }
                Task::none()
            }
            Message::Analyze => {
                let started = Instant::now();
                let Some(photo) = self.capture_screen().and_then(|screen| screen.begin_analysis(started)) else {
                    return Task::none();
                };
                self.now = started;

                let (task, handle) =
                    Task::perform(self.producer.produce(photo), Message::AnalysisComplete).abortable();
                self.analysis = Some(handle.abort_on_drop());
                task
            }
            Message::AnalysisComplete(outcome) => {
                self.analysis = None;
                // Stale if the user already left the capture screen
                let Some(photo) = self.capture_screen().and_then(CaptureScreen::finish_analysis) else {
                    return Task::none();
                };

                match outcome {
                    Ok(result) => {
                        tracing::info!(
                            "🔥 {}% roast created at {}",
                            result.score(),
                            result.created_at().format("%H:%M:%S")
                        );
                        self.handoff.store(photo, result);
                        self.navigate(Route::Result);
                    }
                    Err(e) => {
                        tracing::error!("❌ Analysis failed: {}", e);
                        self.notice = Some("The roast machine jammed. Try again!".to_string());
                    }
                }
                Task::none()
            }
            Message::Share => {
                if self.sharing || !matches!(self.screen, Screen::Result) {
                    return Task::none();
                }
                self.sharing = true;

                // Find the card, then screenshot the window and cut the card out
                container::visible_bounds(ui::result::card_id()).then(|bounds| {
                    let Some(bounds) = bounds else {
                        return Task::done(Message::RasterReady(Err(ShareError::Screenshot(
                            "result card is not on screen".to_string(),
                        ))));
                    };
                    window::get_latest().then(move |id| match id {
                        Some(id) => window::screenshot(id)
                            .map(move |shot| Message::RasterReady(Raster::from_screenshot(&shot, bounds))),
                        None => Task::done(Message::RasterReady(Err(ShareError::Screenshot(
                            "no window to capture".to_string(),
                        )))),
                    })
                })
            }
            Message::RasterReady(Ok(raster)) => {
                let Some((_, result)) = self.handoff.get() else {
                    self.sharing = false;
                    return Task::none();
                };
                let text = caption::share_caption(result, self.config.share_link.as_deref());
                Task::perform(
                    share::deliver(
                        Arc::clone(&self.share_sheet),
                        Arc::clone(&self.save_dialog),
                        raster,
                        text,
                    ),
                    Message::ShareFinished,
                )
            }
            Message::RasterReady(Err(e)) => self.update(Message::ShareFinished(Err(e))),
            Message::ShareFinished(outcome) => {
                self.sharing = false;
                match outcome {
                    Ok(ShareOutcome::Shared) => {
                        tracing::info!("📤 Roast shared");
                        Task::none()
                    }
                    Ok(ShareOutcome::Saved { caption, .. }) => {
                        self.notice = Some(SHARE_FALLBACK.to_string());
                        iced::clipboard::write(caption)
                    }
                    Err(e) => {
                        tracing::warn!("⚠️  Sharing failed: {}", e);
                        self.notice = Some(SHARE_FAILED.to_string());
                        Task::none()
                    }
                }
            }
            Message::CopyText => {
                let Some((_, result)) = self.handoff.get() else {
                    return Task::none();
                };
                let text = caption::copy_caption(result, self.config.share_link.as_deref());
                self.notice = Some(COPIED.to_string());
                iced::clipboard::write(text)
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content = match &self.screen {
            Screen::Landing => ui::landing::view(),
            Screen::Capture(screen) => ui::capture::view(screen, self.now),
            Screen::Result => match self.handoff.get() {
                Some((photo, result)) => ui::result::view(photo, result, self.sharing),
                None => Space::new(Length::Fill, Length::Fill).into(),
            },
        };

        ui::with_notice(content, self.notice.as_deref())
    }

    /// Frame ticks drive the camera preview and the analyzing animation
    fn subscription(&self) -> Subscription<Message> {
        match &self.screen {
            Screen::Capture(screen) if screen.needs_ticks() => {
                iced::time::every(self.config.frame_interval()).map(Message::Tick)
            }
            _ => Subscription::none(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        ui::theme()
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ugly_face_detector=info")),
        )
        .init();

    iced::application(
        "Ugly Face Detector",
        UglyFaceDetector::update,
        UglyFaceDetector::view,
    )
    .subscription(UglyFaceDetector::subscription)
    .theme(UglyFaceDetector::theme)
    .window_size((480.0, 900.0))
    .centered()
    .run_with(UglyFaceDetector::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture::camera::tests::{wait_until, FakeCamera};
    use capture::{CaptureMode, Stage};
    use chrono::Utc;
    use image::RgbImage;
    use state::data::{FilterTag, PhotoSource};

    /// Producer that is never actually polled in these tests
    struct InstantAnalyzer;

    impl ResultProducer for InstantAnalyzer {
        fn produce(&self, _photo: Photo) -> roast::producer::Analysis {
            Box::pin(async { Ok(sample_result()) })
        }
    }

    fn sample_result() -> RoastResult {
        RoastResult::new(77, "roasted", vec![FilterTag::Unibrow, FilterTag::GiantForehead], Utc::now())
    }

    fn app_with_camera(camera: FakeCamera) -> UglyFaceDetector {
        UglyFaceDetector::with_parts(
            AppConfig::default(),
            Arc::new(camera),
            Arc::new(InstantAnalyzer),
            Arc::new(NoShareSheet),
            Arc::new(NativeSaveDialog),
        )
    }

    fn app() -> UglyFaceDetector {
        app_with_camera(FakeCamera::working(RgbImage::new(8, 8)))
    }

    fn uploaded_photo() -> Photo {
        upload::decode_photo(upload::tests::png_bytes(10, 6)).unwrap()
    }

    /// Drive an upload cycle up to the result screen
    fn complete_upload_cycle(app: &mut UglyFaceDetector, photo: Photo) {
        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Upload }));
        let _ = app.update(Message::PickFile);
        let _ = app.update(Message::PhotoChosen(Some(Ok(photo))));
        let _ = app.update(Message::Analyze);
        let _ = app.update(Message::AnalysisComplete(Ok(sample_result())));
    }

    #[test]
    fn test_result_without_roast_redirects_to_landing() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::Result));
        assert!(matches!(app.screen, Screen::Landing));
        assert!(!app.handoff.is_complete());
    }

    #[test]
    fn test_upload_scenario_shows_same_bytes() {
        let mut app = app();
        let photo = uploaded_photo();
        let original = photo.bytes().to_vec();

        complete_upload_cycle(&mut app, photo);

        assert!(matches!(app.screen, Screen::Result));
        let (shown, result) = app.handoff.get().unwrap();
        assert_eq!(shown.bytes(), original.as_slice());
        assert_eq!(shown.source, PhotoSource::Upload);
        assert_eq!(result.score(), 77);
        assert!(app.analysis.is_none());
    }

    #[test]
    fn test_analyze_starts_abortable_task() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Upload }));
        let _ = app.update(Message::PickFile);
        let _ = app.update(Message::PhotoChosen(Some(Ok(uploaded_photo()))));
        let _ = app.update(Message::Analyze);

        assert!(app.analysis.is_some());
        assert!(matches!(&app.screen, Screen::Capture(screen) if screen.is_analyzing()));

        let _ = app.update(Message::Navigate(Route::Landing));
        assert!(app.analysis.is_none());
    }

    #[test]
    fn test_late_analysis_after_leaving_is_ignored() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Upload }));
        let _ = app.update(Message::PickFile);
        let _ = app.update(Message::PhotoChosen(Some(Ok(uploaded_photo()))));
        let _ = app.update(Message::Analyze);
        let _ = app.update(Message::Navigate(Route::Landing));

        let _ = app.update(Message::AnalysisComplete(Ok(sample_result())));
        assert!(matches!(app.screen, Screen::Landing));
        assert!(!app.handoff.is_complete());
    }

    #[test]
    fn test_failed_analysis_returns_to_still() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Upload }));
        let _ = app.update(Message::PickFile);
        let _ = app.update(Message::PhotoChosen(Some(Ok(uploaded_photo()))));
        let _ = app.update(Message::Analyze);
        let _ = app.update(Message::AnalysisComplete(Err(AnalysisError::Backend("down".into()))));

        assert!(matches!(&app.screen, Screen::Capture(screen) if screen.still().is_some()));
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_back_home_resets_state() {
        let mut app = app();
        complete_upload_cycle(&mut app, uploaded_photo());
        assert!(app.handoff.is_complete());

        let _ = app.update(Message::Navigate(Route::Landing));
        assert!(!app.handoff.is_complete());

        let _ = app.update(Message::Navigate(Route::Result));
        assert!(matches!(app.screen, Screen::Landing));
    }

    #[test]
    fn test_try_again_starts_fresh_camera_cycle() {
        let mut app = app();
        complete_upload_cycle(&mut app, uploaded_photo());

        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Camera }));
        assert!(!app.handoff.is_complete());
        match &app.screen {
            Screen::Capture(screen) => {
                assert_eq!(screen.mode(), CaptureMode::Camera);
                assert!(screen.still().is_none());
            }
            _ => panic!("expected capture screen"),
        }
    }

    #[test]
    fn test_denied_camera_shows_notice_and_no_photo() {
        let mut app = app_with_camera(FakeCamera::denied());
        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Camera }));

        assert!(wait_until(|| {
            let _ = app.update(Message::Tick(Instant::now()));
            app.notice.is_some()
        }));
        assert_eq!(app.notice.as_deref(), Some("Camera access is required to take photos!"));

        let _ = app.update(Message::DismissNotice);
        let _ = app.update(Message::Snap);
        match &app.screen {
            Screen::Capture(screen) => {
                assert!(matches!(screen.stage(), Stage::NoPreview { .. }));
                assert!(screen.still().is_none());
            }
            _ => panic!("expected capture screen"),
        }
    }

    #[test]
    fn test_camera_snap_to_still() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::Capture { mode: CaptureMode::Camera }));
        assert!(wait_until(|| {
            let _ = app.update(Message::Tick(Instant::now()));
            matches!(&app.screen, Screen::Capture(screen) if screen.is_streaming())
        }));

        let _ = app.update(Message::Snap);
        match &app.screen {
            Screen::Capture(screen) => {
                let still = screen.still().expect("snapshot should produce a still");
                assert_eq!(still.source, PhotoSource::Camera);
            }
            _ => panic!("expected capture screen"),
        }
    }

    #[test]
    fn test_copy_text_notifies() {
        let mut app = app();
        complete_upload_cycle(&mut app, uploaded_photo());

        let _ = app.update(Message::CopyText);
        assert_eq!(app.notice.as_deref(), Some(COPIED));
    }

    #[test]
    fn test_share_failure_is_reported() {
        let mut app = app();
        complete_upload_cycle(&mut app, uploaded_photo());

        let _ = app.update(Message::Share);
        assert!(app.sharing);
        // A second press while sharing is ignored
        let _ = app.update(Message::Share);
        assert!(app.sharing);

        let _ = app.update(Message::RasterReady(Err(ShareError::Screenshot("boom".into()))));
        assert!(!app.sharing);
        assert_eq!(app.notice.as_deref(), Some(SHARE_FAILED));
        assert!(matches!(app.screen, Screen::Result));
    }

    #[test]
    fn test_share_fallback_notice() {
        let mut app = app();
        complete_upload_cycle(&mut app, uploaded_photo());
        app.sharing = true;

        let _ = app.update(Message::ShareFinished(Ok(ShareOutcome::Saved {
            path: "/tmp/ugly-face-roast.png".into(),
            caption: "I got 77%".into(),
        })));
        assert!(!app.sharing);
        assert_eq!(app.notice.as_deref(), Some(SHARE_FALLBACK));
    }
}

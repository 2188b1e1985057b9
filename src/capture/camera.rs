/// Live camera access
///
/// The device is owned by a dedicated worker thread because camera
/// handles are not `Send` on every backend. The UI only sees a
/// `CameraSession`: a stop flag, the stream status and the latest frame.
///
/// Release rule: the worker closes the device as soon as it observes the
/// stop flag, which is raised by `stop()`, by a snapshot, and on drop.
use image::RgbImage;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Once};
use std::thread;

use crate::error::CaptureError;

/// Something that can hand out a camera stream
pub trait CameraProvider: Send + Sync {
    /// Acquire the device. Called on the worker thread; may block on a
    /// permission prompt.
    fn open(&self) -> Result<Box<dyn CameraStream>, CaptureError>;
}

/// An open camera
pub trait CameraStream {
    /// Block until the next frame is available
    fn next_frame(&mut self) -> Result<RgbImage, CaptureError>;

    /// Release the device
    fn close(&mut self);
}

/// Lifecycle of a session as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    /// Waiting for the device (and possibly the user's permission)
    Starting,
    /// Frames are arriving
    Streaming,
    /// The device could not be opened or the stream broke
    Failed(CaptureError),
    /// Stopped on request; the device has been released
    Stopped,
}

#[derive(Default)]
struct Shared {
    stop: AtomicBool,
    status: Mutex<Option<StreamStatus>>,
    latest: Mutex<Option<RgbImage>>,
    /// Bumped on every new frame so the UI can skip unchanged ones
    generation: AtomicU64,
}

impl Shared {
    fn set_status(&self, status: StreamStatus) {
        *lock(&self.status) = Some(status);
    }
}

/// A camera provider plus the lock that keeps sessions from overlapping
///
/// A worker holds `in_use` from before `open()` until after `close()`, so
/// a new session only touches the device once the previous one let go.
#[derive(Clone)]
pub struct CameraDevice {
    provider: Arc<dyn CameraProvider>,
    in_use: Arc<Mutex<()>>,
}

impl CameraDevice {
    pub fn new(provider: Arc<dyn CameraProvider>) -> Self {
        Self {
            provider,
            in_use: Arc::new(Mutex::new(())),
        }
    }
}

/// A running camera worker
pub struct CameraSession {
    shared: Arc<Shared>,
}

impl CameraSession {
    /// Spawn the worker and start acquiring the device in the background
    pub fn start(device: &CameraDevice) -> Self {
        let shared = Arc::new(Shared::default());
        shared.set_status(StreamStatus::Starting);

        let worker_shared = Arc::clone(&shared);
        let worker_device = device.clone();
        let spawned = thread::Builder::new()
            .name("camera".into())
            .spawn(move || run_worker(worker_device, worker_shared));

        if let Err(e) = spawned {
            tracing::error!("❌ Could not spawn camera worker: {}", e);
            shared.set_status(StreamStatus::Failed(CaptureError::Stream(e.to_string())));
        }

        Self { shared }
    }

    pub fn status(&self) -> StreamStatus {
        lock(&self.shared.status)
            .clone()
            .unwrap_or(StreamStatus::Starting)
    }

    pub fn is_streaming(&self) -> bool {
        self.status() == StreamStatus::Streaming
    }

    /// Frame counter, changes whenever a new frame is published
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    /// Copy of the most recent frame, unmirrored
    pub fn latest_frame(&self) -> Option<RgbImage> {
        lock(&self.shared.latest).clone()
    }

    /// Grab the current frame and stop the stream
    pub fn snapshot(&self) -> Result<RgbImage, CaptureError> {
        if !self.is_streaming() {
            return Err(CaptureError::NoFrame);
        }
        let frame = lock(&self.shared.latest).take().ok_or(CaptureError::NoFrame)?;
        self.stop();
        Ok(frame)
    }

    /// Ask the worker to release the camera
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::Release);
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(device: CameraDevice, shared: Arc<Shared>) {
    // Wait for any previous session to close the device
    let _in_use = lock(&device.in_use);

    // Stopped while waiting for the previous session
    if shared.stop.load(Ordering::Acquire) {
        shared.set_status(StreamStatus::Stopped);
        return;
    }

    let mut stream = match device.provider.open() {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("🚫 Camera unavailable: {}", e);
            shared.set_status(StreamStatus::Failed(e));
            return;
        }
    };

    // Stopped while the permission prompt was up
    if shared.stop.load(Ordering::Acquire) {
        stream.close();
        shared.set_status(StreamStatus::Stopped);
        return;
    }

    tracing::info!("📷 Camera stream started");
    shared.set_status(StreamStatus::Streaming);

    let mut frames = 0u64;
    while !shared.stop.load(Ordering::Acquire) {
        match stream.next_frame() {
            Ok(frame) => {
                *lock(&shared.latest) = Some(frame);
                shared.generation.fetch_add(1, Ordering::Release);
                frames += 1;
            }
            Err(e) => {
                tracing::error!("❌ Camera stream failed after {} frames: {}", frames, e);
                stream.close();
                shared.set_status(StreamStatus::Failed(e));
                return;
            }
        }
    }

    stream.close();
    shared.set_status(StreamStatus::Stopped);
    tracing::info!("📷 Camera released after {} frames", frames);
}

/// Lock a mutex, recovering the data if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The real webcam, via nokhwa
#[derive(Debug, Clone, Copy)]
pub struct NokhwaProvider {
    index: u32,
}

static NOKHWA_INIT: Once = Once::new();

impl NokhwaProvider {
    pub fn new(index: u32) -> Self {
        Self { index }
    }

    /// One-time backend setup before the first open
    ///
    /// AVFoundation only hands out cameras after `nokhwa_initialize` has
    /// asked for authorization; other backends need nothing.
    pub fn initialize() -> bool {
        run_once(&NOKHWA_INIT, || {
            #[cfg(target_os = "macos")]
            nokhwa::nokhwa_initialize(|granted| {
                tracing::info!("📷 Camera authorization granted: {}", granted);
            });
        })
    }
}

/// Run `setup` the first time only; true when this call ran it
fn run_once(once: &Once, setup: impl FnOnce()) -> bool {
    let mut ran = false;
    once.call_once(|| {
        setup();
        ran = true;
    });
    ran
}

impl CameraProvider for NokhwaProvider {
    fn open(&self) -> Result<Box<dyn CameraStream>, CaptureError> {
        use nokhwa::pixel_format::RgbFormat;
        use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = nokhwa::Camera::new(CameraIndex::Index(self.index), format)
            .map_err(|e| classify_open_error(e.to_string(), CaptureError::NoDevice))?;

        camera
            .open_stream()
            .map_err(|e| classify_open_error(e.to_string(), CaptureError::Stream))?;

        tracing::debug!("Opened camera {} ({})", self.index, camera.info().human_name());
        Ok(Box::new(NokhwaStream { camera }))
    }
}

/// Backends report permission problems only through their messages
fn classify_open_error(message: String, otherwise: fn(String) -> CaptureError) -> CaptureError {
    let lowered = message.to_lowercase();
    if lowered.contains("permission") || lowered.contains("denied") || lowered.contains("not authorized") {
        CaptureError::Denied(message)
    } else {
        otherwise(message)
    }
}

struct NokhwaStream {
    camera: nokhwa::Camera,
}

impl CameraStream for NokhwaStream {
    fn next_frame(&mut self) -> Result<RgbImage, CaptureError> {
        use nokhwa::pixel_format::RgbFormat;

        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        // nokhwa links its own `image` version, so move the raw pixels across
        let (width, height) = (decoded.width(), decoded.height());
        RgbImage::from_raw(width, height, decoded.into_raw()).ok_or(CaptureError::NoFrame)
    }

    fn close(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!("⚠️  Failed to stop camera stream cleanly: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::Rgb;
    use std::time::{Duration, Instant};

    /// Camera double: either refuses or serves a fixed frame
    pub(crate) struct FakeCamera {
        pub deny: bool,
        pub frame: RgbImage,
        pub frame_time: Duration,
        pub opened: Arc<AtomicU64>,
        pub closed: Arc<AtomicBool>,
        /// Set while a stream is open; a second open fails like a busy device
        pub busy: Arc<AtomicBool>,
    }

    impl FakeCamera {
        pub(crate) fn working(frame: RgbImage) -> Self {
            Self {
                deny: false,
                frame,
                frame_time: Duration::from_millis(1),
                opened: Arc::new(AtomicU64::new(0)),
                closed: Arc::new(AtomicBool::new(false)),
                busy: Arc::new(AtomicBool::new(false)),
            }
        }

        pub(crate) fn denied() -> Self {
            Self {
                deny: true,
                ..Self::working(RgbImage::new(1, 1))
            }
        }

        /// Slow frames, so a stopped worker lingers inside `next_frame`
        pub(crate) fn slow(frame: RgbImage) -> Self {
            Self {
                frame_time: Duration::from_millis(40),
                ..Self::working(frame)
            }
        }
    }

    struct FakeStream {
        frame: RgbImage,
        frame_time: Duration,
        closed: Arc<AtomicBool>,
        busy: Arc<AtomicBool>,
    }

    impl CameraProvider for FakeCamera {
        fn open(&self) -> Result<Box<dyn CameraStream>, CaptureError> {
            if self.deny {
                return Err(CaptureError::Denied("user said no".into()));
            }
            if self.busy.swap(true, Ordering::SeqCst) {
                return Err(CaptureError::Stream("Device or resource busy".into()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            self.closed.store(false, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                frame: self.frame.clone(),
                frame_time: self.frame_time,
                closed: Arc::clone(&self.closed),
                busy: Arc::clone(&self.busy),
            }))
        }
    }

    impl CameraStream for FakeStream {
        fn next_frame(&mut self) -> Result<RgbImage, CaptureError> {
            thread::sleep(self.frame_time);
            Ok(self.frame.clone())
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
            self.busy.store(false, Ordering::SeqCst);
        }
    }

    fn device(camera: FakeCamera) -> CameraDevice {
        CameraDevice::new(Arc::new(camera))
    }

    pub(crate) fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn test_session_streams_frames() {
        let frame = RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]));
        let session = CameraSession::start(&device(FakeCamera::working(frame.clone())));

        assert!(wait_until(|| session.generation() > 0));
        assert!(session.is_streaming());
        assert_eq!(session.latest_frame(), Some(frame));
    }

    #[test]
    fn test_snapshot_releases_camera() {
        let camera = FakeCamera::working(RgbImage::new(2, 2));
        let closed = Arc::clone(&camera.closed);
        let session = CameraSession::start(&device(camera));

        assert!(wait_until(|| session.generation() > 0));
        assert!(session.snapshot().is_ok());
        assert!(wait_until(|| closed.load(Ordering::SeqCst)));
        assert!(wait_until(|| session.status() == StreamStatus::Stopped));
    }

    #[test]
    fn test_drop_releases_camera() {
        let camera = FakeCamera::working(RgbImage::new(2, 2));
        let closed = Arc::clone(&camera.closed);
        let session = CameraSession::start(&device(camera));

        assert!(wait_until(|| session.is_streaming()));
        drop(session);
        assert!(wait_until(|| closed.load(Ordering::SeqCst)));
    }

    #[test]
    fn test_denied_camera_never_streams() {
        let session = CameraSession::start(&device(FakeCamera::denied()));

        assert!(wait_until(|| matches!(session.status(), StreamStatus::Failed(_))));
        assert_eq!(
            session.status(),
            StreamStatus::Failed(CaptureError::Denied("user said no".into()))
        );
        assert!(session.latest_frame().is_none());
        assert_eq!(session.snapshot(), Err(CaptureError::NoFrame));
    }

    #[test]
    fn test_new_session_waits_for_previous_to_close() {
        let camera = FakeCamera::slow(RgbImage::new(2, 2));
        let opened = Arc::clone(&camera.opened);
        let device = device(camera);

        let first = CameraSession::start(&device);
        assert!(wait_until(|| first.generation() > 0));
        drop(first);

        let second = CameraSession::start(&device);
        assert!(wait_until(|| matches!(
            second.status(),
            StreamStatus::Streaming | StreamStatus::Failed(_)
        )));
        assert_eq!(second.status(), StreamStatus::Streaming);
        assert_eq!(opened.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_session_stopped_while_waiting_never_opens() {
        let camera = FakeCamera::slow(RgbImage::new(2, 2));
        let opened = Arc::clone(&camera.opened);
        let device = device(camera);

        let first = CameraSession::start(&device);
        assert!(wait_until(|| first.is_streaming()));

        let second = CameraSession::start(&device);
        second.stop();
        drop(first);

        assert!(wait_until(|| second.status() == StreamStatus::Stopped));
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backend_setup_runs_once() {
        let once = Once::new();
        let calls = AtomicU64::new(0);

        assert!(run_once(&once, || {
            calls.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(!run_once(&once, || {
            calls.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_permission_messages_are_classified() {
        assert!(matches!(
            classify_open_error("Permission denied (os error 13)".into(), CaptureError::NoDevice),
            CaptureError::Denied(_)
        ));
        assert!(matches!(
            classify_open_error("No such device".into(), CaptureError::NoDevice),
            CaptureError::NoDevice(_)
        ));
    }
}

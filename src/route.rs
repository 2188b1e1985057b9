/// Addressable screens
///
/// Paths mirror the links the app uses internally: `/`, `/camera?mode=...`
/// and `/result`. The binary also accepts one as its first argument.
use crate::capture::CaptureMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Capture { mode: CaptureMode },
    Result,
}

impl Route {
    /// Parse a path with an optional query string
    ///
    /// Unknown paths go to the landing screen; a missing or unknown `mode`
    /// selects the camera.
    pub fn parse(input: &str) -> Self {
        let input = input.trim().trim_start_matches('#');
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };

        match path.trim_end_matches('/') {
            "/camera" | "camera" => {
                let mode = query
                    .into_iter()
                    .flat_map(|q| q.split('&'))
                    .filter_map(|pair| pair.split_once('='))
                    .find(|(key, _)| *key == "mode")
                    .map(|(_, value)| value);
                Route::Capture {
                    mode: CaptureMode::from_param(mode),
                }
            }
            "/result" | "result" => Route::Result,
            _ => Route::Landing,
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Capture { mode } => format!("/camera?mode={}", mode.as_param()),
            Route::Result => "/result".to_string(),
        }
    }
}

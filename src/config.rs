/// Application configuration
///
/// Settings live in a small JSON file next to the other per-user config:
/// - Linux: ~/.config/ugly-face-detector/config.json
/// - macOS: ~/Library/Application Support/ugly-face-detector/config.json
/// - Windows: %APPDATA%\ugly-face-detector\config.json
///
/// Every field is optional; missing fields fall back to defaults.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Inclusive bounds for the fake "analysis" wait, in milliseconds
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

/// Bounds any configured delay is clamped into
pub const DELAY_FLOOR_MS: u64 = 2000;
pub const DELAY_CEILING_MS: u64 = 4000;

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: DELAY_FLOOR_MS,
            max: DELAY_CEILING_MS,
        }
    }
}

impl DelayRange {
    /// Draw a uniformly random wait from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.min..=self.max))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Which camera to open in selfie mode
    pub camera_index: u32,
    /// Fake processing latency before a result appears
    pub analysis_delay_ms: DelayRange,
    /// JPEG quality (1-100) for camera snapshots
    pub jpeg_quality: u8,
    /// Live preview refresh rate
    pub preview_fps: u32,
    /// Link appended to share captions, if any
    pub share_link: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            analysis_delay_ms: DelayRange::default(),
            jpeg_quality: 80,
            preview_fps: 30,
            share_link: None,
        }
    }
}

impl AppConfig {
    /// Load the config from the standard location
    ///
    /// A missing file is normal and yields defaults. A broken file is
    /// reported and also yields defaults, the app never refuses to start.
    pub fn load() -> Self {
        let path = Self::get_config_path();

        match Self::load_from(&path) {
            Ok(Some(config)) => {
                tracing::info!("⚙️  Loaded config from {}", path.display());
                config
            }
            Ok(None) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("⚠️  Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and parse a config file, `Ok(None)` if it does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(Some(Self::from_json(&json)?))
    }

    /// Parse a config from JSON and clamp out-of-range values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Get the path where the config file is expected
    fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("ugly-face-detector");
        path.push("config.json");
        path
    }

    fn normalized(mut self) -> Self {
        let delay = &mut self.analysis_delay_ms;
        if delay.min > delay.max {
            std::mem::swap(&mut delay.min, &mut delay.max);
        }
        // The wait may be narrowed but never leaves 2-4 s
        delay.min = delay.min.clamp(DELAY_FLOOR_MS, DELAY_CEILING_MS);
        delay.max = delay.max.clamp(DELAY_FLOOR_MS, DELAY_CEILING_MS);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.preview_fps = self.preview_fps.clamp(1, 60);
        self
    }

    /// Interval between preview refreshes and animation frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.preview_fps))
    }
}

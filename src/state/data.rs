/// Shared data structures for the application state
///
/// These structs represent the data model that flows from
/// the capture screen to the result screen.
use chrono::{DateTime, Utc};
use iced::widget::image::Handle;
use std::fmt;
use std::sync::Arc;

/// Where a photo came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource {
    Camera,
    Upload,
}

/// An encoded photo held in memory for one roast cycle
#[derive(Clone)]
pub struct Photo {
    /// Encoded image bytes (JPEG from the camera, original file bytes from uploads)
    bytes: Arc<Vec<u8>>,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
    pub source: PhotoSource,
    /// Cached widget handle so iced decodes the bytes only once
    handle: Handle,
}

impl Photo {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, source: PhotoSource) -> Self {
        let bytes = Arc::new(bytes);
        let handle = Handle::from_bytes(bytes.as_ref().clone());
        Self {
            bytes,
            width,
            height,
            source,
            handle,
        }
    }

    /// The encoded image payload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Handle for the image widget
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.width == other.width
            && self.height == other.height
            && self.bytes == other.bytes
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("source", &self.source)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Decorative overlay drawn on top of the photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterTag {
    Unibrow,
    GiantForehead,
    CrookedTeeth,
    Pimples,
    Wasted,
}

impl FilterTag {
    /// Every tag, in the fixed order results pick their prefix from
    pub const ALL: [FilterTag; 5] = [
        FilterTag::Unibrow,
        FilterTag::GiantForehead,
        FilterTag::CrookedTeeth,
        FilterTag::Pimples,
        FilterTag::Wasted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterTag::Unibrow => "unibrow",
            FilterTag::GiantForehead => "giant-forehead",
            FilterTag::CrookedTeeth => "crooked-teeth",
            FilterTag::Pimples => "pimples",
            FilterTag::Wasted => "wasted",
        }
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cosmetic stat shown under the roast text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub emoji: &'static str,
    pub label: &'static str,
    /// Percentage derived from the score
    pub value: u32,
}

/// A finished roast. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct RoastResult {
    score: u8,
    roast_text: &'static str,
    filters: Vec<FilterTag>,
    created_at: DateTime<Utc>,
}

impl RoastResult {
    pub fn new(
        score: u8,
        roast_text: &'static str,
        filters: Vec<FilterTag>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            score,
            roast_text,
            filters,
            created_at,
        }
    }

    /// Ugliness score, 70-99 for generated results
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn roast_text(&self) -> &'static str {
        self.roast_text
    }

    pub fn filters(&self) -> &[FilterTag] {
        &self.filters
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Goblin Level, Scare Factor and Nausea Risk
    pub fn stats(&self) -> [Stat; 3] {
        let derived = |factor: f64| (f64::from(self.score) * factor).floor() as u32;
        [
            Stat { emoji: "👹", label: "Goblin Level", value: derived(0.8) },
            Stat { emoji: "😱", label: "Scare Factor", value: derived(0.9) },
            Stat { emoji: "🤮", label: "Nausea Risk", value: derived(0.7) },
        ]
    }
}

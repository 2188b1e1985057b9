/// Hand-off state between the capture and result screens
///
/// Owned by the top-level application. The capture screen writes both
/// values once per cycle; the result screen only reads them.
use super::data::{Photo, RoastResult};

#[derive(Debug, Default)]
pub struct Handoff {
    photo: Option<Photo>,
    result: Option<RoastResult>,
}

impl Handoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a finished cycle
    pub fn store(&mut self, photo: Photo, result: RoastResult) {
        self.photo = Some(photo);
        self.result = Some(result);
    }

    /// Forget everything from the previous cycle
    pub fn clear(&mut self) {
        self.photo = None;
        self.result = None;
    }

    /// Both pieces, only when the result screen may render
    pub fn get(&self) -> Option<(&Photo, &RoastResult)> {
        match (&self.photo, &self.result) {
            (Some(photo), Some(result)) => Some((photo, result)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.get().is_some()
    }
}

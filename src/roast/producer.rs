/// Result generation
///
/// There is no real analysis here. A verdict is three independent uniform
/// draws (score, roast line, filter count) made after a randomized pause
/// that only exists to make the spinner believable.
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::future::Future;
use std::pin::Pin;

use super::catalog::{MAX_FILTERS, ROASTS, SCORE_RANGE};
use crate::config::DelayRange;
use crate::error::AnalysisError;
use crate::state::data::{FilterTag, Photo, RoastResult};

/// Future returned by a producer
pub type Analysis = Pin<Box<dyn Future<Output = Result<RoastResult, AnalysisError>> + Send>>;

/// Anything that can turn a photo into a verdict
pub trait ResultProducer: Send + Sync {
    fn produce(&self, photo: Photo) -> Analysis;
}

/// Build a random verdict
///
/// Filters are the first K tags of `FilterTag::ALL` with K in 1..=3, not a
/// free subset. Unibrow therefore appears on every result.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> RoastResult {
    let score = rng.gen_range(SCORE_RANGE);
    let roast_text = ROASTS.choose(rng).copied().unwrap_or(ROASTS[0]);
    let count = rng.gen_range(1..=MAX_FILTERS);
    let filters = FilterTag::ALL[..count].to_vec();

    RoastResult::new(score, roast_text, filters, now)
}

/// The stand-in "AI": waits a bit, then rolls dice
#[derive(Debug, Clone, Copy)]
pub struct FakeAnalyzer {
    delay: DelayRange,
}

impl FakeAnalyzer {
    pub fn new(delay: DelayRange) -> Self {
        Self { delay }
    }
}

impl ResultProducer for FakeAnalyzer {
    fn produce(&self, photo: Photo) -> Analysis {
        let delay = self.delay;

        Box::pin(async move {
            let wait = delay.sample(&mut rand::thread_rng());
            tracing::info!(
                "🤖 Analyzing {}x{} {:?} photo ({} KB) for {} ms...",
                photo.width,
                photo.height,
                photo.source,
                photo.bytes().len() / 1024,
                wait.as_millis()
            );

            tokio::time::sleep(wait).await;

            let result = generate(&mut rand::thread_rng(), Utc::now());
            tracing::info!(
                "🔥 Roast ready: {}% with filters {:?}",
                result.score(),
                result.filters()
            );
            Ok(result)
        })
    }
}

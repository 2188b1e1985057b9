/// Roast generation module
///
/// This module handles:
/// - The fixed roast lines and overlay tags (catalog.rs)
/// - Random result generation and the fake analysis delay (producer.rs)
///
/// `ResultProducer` is the only seam between the capture flow and
/// whatever produces a verdict. Swapping in a real backend means
/// implementing that trait; no rendering code changes.
pub mod catalog;
pub mod producer;

pub use producer::{FakeAnalyzer, ResultProducer};

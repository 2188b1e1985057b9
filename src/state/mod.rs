/// State management module
///
/// This module holds the application data model:
/// - Shared data structures (data.rs)
/// - The photo/result hand-off between screens (session.rs)

pub mod data;
pub mod session;

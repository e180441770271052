//! State module for tracking crawl progress
//!
//! This module holds the per-run coordination state shared by every fetch task.
//!
//! # Components
//!
//! - `FrontierTracker`: Highest known listing page, hands out newly unlocked pages
//! - `CompletionTracker`: Counts outstanding work units and detects the end of the crawl
//! - `RecordStore`: Deduplicated records keyed by canonical link

mod completion;
mod frontier;
mod store;

// Re-export main types
pub use completion::CompletionTracker;
pub use frontier::FrontierTracker;
pub use store::RecordStore;

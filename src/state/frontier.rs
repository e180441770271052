//! Listing frontier tracking
//!
//! The frontier is the set of listing-page indices known to exist. It is
//! always exactly `1..=max_page`, so only the maximum has to be stored.

use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

/// Tracks the highest known listing page and hands out newly unlocked pages
///
/// Concurrent listing responses may report different maxima; `observe_max_page`
/// serializes them so overlapping ranges are never handed out twice.
#[derive(Debug)]
pub struct FrontierTracker {
    max_page: Mutex<u32>,
    seed_page: u32,
}

impl FrontierTracker {
    /// Creates a tracker whose frontier starts as `1..=seed_page`
    pub fn new(seed_page: u32) -> Self {
        Self {
            max_page: Mutex::new(seed_page),
            seed_page,
        }
    }

    /// Pages that are scheduled before any listing page has been seen
    pub fn seed_pages(&self) -> RangeInclusive<u32> {
        1..=self.seed_page
    }

    /// Records a candidate maximum page index
    ///
    /// If `candidate` exceeds the current maximum, the maximum is raised and
    /// every index in `(old_max, candidate]` is returned exactly once.
    /// Otherwise the returned vector is empty.
    pub fn observe_max_page(&self, candidate: u32) -> Vec<u32> {
        let mut max_page = self.max_page.lock().unwrap_or_else(PoisonError::into_inner);

        if candidate <= *max_page {
            return Vec::new();
        }

        let unlocked: Vec<u32> = (*max_page + 1..=candidate).collect();
        *max_page = candidate;
        unlocked
    }

    /// Returns the highest listing page index known so far
    pub fn max_page(&self) -> u32 {
        *self.max_page.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

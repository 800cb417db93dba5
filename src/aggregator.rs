//! Thread-safe accumulation of fetched lines into per-family buckets.
//!
//! Fetches run in parallel and each hands its whole batch to
//! [`Aggregator::contribute`]. The lock covers the append only, so the
//! network I/O is never serialized. Lines from one source stay in
//! response order; the order *between* sources is whatever order the
//! fetches finished in and is not stable across runs.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Family;
use crate::fetcher::LineBatch;

/// Accumulated ranges, one insertion-ordered bucket per family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowBuckets {
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl AllowBuckets {
    fn bucket_mut(&mut self, family: Family) -> &mut Vec<String> {
        match family {
            Family::Ipv4 => &mut self.ipv4,
            Family::Ipv6 => &mut self.ipv6,
        }
    }

    /// Total number of ranges across both families
    pub fn total(&self) -> usize {
        self.ipv4.len() + self.ipv6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Shared merge point for concurrent fetches
#[derive(Debug, Default)]
pub struct Aggregator {
    buckets: Mutex<AllowBuckets>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a whole batch to the bucket for `family`.
    ///
    /// Either every line of the batch is appended or, for an empty batch,
    /// nothing is. Safe to call from any number of tasks at once.
    pub fn contribute(&self, family: Family, batch: LineBatch) {
        if batch.is_empty() {
            return;
        }
        let mut lines = batch.into_lines();

        self.lock().bucket_mut(family).append(&mut lines);
    }

    /// Move the accumulated buckets out, leaving the aggregator empty.
    pub fn take(&self) -> AllowBuckets {
        std::mem::take(&mut *self.lock())
    }

    // A panic can't happen mid-append (Vec::append only moves),
    // so the data behind a poisoned lock is still whole.
    fn lock(&self) -> MutexGuard<'_, AllowBuckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

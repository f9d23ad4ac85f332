//! Sequence id generation.
//!
//! Ids are issued from `[1, SEQUENCE_LIMIT)` and wrap back to 1. The
//! generator is an ordinary value owned by whoever sends frames; share it
//! behind an `Arc` when several senders use one id space.

use std::sync::atomic::{AtomicU32, Ordering};

/// Exclusive upper bound of issued sequence ids.
pub const SEQUENCE_LIMIT: u32 = 0x7fff_ffff;

/// Monotonic wrapping sequence counter.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicU32,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start from `first`. Values outside `[1, SEQUENCE_LIMIT)` start at 1.
    pub fn starting_at(first: u32) -> Self {
        let first = if (1..SEQUENCE_LIMIT).contains(&first) {
            first
        } else {
            1
        };
        Self {
            next: AtomicU32::new(first),
        }
    }

    /// Return the current id and advance the counter.
    pub fn next_sequence(&self) -> u32 {
        // The closure always returns Some, so fetch_update never fails.
        match self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| Some(advance(cur)))
        {
            Ok(prev) | Err(prev) => prev,
        }
    }

    /// The id the next call to [`next_sequence`](Self::next_sequence) returns.
    pub fn peek(&self) -> u32 {
        self.next.load(Ordering::Acquire)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn advance(cur: u32) -> u32 {
    match cur.checked_add(1) {
        Some(n) if n < SEQUENCE_LIMIT => n,
        _ => 1,
    }
}

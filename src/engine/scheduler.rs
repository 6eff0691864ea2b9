//! Resume scheduler with deterministic ordering.
//!
//! A suspended process is represented by a resume token queued at the virtual
//! time it asked to wake up. The queue guarantees:
//! - Resumes are processed in time order
//! - Ties are broken by insertion order (sequence number)
//! - Reproducible across runs

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::engine::SimTime;

/// Identifies which process a resume belongs to.
///
/// The coordinator bumps the generation every time it starts a process, so a
/// token left over from an earlier process is recognisably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResumeToken {
    /// Process generation.
    pub generation: u64,
}

/// A queued resume with time and sequence number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduledResume {
    /// Virtual time at which the process wakes up.
    pub time: SimTime,
    /// Sequence number for deterministic tie-breaking.
    pub sequence: u64,
    /// The process to resume.
    pub token: ResumeToken,
}

impl ScheduledResume {
    /// Create a new scheduled resume.
    #[must_use]
    pub const fn new(time: SimTime, sequence: u64, token: ResumeToken) -> Self {
        Self {
            time,
            sequence,
            token,
        }
    }
}

// Custom ordering for BinaryHeap (min-heap by time, then sequence)
impl PartialEq for ScheduledResume {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledResume {}

impl PartialOrd for ScheduledResume {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledResume {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.time.cmp(&other.time) {
            std::cmp::Ordering::Equal => self.sequence.cmp(&other.sequence),
            ord => ord,
        }
    }
}

/// Priority-ordered resume queue.
///
/// # Example
///
/// ```rust
/// use tourcraft::engine::{ResumeScheduler, ResumeToken, SimTime};
///
/// let mut scheduler = ResumeScheduler::new();
/// scheduler.schedule(SimTime::from_millis(500), ResumeToken { generation: 1 });
/// assert_eq!(scheduler.next_resume_time(), Some(SimTime::from_millis(500)));
/// ```
#[derive(Debug, Default)]
pub struct ResumeScheduler {
    /// Min-heap ordered by (time, sequence).
    queue: BinaryHeap<Reverse<ScheduledResume>>,
    /// Monotonic sequence counter for tie-breaking.
    sequence: u64,
}

impl ResumeScheduler {
    /// Create a new scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a resume at the given time.
    pub fn schedule(&mut self, time: SimTime, token: ResumeToken) {
        let seq = self.sequence;
        self.sequence += 1;

        self.queue
            .push(Reverse(ScheduledResume::new(time, seq, token)));
    }

    /// Get the next resume (removes from queue).
    #[must_use]
    #[allow(clippy::should_implement_trait)] // Not an Iterator, different semantics
    pub fn next(&mut self) -> Option<ScheduledResume> {
        self.queue.pop().map(|Reverse(e)| e)
    }

    /// Peek at the next resume without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ScheduledResume> {
        self.queue.peek().map(|Reverse(e)| e)
    }

    /// Get the next resume if its time is before or at the given time.
    #[must_use]
    pub fn next_before(&mut self, time: SimTime) -> Option<ScheduledResume> {
        if let Some(Reverse(e)) = self.queue.peek() {
            if e.time <= time {
                return self.next();
            }
        }
        None
    }

    /// Drop every queued resume belonging to `generation`.
    pub fn cancel(&mut self, generation: u64) {
        self.queue.retain(|Reverse(e)| e.token.generation != generation);
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the number of pending resumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Clear all pending resumes.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Get the time of the next resume, if any.
    #[must_use]
    pub fn next_resume_time(&self) -> Option<SimTime> {
        self.peek().map(|e| e.time)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Resumes always come out in time order.
        #[test]
        fn prop_time_ordering(times in prop::collection::vec(0u64..10_000, 1..100)) {
            let mut scheduler = ResumeScheduler::new();
            for (i, &t) in times.iter().enumerate() {
                scheduler.schedule(SimTime::from_millis(t), ResumeToken { generation: i as u64 });
            }

            let mut last = SimTime::ZERO;
            while let Some(e) = scheduler.next() {
                prop_assert!(e.time >= last, "resumes not in time order");
                last = e.time;
            }
        }
    }
}

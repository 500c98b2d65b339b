//! One-shot wall-clock timers polled by the host loop.
//!
//! The queue only hands out entries that were already due when
//! [`TimerQueue::take_due`] was called. A callback that reschedules itself
//! with a zero delay therefore runs again on the next poll at the earliest,
//! never within the same one.

use smallvec::SmallVec;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of timers ordered by due time, then by insertion order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, due: Duration, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due, seq, payload }));
    }

    pub fn schedule_in(&mut self, now: Duration, delay: Duration, payload: T) {
        self.schedule_at(now + delay, payload);
    }

    /// Remove every timer due at or before `now`, earliest first, as
    /// `(due, payload)` pairs.
    pub fn take_due(&mut self, now: Duration) -> SmallVec<[(Duration, T); 2]> {
        let mut due = SmallVec::new();
        while self.heap.peek().is_some_and(|Reverse(e)| e.due <= now) {
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push((entry.due, entry.payload));
            }
        }
        due
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(e)| e.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

//! Bounded FIFO queue with a one-cycle write/read delay.

use std::collections::VecDeque;

use crate::Tickable;

/// A bounded hardware FIFO with a fixed length and an "almost full" watermark.
///
/// `write_request` and `read_request` schedule a push/pop for the *next*
/// `next_clock_cycle()` call, mirroring a synchronous FIFO's registered
/// write/read ports. Within one cycle a producer and a consumer may both
/// act; the scheduled write is applied before the scheduled pop so that a
/// FIFO of capacity 1 can still be walked through in a single cycle. After
/// applying both, the head element is republished so the next cycle's
/// `read_data()` call sees a stable value.
pub struct Fifo<T> {
    data: VecDeque<T>,
    capacity: usize,
    almost_full_threshold: usize,
    pending_write: Option<T>,
    pending_read: bool,
    head: Option<T>,
}

impl<T: Clone> Fifo<T> {
    /// Create a FIFO whose "almost full" watermark equals its capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_almost_full(capacity, capacity)
    }

    /// Create a FIFO with a separate almost-full watermark.
    ///
    /// # Panics
    /// Panics if `almost_full_threshold > capacity`.
    #[must_use]
    pub fn with_almost_full(capacity: usize, almost_full_threshold: usize) -> Self {
        assert!(
            almost_full_threshold <= capacity,
            "almost-full threshold must not exceed FIFO capacity"
        );
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            almost_full_threshold,
            pending_write: None,
            pending_read: false,
            head: None,
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    #[must_use]
    pub fn is_almost_full(&self, threshold: usize) -> bool {
        self.data.len() >= threshold
    }

    /// True once occupancy has crossed this FIFO's own configured watermark.
    #[must_use]
    pub fn is_above_watermark(&self) -> bool {
        self.is_almost_full(self.almost_full_threshold)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Schedule a push for the next clock cycle.
    ///
    /// # Panics
    /// Panics if the FIFO is already full — a write request against a full
    /// FIFO is an invariant violation, not backpressure, because it is the
    /// requester's job to check `is_full()` first.
    pub fn write_request(&mut self, value: T) {
        assert!(!self.is_full(), "write_request on a full FIFO");
        self.pending_write = Some(value);
    }

    /// Schedule a pop for the next clock cycle.
    ///
    /// # Panics
    /// Panics if the FIFO is already empty.
    pub fn read_request(&mut self) {
        assert!(!self.is_empty(), "read_request on an empty FIFO");
        self.pending_read = true;
    }

    /// The element currently at the head of the FIFO, valid whenever
    /// `!is_empty()` and stable for the whole cycle.
    #[must_use]
    pub fn read_data(&self) -> T {
        self.head
            .clone()
            .expect("read_data on an empty FIFO")
    }

    /// Reset to empty and clear any pending requests.
    pub fn reset(&mut self) {
        self.data.clear();
        self.pending_write = None;
        self.pending_read = false;
        self.head = None;
    }
}

impl<T: Clone> Tickable for Fifo<T> {
    fn next_clock_cycle(&mut self) {
        if let Some(value) = self.pending_write.take() {
            self.data.push_back(value);
        }
        if self.pending_read {
            self.data.pop_front();
            self.pending_read = false;
        }
        self.head = self.data.front().cloned();
    }
}

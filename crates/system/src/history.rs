use procmon_core::{Report, Sample};
use std::collections::VecDeque;

/// One minute of history at the default 1 Hz sampling rate.
pub const DEFAULT_CAPACITY: usize = 60;

/// Rolling window of the most recent samples, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl History {
    /// A zero capacity is bumped to one so the newest sample is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting from the front until the window fits again.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Copy the window into a fresh [`Report`].
    pub fn report(&self) -> Report {
        Report::from_samples(self.iter())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

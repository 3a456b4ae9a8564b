use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded FIFO of the most recent raw lines from every listener.
///
/// `append` is the only mutation. It takes the lock once and never awaits,
/// so appends from concurrent listener tasks on a multi-threaded runtime
/// cannot interleave or get lost.
#[derive(Debug)]
pub struct HistoryBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
    total_appended: AtomicU64,
}

impl HistoryBuffer {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            total_appended: AtomicU64::new(0),
        }
    }

    pub fn append(&self, line: impl Into<String>) {
        let line = line.into();
        let mut lines = self.lines.lock();
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
        self.total_appended.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy of the buffered lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lines appended since creation, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.total_appended.load(Ordering::Relaxed)
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

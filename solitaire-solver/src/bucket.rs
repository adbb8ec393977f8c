use std::collections::VecDeque;

/// A priority queue for small integer priorities.
///
/// Each priority owns a FIFO bucket; a cursor remembers the lowest bucket that
/// may be non-empty so that draining the queue in order costs amortized O(1).
#[derive(Debug, Clone)]
pub struct BucketQueue<T> {
    buckets: Vec<VecDeque<T>>,
    cursor: usize,
    len: usize,
}

impl<T> BucketQueue<T> {
    /// A queue accepting priorities `0..=max_priority`.
    pub fn new(max_priority: usize) -> Self {
        Self {
            buckets: (0..=max_priority).map(|_| VecDeque::new()).collect(),
            cursor: max_priority + 1,
            len: 0,
        }
    }

    pub fn max_priority(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Panics when `priority` exceeds the configured maximum.
    pub fn insert(&mut self, item: T, priority: usize) {
        assert!(
            priority < self.buckets.len(),
            "priority {priority} exceeds the maximum {}",
            self.max_priority()
        );
        self.buckets[priority].push_back(item);
        self.cursor = self.cursor.min(priority);
        self.len += 1;
    }

    pub fn pop_min(&mut self) -> Option<(T, usize)> {
        while self.cursor < self.buckets.len() {
            if let Some(item) = self.buckets[self.cursor].pop_front() {
                self.len -= 1;
                return Some((item, self.cursor));
            }
            self.cursor += 1;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

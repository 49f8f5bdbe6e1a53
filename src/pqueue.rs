use std::error::Error;
use std::fmt;

const DEFAULT_CAPACITY: usize = 32;

/// Returned by [`PriorityQueue::extract_min`] on an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyQueueError;

impl fmt::Display for EmptyQueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extract_min called on an empty priority queue")
    }
}

impl Error for EmptyQueueError {}

/// A binary min-heap. Storage doubles when full and never shrinks.
/// Equal elements come out in whatever order the heap leaves them.
pub struct PriorityQueue<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn insert(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.capacity *= 2;
            self.items.reserve_exact(self.capacity - self.items.len());
        }
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    pub fn extract_min(&mut self) -> Result<T, EmptyQueueError> {
        let last = self.items.pop().ok_or(EmptyQueueError)?;
        if self.items.is_empty() {
            return Ok(last);
        }
        let min = std::mem::replace(&mut self.items[0], last);
        self.sift_down(0);
        Ok(min)
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.items[pos] >= self.items[parent] {
                break;
            }
            self.items.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.items[right] < self.items[left] {
                right
            } else {
                left
            };
            if self.items[child] >= self.items[pos] {
                break;
            }
            self.items.swap(pos, child);
            pos = child;
        }
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

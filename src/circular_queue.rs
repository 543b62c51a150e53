use std::collections::VecDeque;
use std::fmt;

/// Bounded history, newest element first. Once full, every push evicts the oldest element.
pub struct CircularQueue<T> {
    deque: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> Clone for CircularQueue<T> {
    fn clone(&self) -> Self {
        Self {
            deque: self.deque.clone(),
            capacity: self.capacity,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.deque.fmt(f)
    }
}

impl<T> CircularQueue<T> {
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            deque: VecDeque::with_capacity(cap),
            capacity: cap,
        }
    }

    /// Pushes `item` as the newest element and returns the evicted oldest one, if any.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        let evicted = if self.is_full() {
            self.deque.pop_back()
        } else {
            None
        };

        self.deque.push_front(item);

        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.deque.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed element
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.deque.front()
    }

    /// Newest to oldest
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'_ T> {
        self.deque.iter()
    }

    /// Oldest to newest
    #[inline]
    pub fn asc_iter(&self) -> impl Iterator<Item = &'_ T> {
        self.deque.iter().rev()
    }
}

impl<T: Clone> CircularQueue<T> {
    pub fn to_vec_asc(&self) -> Vec<T> {
        self.asc_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::CircularQueue;

    #[test]
    fn evicts_oldest_when_full() {
        let mut q = CircularQueue::with_capacity(3);

        assert_eq!(q.push(1), None);
        assert_eq!(q.push(2), None);
        assert_eq!(q.push(3), None);
        assert!(q.is_full());

        assert_eq!(q.push(4), Some(1));
        assert_eq!(q.len(), 3);
        assert_eq!(q.to_vec_asc(), vec![2, 3, 4]);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2]);
        assert_eq!(q.last(), Some(&4));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut q = CircularQueue::with_capacity(0);

        assert_eq!(q.push('a'), Some('a'));
        assert!(q.is_empty());
        assert_eq!(q.last(), None);
    }
}

use std::collections::VecDeque;

use crate::{JointAngles, Point};

/// Fixed capacity FIFO buffer.
///
/// Pushing beyond capacity evicts the oldest sample. Samples are kept in
/// insertion order.
#[derive(Clone, Debug)]
pub struct BoundedBuffer<T> {
    inner: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// Creates a new `BoundedBuffer<T>` holding at most `capacity` samples.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            inner: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if the buffer overflows.
    pub fn push(&mut self, sample: T) {
        self.inner.push_back(sample);
        if self.inner.len() > self.capacity {
            self.inner.pop_front();
        }
    }

    /// Most recent sample.
    #[inline]
    pub fn latest(&self) -> Option<&T> {
        self.inner.back()
    }

    /// Sample pushed right before the most recent one.
    pub fn previous(&self) -> Option<&T> {
        self.inner.len().checked_sub(2).and_then(|i| self.inner.get(i))
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Copy the samples out, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.iter().cloned().collect()
    }
}

/// Sample with two plottable coordinates.
pub trait Planar {
    fn coords(&self) -> (f64, f64);
}

impl Planar for Point {
    fn coords(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Planar for JointAngles {
    fn coords(&self) -> (f64, f64) {
        (self.left, self.right)
    }
}

impl<T: Planar> BoundedBuffer<T> {
    /// Split the samples into parallel coordinate sequences.
    pub fn unzip(&self) -> (Vec<f64>, Vec<f64>) {
        self.inner.iter().map(|sample| sample.coords()).unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut buffer = BoundedBuffer::new(4);
        buffer.push(1);
        buffer.push(2);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.to_vec(), vec![1, 2]);
        assert_eq!(buffer.latest(), Some(&2));
        assert_eq!(buffer.previous(), Some(&1));
    }

    #[test]
    fn test_evicts_oldest() {
        let mut buffer = BoundedBuffer::new(3);
        for i in 0..10 {
            buffer.push(i);
            assert!(buffer.len() <= 3);
        }

        assert_eq!(buffer.to_vec(), vec![7, 8, 9]);
    }

    #[test]
    fn test_two_slot() {
        let mut buffer = BoundedBuffer::new(2);
        assert_eq!(buffer.previous(), None);

        buffer.push("a");
        assert_eq!(buffer.previous(), None);

        buffer.push("b");
        buffer.push("c");
        assert_eq!(buffer.previous(), Some(&"b"));
        assert_eq!(buffer.latest(), Some(&"c"));
    }

    #[test]
    fn test_zero_capacity() {
        let mut buffer = BoundedBuffer::new(0);
        buffer.push(1);
        buffer.push(2);

        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.to_vec(), vec![2]);
    }

    #[test]
    fn test_unzip() {
        let mut buffer = BoundedBuffer::new(2);
        buffer.push(Point::new(0.0, 1.0));
        buffer.push(Point::new(2.0, 3.0));
        buffer.push(Point::new(4.0, 5.0));

        let (xs, ys) = buffer.unzip();
        assert_eq!(xs, vec![2.0, 4.0]);
        assert_eq!(ys, vec![3.0, 5.0]);
    }
}

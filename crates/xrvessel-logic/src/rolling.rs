//! Fixed-capacity rolling sample buffer.
//!
//! Used for smoothing gauge inputs (slope estimation, acceleration). Once
//! full, each new sample evicts the oldest one.

/// FIFO of `f64` samples with a fixed capacity.
#[derive(Debug, Clone)]
pub struct RollingArray {
    samples: Vec<f64>,
    capacity: usize,
    /// Slot the next sample is written to.
    next: usize,
}

impl RollingArray {
    /// Create an empty buffer. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    pub fn add_sample(&mut self, sample: f64) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.next] = sample;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    /// Mean of the stored samples, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum() / self.samples.len() as f64
        }
    }

    pub fn newest(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let idx = (self.next + self.capacity - 1) % self.capacity;
        self.samples.get(idx).copied()
    }

    pub fn oldest(&self) -> Option<f64> {
        if self.samples.len() < self.capacity {
            self.samples.first().copied()
        } else {
            self.samples.get(self.next).copied()
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let r = RollingArray::new(4);
        assert_eq!(r.sum(), 0.0);
        assert_eq!(r.average(), 0.0);
        assert_eq!(r.newest(), None);
        assert_eq!(r.oldest(), None);
    }

    #[test]
    fn test_partial_fill() {
        let mut r = RollingArray::new(4);
        r.add_sample(1.0);
        r.add_sample(2.0);
        assert_eq!(r.sample_count(), 2);
        assert_eq!(r.oldest(), Some(1.0));
        assert_eq!(r.newest(), Some(2.0));
        assert!((r.average() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_wraps_and_evicts_oldest() {
        let mut r = RollingArray::new(3);
        for s in [1.0, 2.0, 3.0, 4.0, 5.0] {
            r.add_sample(s);
        }
        assert!(r.is_full());
        assert_eq!(r.sum(), 12.0);
        assert_eq!(r.oldest(), Some(3.0));
        assert_eq!(r.newest(), Some(5.0));
    }

    #[test]
    fn test_clear_resets() {
        let mut r = RollingArray::new(2);
        r.add_sample(9.0);
        r.add_sample(8.0);
        r.add_sample(7.0);
        r.clear();
        assert_eq!(r.sample_count(), 0);
        r.add_sample(1.0);
        assert_eq!(r.oldest(), Some(1.0));
        assert_eq!(r.newest(), Some(1.0));
    }

    #[test]
    fn test_zero_capacity_bumped() {
        let mut r = RollingArray::new(0);
        r.add_sample(3.0);
        r.add_sample(4.0);
        assert_eq!(r.capacity(), 1);
        assert_eq!(r.sum(), 4.0);
    }
}

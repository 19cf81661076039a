//! Fixed-capacity scan buffers that average per-frame measurements.

use crate::{utils::percent, Error, Result};

/// Records that can be combined into one field-wise mean
pub trait Aggregate: Sized {
    /// Field-wise mean of `records`, or `None` if there are none
    fn aggregate(records: &[Self]) -> Option<Self>;
}

/// Accumulates up to `capacity` records and averages them once full
#[derive(Debug, Clone, PartialEq)]
pub struct ScanBuffer<T> {
    capacity: usize,
    records: Vec<T>,
}

impl<T: Aggregate> ScanBuffer<T> {
    /// Create an empty buffer
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            capacity,
            records: Vec::with_capacity(capacity),
        }
    }

    /// Append a record
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferFull`] once the buffer holds `capacity` records;
    /// callers must stop feeding a full buffer.
    pub fn add(&mut self, record: T) -> Result<()> {
        if self.is_full() {
            return Err(Error::BufferFull {
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Fill level as a percentage, `round(len / capacity * 100)`
    #[must_use]
    pub fn progress(&self) -> u8 {
        percent(self.records.len(), self.capacity)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Mean of the stored records. Defined only once the buffer is full.
    #[must_use]
    pub fn average(&self) -> Option<T> {
        if !self.is_full() {
            return None;
        }
        T::aggregate(&self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }
}

//! Fixed-capacity moving average over integer sensor readings.
//!
//! The ring is always fully populated: it is seeded with the first real
//! reading, so the mean never includes uninitialised slots.

/// Number of samples averaged.
pub const SAMPLE_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    slots: [i32; SAMPLE_CAPACITY],
    cursor: usize,
}

impl SampleBuffer {
    /// A buffer with every slot holding `value`.
    pub fn seeded(value: i32) -> Self {
        Self {
            slots: [value; SAMPLE_CAPACITY],
            cursor: 0,
        }
    }

    /// Overwrite every slot with `value`.
    pub fn seed(&mut self, value: i32) {
        self.slots = [value; SAMPLE_CAPACITY];
        self.cursor = 0;
    }

    /// Advance the cursor, store `value` there, and return the new mean.
    pub fn push(&mut self, value: i32) -> i32 {
        self.cursor = (self.cursor + 1) % SAMPLE_CAPACITY;
        self.slots[self.cursor] = value;
        self.mean()
    }

    /// Mean of all slots, truncated toward zero.
    pub fn mean(&self) -> i32 {
        let sum: i64 = self.slots.iter().map(|&s| i64::from(s)).sum();
        (sum / SAMPLE_CAPACITY as i64) as i32
    }
}

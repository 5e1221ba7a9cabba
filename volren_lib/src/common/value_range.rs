use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Closed range of sample values.
/// Used to map intensities onto the quantization levels of an opacity table.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound
    pub low: f32,
    /// Upper bound
    pub high: f32,
}

impl ValueRange {
    pub fn new(low: f32, high: f32) -> ValueRange {
        ValueRange { low, high }
    }

    /// Constructs new, empty range.
    pub fn empty() -> ValueRange {
        ValueRange {
            low: f32::NAN,
            high: f32::NAN,
        }
    }

    /// Minimal range containing every sample
    pub fn from_samples(iter: impl IntoIterator<Item = f32>) -> ValueRange {
        let mut range = ValueRange::empty();
        for val in iter {
            range.extend(val);
        }
        range
    }

    /// Extend the range with new value.
    pub fn extend(&mut self, val: f32) {
        if self.is_empty() {
            self.low = val;
            self.high = val;
            return;
        }

        self.low = f32::min(self.low, val);
        self.high = f32::max(self.high, val);
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_nan() || self.high.is_nan()
    }

    /// Check if value is inside the range.
    pub fn contains(&self, val: f32) -> bool {
        self.low <= val && val <= self.high
    }

    /// Distance between bounds, zero for empty and single value ranges
    pub fn span(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.high - self.low
        }
    }
}

impl Default for ValueRange {
    /// Range of 8-bit samples
    fn default() -> Self {
        ValueRange::new(0.0, 255.0)
    }
}

/// ```
/// # use volren_lib::common::ValueRange;
/// let range: ValueRange = (0.0..4095.0).into();
/// assert_eq!(range.span(), 4095.0);
/// ```
impl From<Range<f32>> for ValueRange {
    fn from(range: Range<f32>) -> Self {
        ValueRange {
            low: range.start,
            high: range.end,
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn value_range() {
        let mut range = ValueRange::new(1.0, 1.0);

        assert!(range.contains(1.0));
        assert!(!range.contains(1.2));
        assert_eq!(range.span(), 0.0);

        for val in [0.0, 5.0, 3.0, -2.5] {
            range.extend(val);
        }

        assert_eq!(range.low, -2.5);
        assert_eq!(range.high, 5.0);
        assert_eq!(range.span(), 7.5);
        assert!(range.contains(4.2));
        assert!(!range.contains(-12.5));
    }

    #[test]
    fn empty_value_range() {
        let mut range = ValueRange::empty();

        assert!(range.is_empty());
        assert!(!range.contains(2.0));
        assert_eq!(range.span(), 0.0);

        range.extend(2.0);

        assert!(range.contains(2.0));
        assert_eq!(range, ValueRange::new(2.0, 2.0));
    }

    #[test]
    fn from_samples() {
        let range = ValueRange::from_samples([1.0, 2.0, 4.0, 10.0, 5.0, 0.0]);
        assert_eq!(range, ValueRange::new(0.0, 10.0));
    }
}

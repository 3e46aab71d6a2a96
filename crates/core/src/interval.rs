use thiserror::Error;

/// Errors that can occur when constructing a [`TimeInterval`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntervalError {
    #[error("interval bound {0} is not finite")]
    NonFinite(f64),

    #[error("interval must be strictly increasing: [{start}, {end}]")]
    NotIncreasing { start: f64, end: f64 },
}

/// A finite, strictly increasing interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeInterval {
    start: f64,
    end: f64,
}

impl TimeInterval {
    /// The standard interval `[-1, 1]` on which node rules are defined.
    pub const STANDARD: Self = Self {
        start: -1.0,
        end: 1.0,
    };

    /// Creates a validated interval.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is non-finite or `start >= end`.
    pub fn new(start: f64, end: f64) -> Result<Self, IntervalError> {
        if !start.is_finite() {
            return Err(IntervalError::NonFinite(start));
        }
        if !end.is_finite() {
            return Err(IntervalError::NonFinite(end));
        }
        if start >= end {
            return Err(IntervalError::NotIncreasing { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns the interval width `end - start`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Maps `x` from this interval linearly onto `target`.
    #[must_use]
    pub fn map_to(&self, x: f64, target: &TimeInterval) -> f64 {
        (x - self.start) * target.width() / self.width() + target.start
    }

    /// Splits the interval into `parts` contiguous sub-intervals of equal width.
    ///
    /// The last sub-interval ends exactly at `end`.
    #[must_use]
    pub fn split(&self, parts: usize) -> Vec<TimeInterval> {
        let parts = parts.max(1);
        let width = self.width() / parts as f64;
        (0..parts)
            .map(|i| {
                let start = self.start + width * i as f64;
                let end = if i + 1 == parts {
                    self.end
                } else {
                    self.start + width * (i + 1) as f64
                };
                TimeInterval { start, end }
            })
            .collect()
    }
}

impl Default for TimeInterval {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_invalid_bounds() {
        assert!(matches!(
            TimeInterval::new(1.0, 1.0),
            Err(IntervalError::NotIncreasing { .. })
        ));
        assert!(matches!(
            TimeInterval::new(f64::NAN, 1.0),
            Err(IntervalError::NonFinite(_))
        ));
        assert!(matches!(
            TimeInterval::new(0.0, f64::INFINITY),
            Err(IntervalError::NonFinite(_))
        ));
    }

    #[test]
    fn maps_points_linearly() {
        let unit = TimeInterval::new(0.0, 1.0).unwrap();
        let std = TimeInterval::STANDARD;

        assert_relative_eq!(std.map_to(-1.0, &unit), 0.0);
        assert_relative_eq!(std.map_to(0.0, &unit), 0.5);
        assert_relative_eq!(std.map_to(1.0, &unit), 1.0);
    }

    #[test]
    fn split_is_contiguous() {
        let interval = TimeInterval::new(0.0, 0.3).unwrap();
        let parts = interval.split(3);

        assert_eq!(parts.len(), 3);
        assert_relative_eq!(parts[0].start(), 0.0);
        assert_relative_eq!(parts[1].start(), parts[0].end());
        assert_relative_eq!(parts[2].start(), parts[1].end());
        assert!(parts[2].end() == 0.3);
    }
}

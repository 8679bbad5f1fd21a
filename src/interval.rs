//! Interval arithmetic for ray parameter ranges.
//!
//! Open intervals (min, max) bound the `t` values an intersection query will
//! accept. The discriminant-only queries run against [`Interval::UNIVERSE`],
//! the nearest-hit and bounded-shadow queries against [`Interval::ahead`].

/// Offset below which a root is treated as the probe's own origin.
pub const EPSILON: f32 = 1e-3;

/// Open interval (min, max) for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Every finite parameter, including negative ones.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Parameters strictly in front of the origin, up to `max`.
    pub fn ahead(max: f32) -> Self {
        Self::new(EPSILON, max)
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with its upper bound pulled in to `max`.
    pub fn clip(&self, max: f32) -> Self {
        Self::new(self.min, self.max.min(max))
    }
}

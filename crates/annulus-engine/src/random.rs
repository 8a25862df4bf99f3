//! Uniform scalar source used to seed per-object attributes.

use std::cmp::Ordering;

use rand::Rng;
use rand::rngs::ThreadRng;

/// Draws attempted before an interval too narrow to sample falls back to `min`.
const MAX_RESAMPLES: usize = 16;

/// Uniform `f32` generator over half-open intervals.
///
/// Wraps any [`Rng`] so tests can inject a seeded generator; [`RandomSource::new`]
/// uses the thread-local generator.
#[derive(Debug, Clone)]
pub struct RandomSource<R = ThreadRng> {
    rng: R,
}

impl RandomSource<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomSource<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSource<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.range(0.0, 1.0)
    }

    /// Uniform in `[0, max)`.
    #[inline]
    pub fn up_to(&mut self, max: f32) -> f32 {
        self.range(0.0, max)
    }

    /// Uniform in `[min, max)`.
    ///
    /// An empty interval (`min >= max`) yields `min`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if min.partial_cmp(&max) != Some(Ordering::Less) {
            return min;
        }
        // `low + u * (high - low)` can round up to `high` on narrow intervals.
        for _ in 0..MAX_RESAMPLES {
            let v = self.rng.random_range(min..max);
            if v < max {
                return v;
            }
        }
        min
    }
}

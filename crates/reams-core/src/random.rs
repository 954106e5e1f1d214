// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Random Source
// ─────────────────────────────────────────────────────────────────────
//! Injectable randomness for self-repair triggering and threshold
//! cloaking.
//!
//! Production gates draw from an entropy-seeded `StdRng`. Tests pin the
//! sequence with `SeededRandom::seed` or script it exactly with
//! `SequenceRandom`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trait for uniform random sources.
///
/// `next_unit` returns a draw in [0, 1).
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;

    /// Uniform draw in [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// `StdRng`-backed source.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible source for tests and offline replay.
    pub fn seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Counts how many draws were taken so tests can assert that a code
/// path never consulted randomness.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
    draws: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        self.draws += 1;
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

type DrawFn = Box<dyn FnMut() -> f64 + Send>;

/// External source that delegates each draw to a boxed closure.
///
/// Used by the Python bindings to delegate draws to a caller-owned
/// generator.
pub struct ExternalRandom {
    draw_fn: DrawFn,
}

impl ExternalRandom {
    pub fn new(draw_fn: impl FnMut() -> f64 + Send + 'static) -> Self {
        Self {
            draw_fn: Box::new(draw_fn),
        }
    }
}

impl RandomSource for ExternalRandom {
    fn next_unit(&mut self) -> f64 {
        let v = (self.draw_fn)();
        if !v.is_finite() {
            log::warn!("external random source returned non-finite draw, using 0.0");
            return 0.0;
        }
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Threshold Cloaking
// ─────────────────────────────────────────────────────────────────────
//! Publishes plausible-but-imprecise bands around the private
//! admission floor and suspicion ceiling.
//!
//! The private value is jittered uniformly within ±pct of the true
//! threshold; the public band is the deterministic `[v(1-pct), v(1+pct)]`
//! rounded to three decimals, so repeated probing only ever reveals the
//! band.

use serde::{Deserialize, Serialize};

use reams_core::RandomSource;
use reams_types::GateConfig;

/// Public-facing interval, rounded to three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PublicBand {
    pub lo: f64,
    pub hi: f64,
}

impl PublicBand {
    pub fn contains(&self, value: f64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }
}

/// One cloaked threshold: the jittered private value and its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloakedThreshold {
    pub private: f64,
    pub public_band: PublicBand,
}

/// Cloaked admission floor and suspicion ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloakResult {
    pub admission_floor: CloakedThreshold,
    pub suspicion_ceiling: CloakedThreshold,
}

impl CloakResult {
    /// `config` with its thresholds replaced by the private values.
    pub fn apply(&self, config: &GateConfig) -> GateConfig {
        GateConfig {
            admission_floor: self.admission_floor.private,
            suspicion_ceiling: self.suspicion_ceiling.private,
            ..config.clone()
        }
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Cloak a single threshold with jitter fraction `pct`.
///
/// `pct` is a fraction (0.1 = ±10%); values outside [0, 1] are the
/// caller's responsibility.
pub fn cloak_threshold(value: f64, pct: f64, rng: &mut dyn RandomSource) -> CloakedThreshold {
    let delta = value * pct;
    CloakedThreshold {
        private: value + rng.uniform(-delta, delta),
        public_band: PublicBand {
            lo: round3(value * (1.0 - pct)),
            hi: round3(value * (1.0 + pct)),
        },
    }
}

/// Cloak both gate thresholds.
pub fn cloak_thresholds(
    config: &GateConfig,
    pct_admission: f64,
    pct_suspicion: f64,
    rng: &mut dyn RandomSource,
) -> CloakResult {
    CloakResult {
        admission_floor: cloak_threshold(config.admission_floor, pct_admission, rng),
        suspicion_ceiling: cloak_threshold(config.suspicion_ceiling, pct_suspicion, rng),
    }
}

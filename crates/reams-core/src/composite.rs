// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Composite Scorers
// ─────────────────────────────────────────────────────────────────────
//! Admission score and suspicion ratio.
//!
//! The admission score is a weighted geometric mean computed in the log
//! domain: `ΔE_s = exp(Σ w_i · ln(s_i + ε))`. One near-zero signal
//! collapses the product, so any single failing dimension can veto
//! admission.
//!
//! The suspicion ratio divides lexical dispersion by the product of
//! evidence density, normalized volume and PRSI. Every factor carries
//! an ε so the ratio stays finite even when all inputs are 0.

use reams_types::{EnergySignals, EnergyWeights, SuspicionScore, SuspicionSignals};

use crate::signals::suspicion_signals;

/// Guard inside the admission logarithms.
pub const LOG_EPS: f64 = 1e-9;
/// Guard added to every suspicion factor.
pub const FACTOR_EPS: f64 = 1e-6;
/// Guard added to the suspicion denominator product.
pub const RATIO_EPS: f64 = 1e-9;
/// Default PRSI floor for standalone pre-filtering.
pub const DEFAULT_INTEGRITY_FLOOR: f64 = 0.75;

/// ΔE_s for a set of energy signals.
pub fn admission_score(signals: &EnergySignals, weights: &EnergyWeights) -> f64 {
    let log_sum = weights.coherence * (signals.coherence + LOG_EPS).ln()
        + weights.relevance * (signals.relevance + LOG_EPS).ln()
        + weights.compliance * (signals.compliance + LOG_EPS).ln()
        + weights.calibration * (signals.calibration + LOG_EPS).ln();
    log_sum.exp()
}

/// SR from precomputed sub-signals. PRSI is passed through unguarded.
pub fn suspicion_from_signals(s: &SuspicionSignals) -> SuspicionScore {
    let numerator = s.dispersion + FACTOR_EPS;
    let denominator = (s.evidence_density + FACTOR_EPS)
        * (s.normalized_volume + FACTOR_EPS)
        * (s.integrity + FACTOR_EPS)
        + RATIO_EPS;
    SuspicionScore {
        ratio: numerator / denominator,
        integrity: s.integrity,
    }
}

/// SR and PRSI for a step text.
pub fn suspicion_ratio(step: &str) -> SuspicionScore {
    suspicion_from_signals(&suspicion_signals(step))
}

/// Standalone PRSI floor predicate, usable before a step reaches the gate.
pub fn integrity_floor_check(integrity: f64, floor: f64) -> bool {
    integrity >= floor
}

/// Step-4 admission rule shared by the first pass and the repair pass.
pub fn admits(
    admission: f64,
    suspicion: f64,
    integrity_pass: bool,
    admission_floor: f64,
    suspicion_ceiling: f64,
) -> bool {
    admission >= admission_floor && suspicion < suspicion_ceiling && integrity_pass
}

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Score Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_score: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_score: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Per-step gate outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allow,
    Deny,
    Hibernate,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Deny => "deny",
            Verdict::Hibernate => "hibernate",
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four energy signals feeding the admission score, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySignals {
    /// λ: similarity of the step to accepted history.
    pub coherence: f64,
    /// φ: similarity of the step to the prompt.
    pub relevance: f64,
    /// ℒ: banned-vocabulary penalty.
    pub compliance: f64,
    /// γ: absolute-certainty penalty.
    pub calibration: f64,
}

/// The four suspicion sub-signals, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspicionSignals {
    pub evidence_density: f64,
    pub dispersion: f64,
    pub normalized_volume: f64,
    /// PRSI: citation / quote / proper-noun integrity proxy.
    pub integrity: f64,
}

/// Suspicion composite: the ratio plus the integrity sub-score it used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspicionScore {
    pub ratio: f64,
    pub integrity: f64,
}

/// Result of gating one step. Not retained by the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub verdict: Verdict,
    pub signals: EnergySignals,
    /// ΔE_s: weighted geometric mean of the energy signals.
    pub admission_score: f64,
    pub suspicion_ratio: f64,
    pub integrity: f64,
    /// Self-repair was triggered on this step.
    pub repair_attempted: bool,
    /// Self-repair flipped the verdict to ALLOW.
    pub repaired: bool,
    /// Set when the verdict is HIBERNATE.
    pub reason: Option<String>,
}

impl StepResult {
    /// Result for a call on an already hibernating gate: nothing scored.
    pub fn hibernating(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Hibernate,
            signals: EnergySignals::default(),
            admission_score: 0.0,
            suspicion_ratio: 0.0,
            integrity: 0.0,
            repair_attempted: false,
            repaired: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_scored(&self) -> bool {
        !(self.verdict == Verdict::Hibernate && self.reason.as_deref() == Some(HIBERNATE_REASON))
    }
}

/// Reason attached to calls on a gate that is already hibernating.
pub const HIBERNATE_REASON: &str = "killswitch engaged";

/// Trace of a multi-step gating run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateTrace {
    pub results: Vec<StepResult>,
    /// Texts admitted to history during this run, repair suffix included.
    pub admitted: Vec<String>,
    pub halted: bool,
    pub halt_index: Option<usize>,
    pub halt_reason: Option<String>,
}

impl GateTrace {
    /// Admitted text of this run, whitespace separated.
    pub fn output(&self) -> String {
        self.admitted.join(" ")
    }

    pub fn step_count(&self) -> usize {
        self.results.len()
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.results.iter().filter(|r| r.verdict == verdict).count()
    }

    fn scored(&self) -> impl Iterator<Item = &StepResult> {
        self.results.iter().filter(|r| r.is_scored())
    }

    pub fn avg_admission(&self) -> f64 {
        let (sum, n) = self
            .scored()
            .fold((0.0, 0usize), |(s, n), r| (s + r.admission_score, n + 1));
        if n == 0 {
            return 0.0;
        }
        clamp_score(sum / n as f64, 0.0, 1.0)
    }

    /// Lowest admission score; 0 when nothing was scored.
    pub fn min_admission(&self) -> f64 {
        self.scored()
            .map(|r| r.admission_score)
            .reduce(f64::min)
            .map_or(0.0, |m| m.clamp(0.0, 1.0))
    }

    pub fn max_suspicion(&self) -> f64 {
        self.scored()
            .map(|r| r.suspicion_ratio)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(verdict: Verdict, admission: f64, suspicion: f64) -> StepResult {
        StepResult {
            verdict,
            signals: EnergySignals::default(),
            admission_score: admission,
            suspicion_ratio: suspicion,
            integrity: 0.0,
            repair_attempted: false,
            repaired: false,
            reason: None,
        }
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_score(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_pos_inf() {
        assert_eq!(clamp_score(f64::INFINITY, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_clamp_neg_inf() {
        assert_eq!(clamp_score(f64::NEG_INFINITY, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_normal() {
        assert_eq!(clamp_score(0.75, 0.0, 1.0), 0.75);
        assert_eq!(clamp_score(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp_score(-0.3, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_verdict_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Hibernate).unwrap(), "\"hibernate\"");
        let v: Verdict = serde_json::from_str("\"allow\"").unwrap();
        assert_eq!(v, Verdict::Allow);
        assert_eq!(Verdict::Deny.to_string(), "deny");
    }

    #[test]
    fn test_hibernating_result_unscored() {
        let r = StepResult::hibernating(HIBERNATE_REASON);
        assert_eq!(r.verdict, Verdict::Hibernate);
        assert!(!r.is_scored());
        assert_eq!(r.admission_score, 0.0);
    }

    #[test]
    fn test_trace_counts_and_output() {
        let trace = GateTrace {
            results: vec![
                result(Verdict::Allow, 0.8, 1.0),
                result(Verdict::Deny, 0.2, 3.0),
                result(Verdict::Allow, 0.6, 0.5),
            ],
            admitted: vec!["first step".into(), "third step".into()],
            ..Default::default()
        };
        assert_eq!(trace.step_count(), 3);
        assert_eq!(trace.count(Verdict::Allow), 2);
        assert_eq!(trace.count(Verdict::Deny), 1);
        assert_eq!(trace.output(), "first step third step");
        assert!((trace.avg_admission() - (0.8 + 0.2 + 0.6) / 3.0).abs() < 1e-9);
        assert!((trace.min_admission() - 0.2).abs() < 1e-9);
        assert!((trace.max_suspicion() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trace_skips_unscored() {
        let trace = GateTrace {
            results: vec![
                result(Verdict::Allow, 0.9, 1.0),
                StepResult::hibernating(HIBERNATE_REASON),
            ],
            ..Default::default()
        };
        assert!((trace.avg_admission() - 0.9).abs() < 1e-9);
        assert!((trace.min_admission() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_empty_trace() {
        let trace = GateTrace::default();
        assert_eq!(trace.avg_admission(), 0.0);
        assert_eq!(trace.min_admission(), 0.0);
        assert_eq!(trace.output(), "");
    }

    #[test]
    fn test_min_admission_all_unscored() {
        let trace = GateTrace {
            results: vec![
                StepResult::hibernating(HIBERNATE_REASON),
                StepResult::hibernating(HIBERNATE_REASON),
            ],
            ..GateTrace::default()
        };
        assert_eq!(trace.min_admission(), 0.0);
        assert_eq!(trace.max_suspicion(), 0.0);
    }
}

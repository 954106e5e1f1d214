// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Configuration and Policy
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{ReamsError, ReamsResult};

/// Log-domain exponents for the four energy signals.
///
/// The admission score is `exp(Σ w · ln(signal + ε))`, so these need
/// not sum to 1. Equal weights of 0.25 give a plain geometric mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyWeights {
    pub coherence: f64,
    pub relevance: f64,
    pub compliance: f64,
    pub calibration: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self::uniform(0.25)
    }
}

impl EnergyWeights {
    pub fn uniform(w: f64) -> Self {
        Self {
            coherence: w,
            relevance: w,
            compliance: w,
            calibration: w,
        }
    }

    fn as_array(&self) -> [(&'static str, f64); 4] {
        [
            ("coherence", self.coherence),
            ("relevance", self.relevance),
            ("compliance", self.compliance),
            ("calibration", self.calibration),
        ]
    }
}

/// Immutable per-gate thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Admission score must be >= this to pass.
    pub admission_floor: f64,

    /// Suspicion ratio must be strictly below this to pass.
    pub suspicion_ceiling: f64,

    /// Consecutive raw failures forgiven before a DENY surfaces.
    pub hysteresis_grace: u32,

    /// Chance of a one-shot self-repair on a surfaced DENY.
    pub repair_probability: f64,

    /// Repair boost is `repair_gain * 0.1` on coherence and relevance.
    pub repair_gain: f64,

    pub weights: EnergyWeights,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            admission_floor: 0.5,
            suspicion_ceiling: 2.0,
            hysteresis_grace: 2,
            repair_probability: 0.0,
            repair_gain: 1.0,
            weights: EnergyWeights::default(),
        }
    }
}

impl GateConfig {
    /// Validate configuration parameters.
    ///
    /// The gate itself never calls this; binding layers do before
    /// accepting caller-supplied values.
    pub fn validate(&self) -> ReamsResult<()> {
        if !self.admission_floor.is_finite() || self.admission_floor < 0.0 {
            return Err(ReamsError::Config(format!(
                "admission_floor must be finite and >= 0, got {}",
                self.admission_floor
            )));
        }
        if !self.suspicion_ceiling.is_finite() || self.suspicion_ceiling <= 0.0 {
            return Err(ReamsError::Config(format!(
                "suspicion_ceiling must be finite and > 0, got {}",
                self.suspicion_ceiling
            )));
        }
        if !(0.0..=1.0).contains(&self.repair_probability) {
            return Err(ReamsError::Config(format!(
                "repair_probability must be in [0, 1], got {}",
                self.repair_probability
            )));
        }
        if !self.repair_gain.is_finite() || self.repair_gain < 0.0 {
            return Err(ReamsError::Config(format!(
                "repair_gain must be finite and >= 0, got {}",
                self.repair_gain
            )));
        }
        for (name, w) in self.weights.as_array() {
            if !w.is_finite() || w < 0.0 {
                return Err(ReamsError::Config(format!(
                    "weight for {name} must be finite and >= 0, got {w}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ReamsResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReamsError::Config(format!("JSON parse error: {e}")))
    }
}

/// Alert density trigger: hibernate once `alert_count_threshold`
/// alerts have accumulated while the step count is still within
/// `step_count_ceiling`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertWindow {
    pub alert_count_threshold: u64,
    pub step_count_ceiling: u64,
}

impl Default for AlertWindow {
    fn default() -> Self {
        Self {
            alert_count_threshold: 3,
            step_count_ceiling: 20,
        }
    }
}

/// Killswitch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillswitchPolicy {
    /// Compliance below this counts as a burst and arms leak detection.
    pub lexical_floor_burst: f64,
    pub alert_window: AlertWindow,
    /// Hibernate once malicious leaks exceed this count.
    pub malicious_leak_limit: u64,
}

impl Default for KillswitchPolicy {
    fn default() -> Self {
        Self {
            lexical_floor_burst: 0.5,
            alert_window: AlertWindow::default(),
            malicious_leak_limit: 0,
        }
    }
}

/// Injected enforcement policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Turns on the integrity floor and the killswitch.
    pub enforcement_enabled: bool,
    pub integrity_floor: f64,
    pub killswitch: KillswitchPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            enforcement_enabled: false,
            integrity_floor: 0.75,
            killswitch: KillswitchPolicy::default(),
        }
    }
}

impl Policy {
    /// Enforcing policy with otherwise default parameters.
    pub fn enforcing() -> Self {
        Self {
            enforcement_enabled: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ReamsResult<()> {
        if !(0.0..=1.0).contains(&self.integrity_floor) {
            return Err(ReamsError::Config(format!(
                "integrity_floor must be in [0, 1], got {}",
                self.integrity_floor
            )));
        }
        if !(0.0..=1.0).contains(&self.killswitch.lexical_floor_burst) {
            return Err(ReamsError::Config(format!(
                "lexical_floor_burst must be in [0, 1], got {}",
                self.killswitch.lexical_floor_burst
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> ReamsResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReamsError::Config(format!("JSON parse error: {e}")))
    }
}

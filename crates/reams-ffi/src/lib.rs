// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the REAMS step gate.
//!
//! Exposes `RustGate`, its config and policy types, the standalone
//! killswitch updater, and the audit helpers to Python via PyO3.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - A failing random callback yields 0.0 (the gate's draw never fails).
//! - Config and policy are validated before a gate is built.
//!
//! Install: `pip install -e crates/reams-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from reams_gate import GateConfig, RustGate
//!
//! gate = RustGate(GateConfig(admission_floor=0.5), seed=7)
//! result = gate.step("prompt", "a reasoning step")
//! ```

use std::path::PathBuf;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use reams_audit::{CloakResult, CloakedThreshold, SealRecord};
use reams_core::{ExternalRandom, Gate, KillswitchState, SeededRandom, SharedGate};
use reams_types::{
    AlertWindow, EnergyWeights, GateConfig, GateTrace, KillswitchPolicy, Policy, ReamsError,
    StepResult,
};

fn to_py_err(e: ReamsError) -> PyErr {
    match e {
        ReamsError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn energy_weights(
    w_coherence: f64,
    w_relevance: f64,
    w_compliance: f64,
    w_calibration: f64,
) -> EnergyWeights {
    EnergyWeights {
        coherence: w_coherence,
        relevance: w_relevance,
        compliance: w_compliance,
        calibration: w_calibration,
    }
}

fn config_repr(config: &GateConfig) -> String {
    format!(
        "GateConfig(admission_floor={}, suspicion_ceiling={}, grace={}, repair_p={})",
        config.admission_floor,
        config.suspicion_ceiling,
        config.hysteresis_grace,
        config.repair_probability
    )
}

fn step_result_repr(result: &StepResult) -> String {
    format!(
        "StepResult(verdict={}, e={:.4}, sr={:.4}, integrity={:.4})",
        result.verdict, result.admission_score, result.suspicion_ratio, result.integrity
    )
}

/// Dict keys for the two cloaked thresholds, in output order.
fn cloak_entries(cloak: &CloakResult) -> [(&'static str, CloakedThreshold); 2] {
    [
        ("admission_floor", cloak.admission_floor),
        ("suspicion_ceiling", cloak.suspicion_ceiling),
    ]
}

// ─── PyGateConfig ───────────────────────────────────────────────────

/// Python-visible gate thresholds.
#[pyclass(name = "GateConfig")]
#[derive(Clone)]
struct PyGateConfig {
    inner: GateConfig,
}

#[pymethods]
impl PyGateConfig {
    #[new]
    #[pyo3(signature = (
        admission_floor = 0.5,
        suspicion_ceiling = 2.0,
        hysteresis_grace = 2,
        repair_probability = 0.0,
        repair_gain = 1.0,
        w_coherence = 0.25,
        w_relevance = 0.25,
        w_compliance = 0.25,
        w_calibration = 0.25,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        admission_floor: f64,
        suspicion_ceiling: f64,
        hysteresis_grace: u32,
        repair_probability: f64,
        repair_gain: f64,
        w_coherence: f64,
        w_relevance: f64,
        w_compliance: f64,
        w_calibration: f64,
    ) -> PyResult<Self> {
        let config = GateConfig {
            admission_floor,
            suspicion_ceiling,
            hysteresis_grace,
            repair_probability,
            repair_gain,
            weights: energy_weights(w_coherence, w_relevance, w_compliance, w_calibration),
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = GateConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn admission_floor(&self) -> f64 {
        self.inner.admission_floor
    }

    #[getter]
    fn suspicion_ceiling(&self) -> f64 {
        self.inner.suspicion_ceiling
    }

    fn __repr__(&self) -> String {
        config_repr(&self.inner)
    }
}

// ─── PyPolicy ───────────────────────────────────────────────────────

/// Python-visible enforcement policy.
#[pyclass(name = "Policy")]
#[derive(Clone)]
struct PyPolicy {
    inner: Policy,
}

#[pymethods]
impl PyPolicy {
    #[new]
    #[pyo3(signature = (
        enforcement_enabled = false,
        integrity_floor = 0.75,
        lexical_floor_burst = 0.5,
        alert_count_threshold = 3,
        step_count_ceiling = 20,
        malicious_leak_limit = 0,
    ))]
    fn new(
        enforcement_enabled: bool,
        integrity_floor: f64,
        lexical_floor_burst: f64,
        alert_count_threshold: u64,
        step_count_ceiling: u64,
        malicious_leak_limit: u64,
    ) -> PyResult<Self> {
        let policy = Policy {
            enforcement_enabled,
            integrity_floor,
            killswitch: KillswitchPolicy {
                lexical_floor_burst,
                alert_window: AlertWindow {
                    alert_count_threshold,
                    step_count_ceiling,
                },
                malicious_leak_limit,
            },
        };
        policy.validate().map_err(to_py_err)?;
        Ok(Self { inner: policy })
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let policy = Policy::from_json(json).map_err(to_py_err)?;
        policy.validate().map_err(to_py_err)?;
        Ok(Self { inner: policy })
    }

    #[getter]
    fn enforcement_enabled(&self) -> bool {
        self.inner.enforcement_enabled
    }

    fn __repr__(&self) -> String {
        format!(
            "Policy(enforcement={}, integrity_floor={}, window=({}, {}))",
            self.inner.enforcement_enabled,
            self.inner.integrity_floor,
            self.inner.killswitch.alert_window.alert_count_threshold,
            self.inner.killswitch.alert_window.step_count_ceiling
        )
    }
}

// ─── PyStepResult ───────────────────────────────────────────────────

/// Python-visible verdict and scores for one step.
#[pyclass(name = "StepResult")]
#[derive(Clone)]
struct PyStepResult {
    inner: StepResult,
}

#[pymethods]
impl PyStepResult {
    /// "allow", "deny" or "hibernate".
    #[getter]
    fn verdict(&self) -> &'static str {
        self.inner.verdict.as_str()
    }

    #[getter]
    fn admission_score(&self) -> f64 {
        self.inner.admission_score
    }

    #[getter]
    fn suspicion_ratio(&self) -> f64 {
        self.inner.suspicion_ratio
    }

    #[getter]
    fn integrity(&self) -> f64 {
        self.inner.integrity
    }

    #[getter]
    fn repair_attempted(&self) -> bool {
        self.inner.repair_attempted
    }

    #[getter]
    fn repaired(&self) -> bool {
        self.inner.repaired
    }

    #[getter]
    fn reason(&self) -> Option<String> {
        self.inner.reason.clone()
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let s = &self.inner.signals;
        let dict = PyDict::new(py);
        dict.set_item("verdict", self.inner.verdict.as_str())?;
        dict.set_item("coherence", s.coherence)?;
        dict.set_item("relevance", s.relevance)?;
        dict.set_item("compliance", s.compliance)?;
        dict.set_item("calibration", s.calibration)?;
        dict.set_item("admission_score", self.inner.admission_score)?;
        dict.set_item("suspicion_ratio", self.inner.suspicion_ratio)?;
        dict.set_item("integrity", self.inner.integrity)?;
        dict.set_item("repair_attempted", self.inner.repair_attempted)?;
        dict.set_item("repaired", self.inner.repaired)?;
        dict.set_item("reason", self.inner.reason.clone())?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        step_result_repr(&self.inner)
    }
}

// ─── PyGateTrace ────────────────────────────────────────────────────

/// Python-visible multi-step trace.
#[pyclass(name = "GateTrace")]
#[derive(Clone)]
struct PyGateTrace {
    inner: GateTrace,
}

#[pymethods]
impl PyGateTrace {
    #[getter]
    fn halted(&self) -> bool {
        self.inner.halted
    }

    #[getter]
    fn halt_index(&self) -> Option<usize> {
        self.inner.halt_index
    }

    #[getter]
    fn halt_reason(&self) -> Option<String> {
        self.inner.halt_reason.clone()
    }

    #[getter]
    fn results(&self) -> Vec<PyStepResult> {
        self.inner
            .results
            .iter()
            .cloned()
            .map(|inner| PyStepResult { inner })
            .collect()
    }

    fn output(&self) -> String {
        self.inner.output()
    }

    fn step_count(&self) -> usize {
        self.inner.step_count()
    }

    fn avg_admission(&self) -> f64 {
        self.inner.avg_admission()
    }

    fn __repr__(&self) -> String {
        format!(
            "GateTrace(steps={}, halted={}, avg_e={:.4})",
            self.inner.step_count(),
            self.inner.halted,
            self.inner.avg_admission()
        )
    }
}

// ─── RustGate ───────────────────────────────────────────────────────

/// REAMS step gate exposed to Python.
///
/// The repair draw comes from `random_callback` when given
/// (Callable[[], float] in [0, 1)), else from a seeded or
/// entropy-seeded generator.
#[pyclass(name = "RustGate")]
struct PyGate {
    inner: SharedGate,
}

#[pymethods]
impl PyGate {
    #[new]
    #[pyo3(signature = (config = None, policy = None, seed = None, random_callback = None))]
    fn new(
        config: Option<PyGateConfig>,
        policy: Option<PyPolicy>,
        seed: Option<u64>,
        random_callback: Option<PyObject>,
    ) -> Self {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let pol = policy.map(|p| p.inner).unwrap_or_default();
        let inner = match (random_callback, seed) {
            (Some(cb), _) => Gate::with_random(
                cfg,
                pol,
                ExternalRandom::new(move || {
                    Python::with_gil(|py| match cb.call0(py) {
                        Ok(result) => result.extract::<f64>(py).unwrap_or(0.0),
                        Err(_) => 0.0,
                    })
                }),
            ),
            (None, Some(seed)) => Gate::with_random(cfg, pol, SeededRandom::seed(seed)),
            (None, None) => Gate::new(cfg, pol),
        };
        Self {
            inner: SharedGate::new(inner),
        }
    }

    /// Gate one reasoning step against the prompt.
    fn step(&self, prompt: &str, step_text: &str) -> PyStepResult {
        PyStepResult {
            inner: self.inner.step(prompt, step_text),
        }
    }

    /// Gate steps in order, stopping at the first HIBERNATE.
    fn run_steps(&self, prompt: &str, steps: Vec<String>) -> PyGateTrace {
        let refs: Vec<&str> = steps.iter().map(|s| s.as_str()).collect();
        PyGateTrace {
            inner: self.inner.run_steps(prompt, &refs),
        }
    }

    #[getter]
    fn is_hibernating(&self) -> bool {
        self.inner.is_hibernating()
    }

    #[getter]
    fn fail_streak(&self) -> u32 {
        self.inner.snapshot().fail_streak
    }

    fn history_text(&self) -> String {
        self.inner.history_text()
    }

    /// Gate counters as a JSON string.
    fn snapshot_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

// ─── PyKillswitchState ──────────────────────────────────────────────

/// Killswitch counters for offline replay with `update_killswitch`.
#[pyclass(name = "KillswitchState")]
#[derive(Clone, Default)]
struct PyKillswitchState {
    inner: KillswitchState,
}

#[pymethods]
impl PyKillswitchState {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    #[getter]
    fn alerts(&self) -> u64 {
        self.inner.alerts
    }

    #[getter]
    fn steps(&self) -> u64 {
        self.inner.steps
    }

    #[getter]
    fn compliance_bursts(&self) -> u64 {
        self.inner.compliance_bursts
    }

    #[getter]
    fn malicious_leaks(&self) -> u64 {
        self.inner.malicious_leaks
    }

    #[getter]
    fn hibernating(&self) -> bool {
        self.inner.hibernating
    }

    fn __repr__(&self) -> String {
        format!(
            "KillswitchState(alerts={}, steps={}, leaks={}, hibernating={})",
            self.inner.alerts, self.inner.steps, self.inner.malicious_leaks, self.inner.hibernating
        )
    }
}

/// Advance offline killswitch counters by one step.
///
/// Returns whether the state is hibernating afterwards.
#[pyfunction]
fn update_killswitch(
    state: &mut PyKillswitchState,
    is_alert: bool,
    compliance: f64,
    is_malicious_leak: bool,
    policy: &PyPolicy,
) -> bool {
    reams_core::update_killswitch(
        &mut state.inner,
        is_alert,
        compliance,
        is_malicious_leak,
        &policy.inner,
    )
}

// ─── Free functions ─────────────────────────────────────────────────

#[pyfunction]
fn integrity_floor_check(integrity: f64, floor: f64) -> bool {
    reams_core::integrity_floor_check(integrity, floor)
}

#[pyfunction]
fn redact_text(text: &str) -> String {
    reams_audit::redact_text(text)
}

/// Cloak a config's thresholds.
///
/// Returns `{"admission_floor": {"private", "public_band"}, "suspicion_ceiling": {...}}`.
#[pyfunction]
#[pyo3(signature = (config, pct_admission = 0.1, pct_suspicion = 0.1, seed = None))]
fn cloak_thresholds<'py>(
    py: Python<'py>,
    config: &PyGateConfig,
    pct_admission: f64,
    pct_suspicion: f64,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyDict>> {
    let mut rng = seed.map(SeededRandom::seed).unwrap_or_default();
    let cloak = reams_audit::cloak_thresholds(&config.inner, pct_admission, pct_suspicion, &mut rng);
    let dict = PyDict::new(py);
    for (key, t) in cloak_entries(&cloak) {
        let entry = PyDict::new(py);
        entry.set_item("private", t.private)?;
        entry.set_item("public_band", (t.public_band.lo, t.public_band.hi))?;
        dict.set_item(key, entry)?;
    }
    Ok(dict)
}

/// Seal a ledger file; `metadata_json` is any JSON value.
///
/// Returns the appended seal record as a JSON string.
#[pyfunction]
fn seal_append(ledger_path: PathBuf, metadata_json: &str, seal_log: PathBuf) -> PyResult<String> {
    let metadata: serde_json::Value =
        serde_json::from_str(metadata_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let record: SealRecord =
        reams_audit::seal_append(&ledger_path, &metadata, &seal_log).map_err(to_py_err)?;
    serde_json::to_string(&record).map_err(|e| PyValueError::new_err(e.to_string()))
}

// ─── Module Registration ────────────────────────────────────────────

/// REAMS step gate — Rust-accelerated reasoning-step admission.
///
/// - `GateConfig`, `Policy` — configuration
/// - `RustGate` — per-conversation gate
/// - `StepResult`, `GateTrace` — results
/// - `KillswitchState`, `update_killswitch` — offline killswitch replay
/// - `cloak_thresholds`, `redact_text`, `seal_append` — audit surfaces
#[pymodule]
fn reams_gate(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGateConfig>()?;
    m.add_class::<PyPolicy>()?;
    m.add_class::<PyStepResult>()?;
    m.add_class::<PyGateTrace>()?;
    m.add_class::<PyGate>()?;
    m.add_class::<PyKillswitchState>()?;
    m.add_function(wrap_pyfunction!(update_killswitch, m)?)?;
    m.add_function(wrap_pyfunction!(integrity_floor_check, m)?)?;
    m.add_function(wrap_pyfunction!(redact_text, m)?)?;
    m.add_function(wrap_pyfunction!(cloak_thresholds, m)?)?;
    m.add_function(wrap_pyfunction!(seal_append, m)?)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Decision Engine
// ─────────────────────────────────────────────────────────────────────
//! Step-level admission gate with hysteresis, self-repair and a
//! killswitch.
//!
//! Two entry points:
//! - `Gate` — single-owner engine, `step(&mut self, ..)`.
//! - `SharedGate` — the same engine behind a `parking_lot::Mutex` for
//!   deployments that share one session across threads.

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use reams_types::{GateConfig, GateTrace, Policy, StepResult, Verdict, HIBERNATE_REASON};

use crate::composite::{admission_score, admits, integrity_floor_check, suspicion_ratio};
use crate::killswitch::{AlertMonitor, KillswitchState, StepObservation};
use crate::lexical::TermFrequencies;
use crate::random::{RandomSource, SeededRandom};
use crate::signals::energy_signals;

/// Appended to a step that self-repair re-evaluates.
pub const REPAIR_SUFFIX: &str = " [clarified with evidence]";

/// Coherence and relevance boost per unit of `repair_gain`.
pub const REPAIR_BOOST_PER_GAIN: f64 = 0.1;

/// Accepted steps in order plus their running term-frequency vector.
///
/// Grows for the life of the gate. Deployments with very long sessions
/// should rotate gate instances; the core never prunes.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    steps: Vec<String>,
    terms: TermFrequencies,
}

impl ConversationHistory {
    pub fn append(&mut self, step: &str) {
        self.terms.absorb(step);
        self.steps.push(step.to_owned());
    }

    /// Accepted steps joined by single spaces.
    pub fn text(&self) -> String {
        self.steps.join(" ")
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn terms(&self) -> &TermFrequencies {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// All mutable per-session state, exclusively owned by one `Gate`.
#[derive(Debug, Clone, Default)]
pub struct GateState {
    history: ConversationHistory,
    fail_streak: u32,
    monitor: AlertMonitor,
}

impl GateState {
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn fail_streak(&self) -> u32 {
        self.fail_streak
    }

    pub fn monitor(&self) -> &AlertMonitor {
        &self.monitor
    }

    pub fn killswitch(&self) -> &KillswitchState {
        self.monitor.state()
    }

    pub fn is_hibernating(&self) -> bool {
        self.monitor.is_hibernating()
    }
}

/// Serializable view of a gate's counters for audit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSnapshot {
    pub accepted_steps: usize,
    pub fail_streak: u32,
    pub hibernating: bool,
    pub enforcement_enabled: bool,
    pub killswitch: KillswitchState,
}

/// Step admission gate for one conversation.
pub struct Gate {
    config: GateConfig,
    policy: Policy,
    state: GateState,
    rng: Box<dyn RandomSource>,
}

impl Gate {
    /// Gate with an entropy-seeded random source.
    pub fn new(config: GateConfig, policy: Policy) -> Self {
        Self::with_random(config, policy, SeededRandom::from_entropy())
    }

    /// Gate with an injected random source (repair trigger draws).
    pub fn with_random(
        config: GateConfig,
        policy: Policy,
        rng: impl RandomSource + 'static,
    ) -> Self {
        Self {
            config,
            policy,
            state: GateState::default(),
            rng: Box::new(rng),
        }
    }

    fn integrity_pass(&self, integrity: f64) -> bool {
        !self.policy.enforcement_enabled
            || integrity_floor_check(integrity, self.policy.integrity_floor)
    }

    fn admits(&self, admission: f64, suspicion: f64, integrity: f64) -> bool {
        admits(
            admission,
            suspicion,
            self.integrity_pass(integrity),
            self.config.admission_floor,
            self.config.suspicion_ceiling,
        )
    }

    fn repair_triggered(&mut self) -> bool {
        // No draw at all when repair is disabled.
        self.config.repair_probability > 0.0
            && self.rng.next_unit() < self.config.repair_probability
    }

    /// Gate one step against the prompt and accepted history.
    ///
    /// On a hibernating gate this returns HIBERNATE without scoring or
    /// touching any state.
    pub fn step(&mut self, prompt: &str, step_text: &str) -> StepResult {
        if self.state.is_hibernating() {
            return StepResult::hibernating(HIBERNATE_REASON);
        }

        let mut signals = energy_signals(self.state.history.terms(), prompt, step_text);
        let mut admission = admission_score(&signals, &self.config.weights);
        let mut suspicion = suspicion_ratio(step_text);

        let raw_pass = self.admits(admission, suspicion.ratio, suspicion.integrity);
        let mut verdict = if raw_pass {
            self.state.fail_streak = 0;
            Verdict::Allow
        } else {
            let forgiven = self.state.fail_streak < self.config.hysteresis_grace;
            self.state.fail_streak = self.state.fail_streak.saturating_add(1);
            if forgiven {
                log::debug!(
                    "raw failure {} forgiven (grace {})",
                    self.state.fail_streak,
                    self.config.hysteresis_grace
                );
                Verdict::Allow
            } else {
                Verdict::Deny
            }
        };

        let mut text = Cow::Borrowed(step_text);
        let mut repair_attempted = false;
        let mut repaired = false;
        if verdict == Verdict::Deny && self.repair_triggered() {
            repair_attempted = true;
            let boost = self.config.repair_gain * REPAIR_BOOST_PER_GAIN;
            signals.coherence = (signals.coherence + boost).min(1.0);
            signals.relevance = (signals.relevance + boost).min(1.0);
            let candidate = format!("{step_text}{REPAIR_SUFFIX}");
            admission = admission_score(&signals, &self.config.weights);
            suspicion = suspicion_ratio(&candidate);
            if self.admits(admission, suspicion.ratio, suspicion.integrity) {
                verdict = Verdict::Allow;
                repaired = true;
                log::info!("self-repair admitted step (ΔE_s {admission:.4})");
            }
            text = Cow::Owned(candidate);
        }

        if verdict == Verdict::Allow {
            self.state.history.append(&text);
        } else {
            log::warn!(
                "STEP DENIED. ΔE_s: {admission:.4} (floor {}), SR: {:.4} (ceiling {}), streak {}",
                self.config.admission_floor,
                suspicion.ratio,
                self.config.suspicion_ceiling,
                self.state.fail_streak
            );
        }

        let mut reason = None;
        if self.policy.enforcement_enabled {
            let obs = StepObservation {
                admission,
                suspicion: suspicion.ratio,
                compliance: signals.compliance,
                step_text: &text,
                verdict,
            };
            if let Some(trigger) =
                self.state
                    .monitor
                    .observe(&obs, &self.config, &self.policy.killswitch)
            {
                log::error!(">>> REAMS KILLSWITCH ENGAGED ({trigger}): GATE HIBERNATING <<<");
                verdict = Verdict::Hibernate;
                reason = Some(trigger.to_string());
            }
        }

        log::debug!(
            "step verdict={verdict} λ={:.4} φ={:.4} ℒ={:.4} γ={:.4} ΔE_s={admission:.4} SR={:.4} PRSI={:.4}",
            signals.coherence,
            signals.relevance,
            signals.compliance,
            signals.calibration,
            suspicion.ratio,
            suspicion.integrity
        );

        StepResult {
            verdict,
            signals,
            admission_score: admission,
            suspicion_ratio: suspicion.ratio,
            integrity: suspicion.integrity,
            repair_attempted,
            repaired,
            reason,
        }
    }

    /// Gate a sequence of steps, stopping at the first HIBERNATE.
    pub fn run_steps(&mut self, prompt: &str, steps: &[&str]) -> GateTrace {
        let mut trace = GateTrace::default();
        for (i, step) in steps.iter().enumerate() {
            let before = self.state.history.len();
            let result = self.step(prompt, step);
            if self.state.history.len() > before {
                if let Some(last) = self.state.history.steps().last() {
                    trace.admitted.push(last.clone());
                }
            }
            let verdict = result.verdict;
            let reason = result.reason.clone();
            trace.results.push(result);
            if verdict == Verdict::Hibernate {
                trace.halted = true;
                trace.halt_index = Some(i);
                trace.halt_reason = reason;
                break;
            }
        }
        trace
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_hibernating(&self) -> bool {
        self.state.is_hibernating()
    }

    pub fn history_text(&self) -> String {
        self.state.history.text()
    }

    pub fn snapshot(&self) -> GateSnapshot {
        GateSnapshot {
            accepted_steps: self.state.history.len(),
            fail_streak: self.state.fail_streak,
            hibernating: self.state.is_hibernating(),
            enforcement_enabled: self.policy.enforcement_enabled,
            killswitch: *self.state.killswitch(),
        }
    }
}

/// A `Gate` shared across threads. Each call holds the lock for the
/// whole pipeline, so steps on one session are serialized.
#[derive(Clone)]
pub struct SharedGate {
    inner: Arc<Mutex<Gate>>,
}

impl SharedGate {
    pub fn new(gate: Gate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(gate)),
        }
    }

    pub fn step(&self, prompt: &str, step_text: &str) -> StepResult {
        self.inner.lock().step(prompt, step_text)
    }

    pub fn run_steps(&self, prompt: &str, steps: &[&str]) -> GateTrace {
        self.inner.lock().run_steps(prompt, steps)
    }

    pub fn is_hibernating(&self) -> bool {
        self.inner.lock().is_hibernating()
    }

    pub fn history_text(&self) -> String {
        self.inner.lock().history_text()
    }

    pub fn snapshot(&self) -> GateSnapshot {
        self.inner.lock().snapshot()
    }
}

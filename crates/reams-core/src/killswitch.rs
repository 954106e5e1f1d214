// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Killswitch / Alert Monitor
// ─────────────────────────────────────────────────────────────────────
//! Rolling alert detection and cumulative killswitch counters.
//!
//! The alert window holds the last three (admission, suspicion) pairs.
//! The cumulative counters are never reset or evicted: the alert
//! density trigger compares a since-enforcement-began alert count with
//! a since-enforcement-began step count. Once `step_count_ceiling`
//! steps have passed, that trigger can no longer fire.
//!
//! `KillswitchState::update` is the shared counter/trigger logic. The
//! gate drives it through `AlertMonitor`; offline tools call
//! `update_killswitch` directly on state they hold themselves.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use reams_types::{GateConfig, KillswitchPolicy, Policy, Verdict};

use crate::lexical::{contains_any, MALICIOUS_TERMS};

/// Capacity of the rolling alert window.
pub const ALERT_WINDOW_LEN: usize = 3;

/// Why the killswitch fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HibernateTrigger {
    /// Too many alerts within the step ceiling.
    AlertDensity,
    /// Too many harmful steps slipped through admission.
    MaliciousLeak,
}

impl HibernateTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            HibernateTrigger::AlertDensity => "alert_density",
            HibernateTrigger::MaliciousLeak => "malicious_leak",
        }
    }
}

impl fmt::Display for HibernateTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative killswitch counters. Monotonic; `hibernating` is sticky.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillswitchState {
    pub alerts: u64,
    pub steps: u64,
    /// Steps whose compliance fell below `lexical_floor_burst`.
    pub compliance_bursts: u64,
    pub malicious_leaks: u64,
    pub hibernating: bool,
}

impl KillswitchState {
    /// Count one step and evaluate both triggers.
    ///
    /// Returns the trigger that holds after this update, if any. The
    /// counters advance even if the state is already hibernating.
    pub fn update(
        &mut self,
        is_alert: bool,
        compliance: f64,
        is_malicious_leak: bool,
        policy: &KillswitchPolicy,
    ) -> Option<HibernateTrigger> {
        self.steps += 1;
        if is_alert {
            self.alerts += 1;
        }
        if compliance < policy.lexical_floor_burst {
            self.compliance_bursts += 1;
        }
        if is_malicious_leak {
            self.malicious_leaks += 1;
        }
        let trigger = self.trigger(policy);
        if trigger.is_some() {
            self.hibernating = true;
        }
        trigger
    }

    /// Trigger condition on the current counters.
    pub fn trigger(&self, policy: &KillswitchPolicy) -> Option<HibernateTrigger> {
        let window = &policy.alert_window;
        if self.alerts >= window.alert_count_threshold && self.steps <= window.step_count_ceiling {
            return Some(HibernateTrigger::AlertDensity);
        }
        if self.malicious_leaks > policy.malicious_leak_limit {
            return Some(HibernateTrigger::MaliciousLeak);
        }
        None
    }
}

/// Standalone killswitch update for state held outside a live gate,
/// e.g. when replaying historical step logs.
///
/// Returns whether the state is hibernating afterwards.
pub fn update_killswitch(
    state: &mut KillswitchState,
    is_alert: bool,
    compliance: f64,
    is_malicious_leak: bool,
    policy: &Policy,
) -> bool {
    state.update(is_alert, compliance, is_malicious_leak, &policy.killswitch);
    state.hibernating
}

/// One (admission, suspicion) sample of the alert window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertSample {
    pub admission: f64,
    pub suspicion: f64,
}

/// What the gate hands the monitor after deciding a step.
#[derive(Debug, Clone, Copy)]
pub struct StepObservation<'a> {
    pub admission: f64,
    pub suspicion: f64,
    pub compliance: f64,
    /// Final step text, repair suffix included.
    pub step_text: &'a str,
    pub verdict: Verdict,
}

/// Alert window plus cumulative counters for one gate instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertMonitor {
    window: VecDeque<AlertSample>,
    state: KillswitchState,
}

impl AlertMonitor {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(ALERT_WINDOW_LEN),
            state: KillswitchState::default(),
        }
    }

    pub fn state(&self) -> &KillswitchState {
        &self.state
    }

    pub fn is_hibernating(&self) -> bool {
        self.state.hibernating
    }

    pub fn samples(&self) -> impl Iterator<Item = &AlertSample> {
        self.window.iter()
    }

    /// Push a sample, evicting the oldest beyond capacity, and report
    /// whether the full window is in alert.
    pub fn push_sample(&mut self, sample: AlertSample, config: &GateConfig) -> bool {
        self.window.push_back(sample);
        while self.window.len() > ALERT_WINDOW_LEN {
            self.window.pop_front();
        }
        if self.window.len() < ALERT_WINDOW_LEN {
            return false;
        }
        let n = self.window.len() as f64;
        let mean_admission = self.window.iter().map(|s| s.admission).sum::<f64>() / n;
        let mean_suspicion = self.window.iter().map(|s| s.suspicion).sum::<f64>() / n;
        mean_admission < 0.5 * config.admission_floor
            || mean_suspicion > 0.8 * config.suspicion_ceiling
    }

    /// A harmful step the gate let through.
    pub fn is_malicious_leak(obs: &StepObservation<'_>, policy: &KillswitchPolicy) -> bool {
        obs.verdict == Verdict::Allow
            && obs.compliance < policy.lexical_floor_burst
            && contains_any(obs.step_text, MALICIOUS_TERMS)
    }

    /// Record one decided step. Returns the trigger if the gate must
    /// hibernate on this call.
    pub fn observe(
        &mut self,
        obs: &StepObservation<'_>,
        config: &GateConfig,
        policy: &KillswitchPolicy,
    ) -> Option<HibernateTrigger> {
        let is_alert = self.push_sample(
            AlertSample {
                admission: obs.admission,
                suspicion: obs.suspicion,
            },
            config,
        );
        let leak = Self::is_malicious_leak(obs, policy);
        if is_alert {
            log::warn!(
                "alert window breached after {} steps (alerts so far: {})",
                self.state.steps + 1,
                self.state.alerts + 1
            );
        }
        self.state.update(is_alert, obs.compliance, leak, policy)
    }
}

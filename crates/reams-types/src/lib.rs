// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, policy and error hierarchy for the
//! REAMS step gate.

pub mod config;
pub mod error;
pub mod score;

pub use config::{AlertWindow, EnergyWeights, GateConfig, KillswitchPolicy, Policy};
pub use error::{ReamsError, ReamsResult};
pub use score::{
    clamp_score, EnergySignals, GateTrace, StepResult, SuspicionScore, SuspicionSignals, Verdict,
    HIBERNATE_REASON,
};

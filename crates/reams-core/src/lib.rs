// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Lexical scoring, step admission and killswitch for gating the
//! reasoning steps of an automated agent.
//!
//! Pipeline per step: `lexical` → `signals` → `composite` → `gate`,
//! with `killswitch` observing the gate's scores when enforcement is on.
//!
//! # Safety Invariants
//!
//! 1. **Hibernation is terminal**: once the killswitch fires, every
//!    later `Gate::step` returns HIBERNATE without scoring and without
//!    mutating history, streak, window or counters. Nothing clears it.
//!
//! 2. **Scoring never fails**: empty texts score 0 and every division
//!    is ε-guarded, so `step` is infallible and never yields NaN.
//!
//! 3. **History only grows on ALLOW**: denied steps never influence the
//!    coherence of later steps.
//!
//! 4. **Repair is the only random branch**: with
//!    `repair_probability = 0` the random source is never consulted and
//!    verdicts are a pure function of the inputs and prior state.

pub mod composite;
pub mod gate;
pub mod killswitch;
pub mod lexical;
pub mod random;
pub mod signals;

pub use composite::{admission_score, integrity_floor_check, suspicion_ratio};
pub use gate::{ConversationHistory, Gate, GateSnapshot, GateState, SharedGate};
pub use killswitch::{update_killswitch, AlertMonitor, HibernateTrigger, KillswitchState};
pub use lexical::{term_frequencies, tokenize, TermFrequencies};
pub use random::{ExternalRandom, RandomSource, SeededRandom, SequenceRandom};

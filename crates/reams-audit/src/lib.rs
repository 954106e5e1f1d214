// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Audit Surfaces
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Outer surfaces around the gate: threshold cloaking for published
//! configs, PII redaction for logged step text, and an append-only
//! sealed audit ledger.

pub mod cloak;
pub mod redact;
pub mod seal;

pub use cloak::{cloak_threshold, cloak_thresholds, CloakResult, CloakedThreshold, PublicBand};
pub use redact::{redact_text, redact_with_summary, RedactionSummary};
pub use seal::{
    canonical_json, content_digest, read_seals, seal_append, step_metadata, verify_seal,
    SealRecord,
};

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Sealed Audit Ledger
// ─────────────────────────────────────────────────────────────────────
//! Append-only seal log. Each seal binds a SHA-256 digest of the ledger
//! file (or, when the ledger cannot be read, of the metadata itself) to
//! a timestamp and caller metadata, written as one JSON line.
//!
//! Metadata is hashed in canonical form: compact JSON with object keys
//! sorted, so equal metadata always yields the same digest.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use reams_core::GateSnapshot;
use reams_types::{ReamsError, ReamsResult, StepResult};

use crate::redact::redact_text;

/// One line of the seal log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealRecord {
    /// Seconds since the Unix epoch.
    #[serde(rename = "ts")]
    pub timestamp: u64,
    #[serde(rename = "ledger")]
    pub ledger_path: String,
    /// Lowercase hex SHA-256.
    #[serde(rename = "sha256")]
    pub digest: String,
    #[serde(rename = "meta")]
    pub metadata: Value,
}

/// Compact JSON with sorted object keys.
///
/// `serde_json::Map` is ordered by key unless `preserve_order` is
/// enabled, which this workspace never does.
pub fn canonical_json(value: &Value) -> ReamsResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Digest of the ledger contents, or of the metadata when the ledger
/// does not exist.
pub fn content_digest(ledger_path: &Path, metadata: &Value) -> ReamsResult<String> {
    match fs::read(ledger_path) {
        Ok(bytes) => Ok(sha256_hex(&bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!(
                "ledger {} not found, sealing metadata digest",
                ledger_path.display()
            );
            Ok(sha256_hex(&canonical_json(metadata)?))
        }
        Err(e) => Err(ReamsError::Io(e)),
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Seal `ledger_path` and append the record to `seal_log`.
pub fn seal_append(
    ledger_path: impl AsRef<Path>,
    metadata: &Value,
    seal_log: impl AsRef<Path>,
) -> ReamsResult<SealRecord> {
    let ledger_path = ledger_path.as_ref();
    let seal_log = seal_log.as_ref();

    let record = SealRecord {
        timestamp: unix_seconds(),
        ledger_path: ledger_path.to_string_lossy().into_owned(),
        digest: content_digest(ledger_path, metadata)?,
        metadata: metadata.clone(),
    };

    if let Some(parent) = seal_log.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut line = serde_json::to_string(&record)?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(seal_log)?;
    file.write_all(line.as_bytes())?;

    log::info!(
        "sealed {} sha256={} -> {}",
        record.ledger_path,
        record.digest,
        seal_log.display()
    );
    Ok(record)
}

/// All records in a seal log, in append order. Blank lines are skipped.
pub fn read_seals(seal_log: impl AsRef<Path>) -> ReamsResult<Vec<SealRecord>> {
    let content = fs::read_to_string(seal_log)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| ReamsError::Seal(format!("line {}: {e}", i + 1)))
        })
        .collect()
}

/// Whether `record.digest` still matches the ledger (or its metadata).
pub fn verify_seal(record: &SealRecord) -> ReamsResult<bool> {
    let current = content_digest(Path::new(&record.ledger_path), &record.metadata)?;
    let ok = current == record.digest;
    if !ok {
        log::warn!("seal mismatch for {}", record.ledger_path);
    }
    Ok(ok)
}

/// Audit metadata for one gated step. The step text is redacted.
pub fn step_metadata(
    step_text: &str,
    result: &StepResult,
    snapshot: Option<&GateSnapshot>,
) -> ReamsResult<Value> {
    let mut meta = json!({
        "step": redact_text(step_text),
        "verdict": result.verdict,
        "admission_score": result.admission_score,
        "suspicion_ratio": result.suspicion_ratio,
        "integrity": result.integrity,
        "repair_attempted": result.repair_attempted,
        "repaired": result.repaired,
        "reason": result.reason,
    });
    if let Some(snapshot) = snapshot {
        meta["gate"] = serde_json::to_value(snapshot)?;
    }
    Ok(meta)
}

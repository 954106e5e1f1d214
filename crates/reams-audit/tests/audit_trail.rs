// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Audit Trail Integration
// ─────────────────────────────────────────────────────────────────────

use std::fs::OpenOptions;
use std::io::Write;

use reams_audit::{
    cloak_thresholds, read_seals, redact_text, seal_append, step_metadata, verify_seal,
};
use reams_core::{Gate, SeededRandom, SequenceRandom};
use reams_types::{GateConfig, Policy};

const PROMPT: &str = "How should the cache invalidate stale entries after a deploy?";

#[test]
fn test_gated_session_sealed_and_verified() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.jsonl");
    let seal_log = dir.path().join("seal.log");

    let mut gate = Gate::with_random(
        GateConfig::default(),
        Policy::default(),
        SequenceRandom::constant(0.5),
    );
    let steps = [
        "The cache should invalidate stale entries after a deploy, says ops@example.com.",
        "zzz qqq",
    ];
    for step in steps {
        let result = gate.step(PROMPT, step);
        let snapshot = gate.snapshot();
        let meta = step_metadata(step, &result, Some(&snapshot)).unwrap();
        assert!(!meta["step"].as_str().unwrap().contains("ops@example.com"));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&ledger)
            .unwrap();
        writeln!(file, "{meta}").unwrap();
        seal_append(&ledger, &meta, &seal_log).unwrap();
    }

    let seals = read_seals(&seal_log).unwrap();
    assert_eq!(seals.len(), 2);
    // Only the latest seal matches the ledger as it stands now.
    assert!(!verify_seal(&seals[0]).unwrap());
    assert!(verify_seal(&seals[1]).unwrap());
}

#[test]
fn test_cloaked_config_drives_gate() {
    let config = GateConfig::default();
    let mut rng = SeededRandom::seed(9);
    let cloak = cloak_thresholds(&config, 0.1, 0.1, &mut rng);
    assert!(cloak.admission_floor.public_band.contains(0.5));
    assert!(cloak.suspicion_ceiling.public_band.contains(2.0));

    let mut gate = Gate::new(cloak.apply(&config), Policy::default());
    assert_eq!(
        gate.config().admission_floor,
        cloak.admission_floor.private
    );
    let _ = gate.step(PROMPT, "Bump the version key after each deploy.");
}

#[test]
fn test_redaction_is_idempotent() {
    let once = redact_text("ssn 123-45-6789, acct 123456789012, me@x.io");
    assert_eq!(redact_text(&once), once);
}

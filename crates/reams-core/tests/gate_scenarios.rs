// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate End-to-End Scenarios
// ─────────────────────────────────────────────────────────────────────

use reams_core::{update_killswitch, Gate, KillswitchState, SeededRandom, SequenceRandom};
use reams_types::{
    AlertWindow, EnergyWeights, GateConfig, KillswitchPolicy, Policy, Verdict, HIBERNATE_REASON,
};

const PROMPT: &str = "How should the cache invalidate stale entries after a deploy?";

const STEPS: &[&str] = &[
    "The cache should invalidate stale entries after a deploy by bumping a version key.",
    "According to the Redis docs [1], a version key makes stale entries unreachable.",
    "zzz qqq",
    "Bumping the version key after a deploy leaves stale entries to expire by TTL.",
    "It will always work and can never fail, guaranteed.",
    "",
];

fn enforcing(k: u64, ceiling: u64, leak_limit: u64) -> Policy {
    Policy {
        enforcement_enabled: true,
        integrity_floor: 0.0,
        killswitch: KillswitchPolicy {
            lexical_floor_burst: 0.5,
            alert_window: AlertWindow {
                alert_count_threshold: k,
                step_count_ceiling: ceiling,
            },
            malicious_leak_limit: leak_limit,
        },
    }
}

#[test]
fn test_fox_denied_on_empty_history() {
    let config = GateConfig {
        admission_floor: 0.5,
        suspicion_ceiling: 2.0,
        hysteresis_grace: 0,
        repair_probability: 0.0,
        repair_gain: 1.0,
        weights: EnergyWeights::uniform(1.0),
    };
    let mut gate = Gate::new(config, Policy::default());
    let r = gate.step("the quick brown fox", "the quick brown fox");
    assert_eq!(r.verdict, Verdict::Deny);
    assert_eq!(r.signals.coherence, 0.0);
}

#[test]
fn test_results_bounded_for_realistic_session() {
    let mut gate = Gate::with_random(
        GateConfig {
            hysteresis_grace: 1,
            repair_probability: 0.5,
            ..GateConfig::default()
        },
        Policy::default(),
        SeededRandom::seed(11),
    );
    for step in STEPS {
        let r = gate.step(PROMPT, step);
        for v in [
            r.signals.coherence,
            r.signals.relevance,
            r.signals.compliance,
            r.signals.calibration,
            r.integrity,
        ] {
            assert!((0.0..=1.0).contains(&v), "{step}: {v}");
        }
        assert!(r.admission_score.is_finite() && r.admission_score >= 0.0);
        assert!(r.suspicion_ratio.is_finite() && r.suspicion_ratio > 0.0);
    }
}

#[test]
fn test_same_seed_same_verdicts() {
    let config = GateConfig {
        hysteresis_grace: 0,
        repair_probability: 0.5,
        repair_gain: 4.0,
        ..GateConfig::default()
    };
    let run = |seed| {
        let mut gate = Gate::with_random(config.clone(), Policy::default(), SeededRandom::seed(seed));
        STEPS
            .iter()
            .map(|s| gate.step(PROMPT, s))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(3), run(3));
}

#[test]
fn test_repair_disabled_ignores_random_source() {
    let config = GateConfig {
        hysteresis_grace: 1,
        repair_probability: 0.0,
        repair_gain: 10.0,
        ..GateConfig::default()
    };
    let verdicts = |rng: SequenceRandom| {
        let mut gate = Gate::with_random(config.clone(), Policy::default(), rng);
        STEPS
            .iter()
            .map(|s| gate.step(PROMPT, s).verdict)
            .collect::<Vec<_>>()
    };
    assert_eq!(
        verdicts(SequenceRandom::constant(0.0)),
        verdicts(SequenceRandom::constant(0.99))
    );
}

#[test]
fn test_history_is_admitted_steps_in_order() {
    let mut gate = Gate::new(
        GateConfig {
            hysteresis_grace: 1,
            ..GateConfig::default()
        },
        Policy::default(),
    );
    let mut admitted = Vec::new();
    for step in STEPS {
        if gate.step(PROMPT, step).verdict == Verdict::Allow {
            admitted.push(*step);
        }
    }
    assert_eq!(gate.history_text(), admitted.join(" "));
}

#[test]
fn test_sustained_garbage_hibernates_and_freezes() {
    let mut gate = Gate::new(GateConfig::default(), enforcing(1, 10, 100));
    let trace = gate.run_steps(PROMPT, &["zzz", "qqq", "xxx", "yyy"]);
    assert!(trace.halted);
    assert_eq!(trace.halt_index, Some(2));
    assert_eq!(trace.results[2].verdict, Verdict::Hibernate);

    let frozen = gate.snapshot();
    let after = gate.step(PROMPT, STEPS[0]);
    assert_eq!(after.verdict, Verdict::Hibernate);
    assert_eq!(after.reason.as_deref(), Some(HIBERNATE_REASON));
    assert_eq!(gate.snapshot(), frozen);
}

#[test]
fn test_offline_replay_matches_live_monitor() {
    // Replaying the live gate's per-step alert flags through the
    // standalone updater reproduces the live counters.
    let policy = enforcing(2, 50, 100);
    let mut gate = Gate::new(GateConfig::default(), policy);
    let mut offline = KillswitchState::default();
    let texts = ["zzz", "qqq", "xxx", "yyy", "www"];
    let mut last_alerts = 0;
    for text in texts {
        let r = gate.step(PROMPT, text);
        let live = *gate.state().killswitch();
        let is_alert = live.alerts > last_alerts;
        last_alerts = live.alerts;
        update_killswitch(&mut offline, is_alert, r.signals.compliance, false, &policy);
        assert_eq!(offline.alerts, live.alerts);
        assert_eq!(offline.steps, live.steps);
        assert_eq!(offline.hibernating, live.hibernating);
        if live.hibernating {
            break;
        }
    }
    assert!(offline.hibernating);
}

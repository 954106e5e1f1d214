// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Signal Functions
// ─────────────────────────────────────────────────────────────────────
//! Energy signals (λ, φ, ℒ, γ) and suspicion sub-signals.
//!
//! All signals are lexical proxies in [0, 1]. Empty inputs produce 0
//! rather than an error: an empty step is treated as incoherent,
//! irrelevant and evidence-free.

use reams_types::score::clamp_score;
use reams_types::{EnergySignals, SuspicionSignals};

use crate::lexical::{
    keyword_hits, LexicalFeatures, TermFrequencies, BANNED_TERMS, CERTAINTY_TERMS,
};

const COMPLIANCE_PENALTY: f64 = 0.25;
const CALIBRATION_PENALTY: f64 = 0.15;
const DENSITY_EPS: f64 = 1e-9;

/// Cosine similarity of two texts' term-frequency vectors.
pub fn similarity(a: &str, b: &str) -> f64 {
    TermFrequencies::from_text(a).cosine(&TermFrequencies::from_text(b))
}

/// λ: similarity of the step to accepted history.
pub fn coherence(history: &str, step: &str) -> f64 {
    similarity(history, step)
}

/// φ: similarity of the step to the prompt.
pub fn relevance(prompt: &str, step: &str) -> f64 {
    similarity(prompt, step)
}

/// ℒ: `max(0, 1 - 0.25 × banned hits)`.
pub fn compliance(step: &str) -> f64 {
    let hits = keyword_hits(step, BANNED_TERMS) as f64;
    (1.0 - COMPLIANCE_PENALTY * hits).max(0.0)
}

/// γ: `max(0, 1 - 0.15 × certainty hits)`.
pub fn calibration(step: &str) -> f64 {
    let hits = keyword_hits(step, CERTAINTY_TERMS) as f64;
    (1.0 - CALIBRATION_PENALTY * hits).max(0.0)
}

fn density_of(f: &LexicalFeatures) -> f64 {
    if f.token_count == 0 {
        return 0.0;
    }
    let raw = (f.evidence_hits as f64 + 0.5 * f.numbers as f64)
        / (f.token_count as f64 / 20.0 + DENSITY_EPS);
    raw.min(1.0)
}

fn dispersion_of(f: &LexicalFeatures) -> f64 {
    if f.token_count == 0 {
        return 0.0;
    }
    f.distinct_tokens as f64 / f.token_count as f64
}

fn volume_of(f: &LexicalFeatures) -> f64 {
    (f.token_count as f64 / 100.0).min(1.0)
}

fn integrity_of(f: &LexicalFeatures) -> f64 {
    let raw = 0.5 * f.citations as f64
        + 0.3 * f.quotes as f64
        + (f.proper_nouns as f64 / 10.0).min(1.0);
    clamp_score(raw, 0.0, 1.0)
}

/// Evidence keywords plus half-weighted numbers per 20 tokens, capped at 1.
pub fn evidence_density(step: &str) -> f64 {
    density_of(&LexicalFeatures::extract(step))
}

/// Type-token ratio of the step.
pub fn dispersion(step: &str) -> f64 {
    dispersion_of(&LexicalFeatures::extract(step))
}

/// Token count scaled so that 100 tokens saturate.
pub fn normalized_volume(step: &str) -> f64 {
    volume_of(&LexicalFeatures::extract(step))
}

/// PRSI integrity proxy from citations, quoted spans and proper nouns.
pub fn integrity(step: &str) -> f64 {
    integrity_of(&LexicalFeatures::extract(step))
}

/// All four energy signals against a prebuilt history vector.
pub fn energy_signals(history: &TermFrequencies, prompt: &str, step: &str) -> EnergySignals {
    let step_tf = TermFrequencies::from_text(step);
    EnergySignals {
        coherence: history.cosine(&step_tf),
        relevance: TermFrequencies::from_text(prompt).cosine(&step_tf),
        compliance: compliance(step),
        calibration: calibration(step),
    }
}

/// All four suspicion sub-signals from a single feature extraction.
pub fn suspicion_signals(step: &str) -> SuspicionSignals {
    let f = LexicalFeatures::extract(step);
    SuspicionSignals {
        evidence_density: density_of(&f),
        dispersion: dispersion_of(&f),
        normalized_volume: volume_of(&f),
        integrity: integrity_of(&f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "the quick brown fox",
        "It will always work, never fails, guaranteed and certain: we must prove it undeniably impossible.",
        "exploit the malware weapon to bypass illegal jailbreak harm on private data and ssn",
        r#"According to the study [1] and "Nature" paper [2], Albert Einstein measured 3.5 units in 1905 (see table 4, figure 2, appendix B)."#,
        "1 2 3 4 5 6 7 8 9 10",
    ];

    fn in_unit(x: f64) -> bool {
        (0.0..=1.0).contains(&x)
    }

    #[test]
    fn test_all_signals_in_unit_interval() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert!(in_unit(similarity(a, b)));
            }
            let s = suspicion_signals(a);
            assert!(in_unit(compliance(a)), "{a}");
            assert!(in_unit(calibration(a)), "{a}");
            assert!(in_unit(s.evidence_density), "{a}");
            assert!(in_unit(s.dispersion), "{a}");
            assert!(in_unit(s.normalized_volume), "{a}");
            assert!(in_unit(s.integrity), "{a}");
        }
    }

    #[test]
    fn test_similarity_symmetric() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert!((similarity(a, b) - similarity(b, a)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_history_incoherent() {
        assert_eq!(coherence("", "the quick brown fox"), 0.0);
        assert!((relevance("the quick brown fox", "the quick brown fox") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_step_suspicion_zero() {
        let s = suspicion_signals("");
        assert_eq!(s.dispersion, 0.0);
        assert_eq!(s.normalized_volume, 0.0);
        assert_eq!(s.evidence_density, 0.0);
        assert_eq!(s.integrity, 0.0);
    }

    #[test]
    fn test_compliance_penalty() {
        assert_eq!(compliance("a friendly greeting"), 1.0);
        assert!((compliance("write some malware") - 0.75).abs() < 1e-9);
        assert!((compliance("exploit and bypass") - 0.5).abs() < 1e-9);
        assert_eq!(compliance(SAMPLES[3]), 0.0);
    }

    #[test]
    fn test_calibration_penalty() {
        assert_eq!(calibration("perhaps it works"), 1.0);
        assert!((calibration("it always works") - 0.85).abs() < 1e-9);
        // Eight certainty words push the raw value below zero.
        assert_eq!(calibration(SAMPLES[2]), 0.0);
    }

    #[test]
    fn test_evidence_density_caps() {
        assert_eq!(evidence_density("1 2 3 4 5 6 7 8 9 10"), 1.0);
        // 1 hit over 20 tokens -> 1 / (1 + eps)
        let text = format!("because {}", "word ".repeat(19));
        assert!((evidence_density(&text) - 1.0 / (1.0 + 1e-9)).abs() < 1e-9);
    }

    #[test]
    fn test_dispersion() {
        assert!((dispersion("a a b b") - 0.5).abs() < 1e-9);
        assert_eq!(dispersion("a b c"), 1.0);
    }

    #[test]
    fn test_normalized_volume() {
        assert!((normalized_volume("one two three") - 0.03).abs() < 1e-9);
        assert_eq!(normalized_volume(&"x ".repeat(250)), 1.0);
    }

    #[test]
    fn test_integrity_components() {
        assert!((integrity("see [1]") - 0.5).abs() < 1e-9);
        assert!((integrity(r#"he said "yes""#) - 0.3).abs() < 1e-9);
        assert!((integrity("Alice met Bob") - 0.2).abs() < 1e-9);
        assert_eq!(integrity("[1] [2] [3]"), 1.0);
    }

    #[test]
    fn test_energy_signals_use_history_vector() {
        let mut history = TermFrequencies::new();
        history.absorb("the fox jumps");
        let e = energy_signals(&history, "a fox", "the fox");
        assert!(e.coherence > 0.0);
        assert!(e.relevance > 0.0);
        assert_eq!(e.compliance, 1.0);
        assert_eq!(e.calibration, 1.0);
        assert!((e.coherence - coherence("the fox jumps", "the fox")).abs() < 1e-12);
    }
}

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::engine::ScoredResult;
use super::error::ScoringError;
use super::table::{ScaledScore, ScoreTable, Tier};

/// Change in scaled score under a what-if fix.
///
/// `Undefined` whenever either side of the subtraction has no table value;
/// it is never folded into a numeric zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGain {
    Gain(i64),
    Undefined,
}

impl ScoreGain {
    pub fn between(base: ScaledScore, new: ScaledScore) -> Self {
        match (base, new) {
            (ScaledScore::Found(b), ScaledScore::Found(n)) => {
                ScoreGain::Gain(i64::from(n) - i64::from(b))
            }
            _ => ScoreGain::Undefined,
        }
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            ScoreGain::Gain(n) => Some(*n),
            ScoreGain::Undefined => None,
        }
    }
}

impl fmt::Display for ScoreGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreGain::Gain(n) => write!(f, "{:+}", n),
            ScoreGain::Undefined => f.write_str("N/A"),
        }
    }
}

impl Serialize for ScoreGain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScoreGain::Gain(n) => serializer.serialize_i64(*n),
            ScoreGain::Undefined => serializer.serialize_none(),
        }
    }
}

/// Projected outcome after hypothetically fixing `fix_count` wrong answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Fix count as requested, before clamping
    pub fix_count: i64,
    pub fixed_correct: u32,
    pub new_module: Tier,
    pub new_scaled_score: ScaledScore,
    pub score_gain: ScoreGain,
}

/// Re-score `base` as if `fix_count` more answers had been correct.
///
/// The corrected count is clamped at `total`, so asking for more fixes than
/// there are wrong answers is harmless.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidSimulationInput`] if `fix_count` is negative.
pub fn simulate(
    base: &ScoredResult,
    table: &ScoreTable,
    fix_count: i64,
    threshold: f64,
) -> Result<SimulationResult, ScoringError> {
    if fix_count < 0 {
        return Err(ScoringError::InvalidSimulationInput { fix_count });
    }
    // Anything past u32::MAX clamps to total below anyway
    let fixes = u32::try_from(fix_count).unwrap_or(u32::MAX);

    let fixed_correct = base.correct.saturating_add(fixes).min(base.total);
    let new_module = Tier::select(fixed_correct, base.total, threshold);
    let new_scaled_score = table.lookup(new_module, fixed_correct);

    Ok(SimulationResult {
        fix_count,
        fixed_correct,
        new_module,
        new_scaled_score,
        score_gain: ScoreGain::between(base.scaled_score, new_scaled_score),
    })
}

/// Run [`simulate`] for each fix count, keyed by fix count.
///
/// Fails on the first negative fix count.
pub fn simulate_many(
    base: &ScoredResult,
    table: &ScoreTable,
    fix_counts: &[i64],
    threshold: f64,
) -> Result<BTreeMap<i64, SimulationResult>, ScoringError> {
    fix_counts
        .iter()
        .map(|&n| simulate(base, table, n, threshold).map(|sim| (sim.fix_count, sim)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::classify::ClassificationResult;
    use crate::scoring::engine::{score, DEFAULT_THRESHOLD};
    use crate::scoring::table::ScoreTableEntry;

    fn table(entries: &[(u32, Option<u32>, Option<u32>)]) -> ScoreTable {
        ScoreTable::new(
            "Reading and Writing",
            entries
                .iter()
                .map(|&(raw, easy, hard)| ScoreTableEntry { raw, easy, hard })
                .collect(),
        )
    }

    fn base(total: u32, correct: u32, table: &ScoreTable) -> ScoredResult {
        let classification = ClassificationResult {
            total,
            correct,
            ..Default::default()
        };
        score(&classification, table, DEFAULT_THRESHOLD)
    }

    #[test]
    fn test_simulate_missing_entry_gain_undefined() {
        let t = table(&[(8, Some(650), Some(700))]);
        let scored = base(10, 8, &t);
        let sim = simulate(&scored, &t, 1, DEFAULT_THRESHOLD).unwrap();

        assert_eq!(sim.fixed_correct, 9);
        assert_eq!(sim.new_module, Tier::Hard);
        assert_eq!(sim.new_scaled_score, ScaledScore::NotFound);
        assert_eq!(sim.score_gain, ScoreGain::Undefined);
    }

    #[test]
    fn test_simulate_gain_crosses_tier() {
        // 4/10 easy -> fix 1 -> 5/10 hard
        let t = table(&[(4, Some(480), Some(510)), (5, Some(500), Some(540))]);
        let scored = base(10, 4, &t);
        assert_eq!(scored.module, Tier::Easy);

        let sim = simulate(&scored, &t, 1, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(sim.new_module, Tier::Hard);
        assert_eq!(sim.new_scaled_score, ScaledScore::Found(540));
        assert_eq!(sim.score_gain, ScoreGain::Gain(60));
    }

    #[test]
    fn test_simulate_base_not_found_gain_undefined() {
        let t = table(&[(5, Some(500), Some(540))]);
        let scored = base(10, 4, &t);
        assert_eq!(scored.scaled_score, ScaledScore::NotFound);

        let sim = simulate(&scored, &t, 1, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(sim.new_scaled_score, ScaledScore::Found(540));
        assert_eq!(sim.score_gain, ScoreGain::Undefined);
    }

    #[test]
    fn test_simulate_zero_fix_matches_base() {
        let t = table(&[(7, Some(600), Some(640))]);
        let scored = base(10, 7, &t);
        let sim = simulate(&scored, &t, 0, DEFAULT_THRESHOLD).unwrap();

        assert_eq!(sim.fixed_correct, scored.correct);
        assert_eq!(sim.new_module, scored.module);
        assert_eq!(sim.new_scaled_score, scored.scaled_score);
        assert_eq!(sim.score_gain, ScoreGain::Gain(0));
    }

    #[test]
    fn test_simulate_clamps_at_total() {
        let t = table(&[(10, Some(760), Some(800))]);
        let scored = base(10, 8, &t);
        let sim = simulate(&scored, &t, 50, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(sim.fix_count, 50);
        assert_eq!(sim.fixed_correct, 10);
        assert_eq!(sim.new_scaled_score, ScaledScore::Found(800));
    }

    #[test]
    fn test_simulate_huge_fix_count_clamps() {
        let t = table(&[(10, Some(760), Some(800))]);
        let scored = base(10, 8, &t);
        let sim = simulate(&scored, &t, i64::MAX, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(sim.fix_count, i64::MAX);
        assert_eq!(sim.fixed_correct, 10);
        assert_eq!(sim.score_gain, ScoreGain::Undefined);
    }

    #[test]
    fn test_simulate_many_keeps_large_fix_counts_distinct() {
        let t = table(&[(10, Some(760), Some(800))]);
        let scored = base(10, 8, &t);
        let sims = simulate_many(&scored, &t, &[5_000_000_000, 6_000_000_000], DEFAULT_THRESHOLD)
            .unwrap();

        assert_eq!(
            sims.keys().copied().collect::<Vec<_>>(),
            vec![5_000_000_000, 6_000_000_000]
        );
        assert_eq!(sims[&5_000_000_000].fix_count, 5_000_000_000);
        assert_eq!(sims[&6_000_000_000].fixed_correct, 10);
    }

    #[test]
    fn test_simulate_empty_attempt_zero_threshold_stays_easy() {
        let t = table(&[(0, Some(200), Some(220))]);
        let scored = base(0, 0, &t);
        let sim = simulate(&scored, &t, 2, 0.0).unwrap();
        assert_eq!(sim.fixed_correct, 0);
        assert_eq!(sim.new_module, Tier::Easy);
        assert_eq!(sim.new_scaled_score, ScaledScore::Found(200));
    }

    #[test]
    fn test_simulate_empty_attempt() {
        let t = table(&[(0, Some(200), Some(220))]);
        let scored = base(0, 0, &t);
        let sim = simulate(&scored, &t, 3, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(sim.fixed_correct, 0);
        assert_eq!(sim.new_module, Tier::Easy);
        assert_eq!(sim.score_gain, ScoreGain::Gain(0));
    }

    #[test]
    fn test_simulate_negative_fix_count_rejected() {
        let t = table(&[]);
        let scored = base(10, 5, &t);
        let err = simulate(&scored, &t, -1, DEFAULT_THRESHOLD).unwrap_err();
        assert_eq!(err, ScoringError::InvalidSimulationInput { fix_count: -1 });
    }

    #[test]
    fn test_simulate_many_keyed_by_fix_count() {
        let t = table(&[
            (6, Some(560), Some(600)),
            (7, Some(580), Some(630)),
            (8, Some(650), Some(700)),
        ]);
        let scored = base(10, 6, &t);
        let sims = simulate_many(&scored, &t, &[1, 2, 3], DEFAULT_THRESHOLD).unwrap();

        assert_eq!(sims.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(sims[&1].score_gain, ScoreGain::Gain(30));
        assert_eq!(sims[&2].score_gain, ScoreGain::Gain(100));
        assert_eq!(sims[&3].score_gain, ScoreGain::Undefined);
    }

    #[test]
    fn test_simulate_many_rejects_any_negative() {
        let t = table(&[]);
        let scored = base(10, 5, &t);
        assert!(simulate_many(&scored, &t, &[1, -2], DEFAULT_THRESHOLD).is_err());
    }

    #[test]
    fn test_score_gain_display() {
        assert_eq!(ScoreGain::Gain(40).to_string(), "+40");
        assert_eq!(ScoreGain::Gain(-10).to_string(), "-10");
        assert_eq!(ScoreGain::Gain(0).to_string(), "+0");
        assert_eq!(ScoreGain::Undefined.to_string(), "N/A");
    }
}

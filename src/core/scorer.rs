//! Trap V3 score: eight binary rules, one point each.

use crate::domain::model::{Combo, DigitSet, TrapInputs, COMBO_LEN};

pub const MAX_TRAP_SCORE: u8 = 8;

/// Digits counted by the last rule.
const SCORING_DIGITS: [u8; 6] = [0, 2, 4, 5, 6, 9];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapRule {
    TwoHot,
    AnyCold,
    AnyDue,
    SingleSeedOverlap,
    LastDigitChanged,
    NoSeedMirror,
    ParityShift,
    TwoScoringDigits,
}

impl TrapRule {
    pub const ALL: [TrapRule; 8] = [
        TrapRule::TwoHot,
        TrapRule::AnyCold,
        TrapRule::AnyDue,
        TrapRule::SingleSeedOverlap,
        TrapRule::LastDigitChanged,
        TrapRule::NoSeedMirror,
        TrapRule::ParityShift,
        TrapRule::TwoScoringDigits,
    ];
}

/// Seed-derived sets are computed once per run and shared by every combo.
#[derive(Debug, Clone)]
pub struct TrapScorer {
    inputs: TrapInputs,
    seed_distinct: DigitSet,
    seed_mirror: DigitSet,
    scoring_digits: DigitSet,
}

impl TrapScorer {
    pub fn new(inputs: TrapInputs) -> Self {
        let seed_digits = inputs.seed.digits();
        Self {
            inputs,
            seed_distinct: inputs.seed.distinct(),
            seed_mirror: DigitSet::from_digits(seed_digits.iter().map(|d| (d + 5) % 10)),
            scoring_digits: DigitSet::from_digits(SCORING_DIGITS),
        }
    }

    pub fn rule_hit(&self, rule: TrapRule, combo: &Combo) -> bool {
        let pools = &self.inputs.pools;
        let seed = &self.inputs.seed;
        match rule {
            TrapRule::TwoHot => combo.count_in(pools.hot) >= 2,
            TrapRule::AnyCold => combo.count_in(pools.cold) > 0,
            TrapRule::AnyDue => combo.count_in(pools.due) > 0,
            TrapRule::SingleSeedOverlap => {
                combo.distinct().intersection(self.seed_distinct).len() == 1
            }
            TrapRule::LastDigitChanged => combo.last() != seed.last(),
            TrapRule::NoSeedMirror => combo.distinct().intersection(self.seed_mirror).is_empty(),
            // same-position parity comparison
            TrapRule::ParityShift => (0..COMBO_LEN)
                .any(|i| combo.digits()[i] % 2 != seed.digits()[i % COMBO_LEN] % 2),
            TrapRule::TwoScoringDigits => combo.count_in(self.scoring_digits) >= 2,
        }
    }

    pub fn score(&self, combo: &Combo) -> u8 {
        TrapRule::ALL
            .iter()
            .filter(|rule| self.rule_hit(**rule, combo))
            .count() as u8
    }
}

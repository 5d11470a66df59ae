//! Annotation and filtering of generated combos.

use crate::core::predicates;
use crate::core::scorer::{TrapScorer, MAX_TRAP_SCORE};
use crate::core::vtrac::vtrac_match_category;
use crate::domain::model::{
    Combo, FilterFlags, FilterName, FilterOutcome, GenerationReport, ScoredCombo, TrapInputs,
    VTracMatch,
};

/// Computes every table column for a combo.
#[derive(Debug, Clone)]
pub struct Annotator {
    inputs: TrapInputs,
    seed_sum: u8,
    scorer: TrapScorer,
}

impl Annotator {
    pub fn new(inputs: TrapInputs) -> Self {
        Self {
            inputs,
            seed_sum: inputs.seed_sum(),
            scorer: TrapScorer::new(inputs),
        }
    }

    pub fn annotate(&self, combo: Combo) -> ScoredCombo {
        let combo_sum = combo.sum();
        let vtrac = vtrac_match_category(self.seed_sum, combo_sum);
        let pools = &self.inputs.pools;

        let flags = FilterFlags {
            consecutive: predicates::has_consecutive_run(&combo),
            spread: predicates::has_narrow_spread(&combo),
            all_low: predicates::all_digits_low(&combo),
            window: predicates::has_four_in_window(&combo),
            vtrac_both: vtrac == VTracMatch::BothMatch,
            hot_match: predicates::matches_pool(&combo, pools.hot),
            cold_match: predicates::matches_pool(&combo, pools.cold),
            due_match: predicates::matches_pool(&combo, pools.due),
        };

        ScoredCombo {
            combo,
            combo_sum,
            seed_sum: self.seed_sum,
            vtrac,
            flags,
            trap_score: self.scorer.score(&combo),
        }
    }

    pub fn annotate_all(&self, combos: &[Combo]) -> Vec<ScoredCombo> {
        combos.iter().map(|c| self.annotate(*c)).collect()
    }
}

/// One selected filter and the flag value a combo must have to survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub filter: FilterName,
    pub required: bool,
}

impl From<FilterName> for Constraint {
    fn from(filter: FilterName) -> Self {
        Self {
            filter,
            required: filter.is_match_filter(),
        }
    }
}

impl Constraint {
    pub fn accepts(&self, scored: &ScoredCombo) -> bool {
        scored.flags.get(self.filter) == self.required
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub selected: Vec<FilterName>,
    pub threshold: u8,
}

impl FilterSpec {
    pub fn new(selected: Vec<FilterName>, threshold: u8) -> Self {
        debug_assert!(threshold <= MAX_TRAP_SCORE);
        Self {
            selected,
            threshold,
        }
    }

    pub fn constraints(&self) -> Vec<Constraint> {
        self.selected.iter().copied().map(Constraint::from).collect()
    }

    pub fn accepts(&self, scored: &ScoredCombo) -> bool {
        self.constraints().iter().all(|c| c.accepts(scored)) && scored.trap_score >= self.threshold
    }

    /// Applies each selected filter in order, then the score threshold.
    pub fn apply(&self, scored: Vec<ScoredCombo>, report: GenerationReport) -> FilterOutcome {
        let initial_count = scored.len();
        let mut remaining = scored;

        for constraint in self.constraints() {
            remaining.retain(|s| constraint.accepts(s));
            tracing::debug!(
                "Filter '{}' (keep {}) -> {} combos",
                constraint.filter,
                constraint.required,
                remaining.len()
            );
        }

        remaining.retain(|s| s.trap_score >= self.threshold);
        tracing::debug!(
            "Trap V3 score >= {} -> {} combos",
            self.threshold,
            remaining.len()
        );

        FilterOutcome {
            remaining_count: remaining.len(),
            combos: remaining,
            initial_count,
            selected: self.selected.clone(),
            threshold: self.threshold,
            report,
        }
    }
}

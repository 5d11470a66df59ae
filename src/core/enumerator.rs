//! Candidate combo generation.
//!
//! Two independent strategies:
//! - `ReducedCrossProduct`: every ordered 5-tuple over Hot ∪ Cold ∪ Due.
//! - `TwoStageIntersect`: seed-pair formula combos that also survive a
//!   deterministic percentile sample of the full 00000-99999 space.

use crate::domain::model::{Combo, DigitSet, Generation, GenerationReport, TrapInputs, COMBO_LEN};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

pub const UNIVERSE_SIZE: u32 = 100_000;
pub const DEFAULT_RETENTION: f64 = 0.952;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

pub const STAGE_SOURCE_DIGITS: &str = "source digits";
pub const STAGE_CROSS_PRODUCT: &str = "cross product";
pub const STAGE_FULL_ENUMERATION: &str = "full enumeration";
pub const STAGE_PERCENTILE: &str = "percentile survivors";
pub const STAGE_FORMULA: &str = "formula combos";
pub const STAGE_INTERSECTION: &str = "intersection";
pub const STAGE_DEDUPLICATED: &str = "deduplicated";

/// Retention fraction and RNG seed for the percentile sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileSample {
    pub retention: f64,
    pub seed: u64,
}

impl Default for PercentileSample {
    fn default() -> Self {
        Self {
            retention: DEFAULT_RETENTION,
            seed: DEFAULT_SAMPLE_SEED,
        }
    }
}

impl PercentileSample {
    pub fn survivor_count(&self, universe: usize) -> usize {
        ((universe as f64 * self.retention).round() as usize).min(universe)
    }

    /// The retained subset of `universe`. Same (retention, seed) always
    /// yields the same subset.
    pub fn survivors(&self, universe: &[Combo]) -> HashSet<Combo> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let amount = self.survivor_count(universe.len());
        rand::seq::index::sample(&mut rng, universe.len(), amount)
            .into_iter()
            .map(|i| universe[i])
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumerationStrategy {
    ReducedCrossProduct,
    TwoStageIntersect(PercentileSample),
}

impl EnumerationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            EnumerationStrategy::ReducedCrossProduct => "reduced cross-product",
            EnumerationStrategy::TwoStageIntersect(_) => "two-stage intersect",
        }
    }

    pub fn enumerate(&self, inputs: &TrapInputs) -> Generation {
        match self {
            EnumerationStrategy::ReducedCrossProduct => {
                reduced_cross_product(inputs.pools.source_digits())
            }
            EnumerationStrategy::TwoStageIntersect(sample) => two_stage_intersect(inputs.seed, sample),
        }
    }
}

/// All ordered 5-tuples over `source`, in lexicographic order.
pub fn cross_product(source: DigitSet) -> Vec<Combo> {
    let digits = source.to_vec();
    let k = digits.len();
    if k == 0 {
        return Vec::new();
    }

    let total = k.pow(COMBO_LEN as u32);
    let mut combos = Vec::with_capacity(total);
    for n in 0..total {
        let mut tuple = [0u8; COMBO_LEN];
        let mut rest = n;
        for slot in tuple.iter_mut().rev() {
            *slot = digits[rest % k];
            rest /= k;
        }
        combos.push(Combo::new(tuple));
    }
    combos
}

fn reduced_cross_product(source: DigitSet) -> Generation {
    let mut report = GenerationReport::new(EnumerationStrategy::ReducedCrossProduct.name());
    report.record(STAGE_SOURCE_DIGITS, source.len());

    let combos = cross_product(source);
    report.record(STAGE_CROSS_PRODUCT, combos.len());

    Generation { combos, report }
}

pub fn full_universe() -> Vec<Combo> {
    (0..UNIVERSE_SIZE).map(Combo::from_index).collect()
}

/// Seed digit pairs (i < j), repeated value pairs collapsed, in first-seen order.
pub fn seed_pairs(seed: &Combo) -> Vec<(u8, u8)> {
    let digits = seed.digits();
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for i in 0..COMBO_LEN {
        for j in (i + 1)..COMBO_LEN {
            let pair = (digits[i], digits[j]);
            if seen.insert(pair) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// Seed pair followed by every ordered triplet 000-999, keeping combos
/// with at least two positions holding a seed digit.
pub fn formula_combos(seed: &Combo) -> Vec<Combo> {
    let seed_digits = seed.distinct();
    let mut combos = Vec::new();
    for (a, b) in seed_pairs(seed) {
        for t in 0..1000u32 {
            let combo = Combo::new([
                a,
                b,
                (t / 100) as u8,
                ((t / 10) % 10) as u8,
                (t % 10) as u8,
            ]);
            if combo.count_in(seed_digits) >= 2 {
                combos.push(combo);
            }
        }
    }
    combos
}

fn two_stage_intersect(seed: Combo, sample: &PercentileSample) -> Generation {
    let strategy = EnumerationStrategy::TwoStageIntersect(*sample);
    let mut report = GenerationReport::new(strategy.name());

    let universe = full_universe();
    report.record(STAGE_FULL_ENUMERATION, universe.len());

    let survivors = sample.survivors(&universe);
    report.record(STAGE_PERCENTILE, survivors.len());

    let formula = formula_combos(&seed);
    report.record(STAGE_FORMULA, formula.len());

    let intersected: Vec<Combo> = formula
        .into_iter()
        .filter(|combo| survivors.contains(combo))
        .collect();
    report.record(STAGE_INTERSECTION, intersected.len());

    // box uniqueness: exact ordered identity, permutations stay distinct
    let mut seen = HashSet::with_capacity(intersected.len());
    let combos: Vec<Combo> = intersected
        .into_iter()
        .filter(|combo| seen.insert(*combo))
        .collect();
    report.record(STAGE_DEDUPLICATED, combos.len());

    Generation { combos, report }
}

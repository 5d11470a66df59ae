//! Boolean filters over a single combo.

use crate::domain::model::{Combo, DigitSet};

/// Longest run of consecutive distinct digits is at least 4.
/// Repeated digits do not extend a run.
pub fn has_consecutive_run(combo: &Combo) -> bool {
    let distinct = combo.distinct();
    let mut longest = 0;
    let mut current = 0;
    for d in 0..=9u8 {
        if distinct.contains(d) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest >= 4
}

pub fn has_narrow_spread(combo: &Combo) -> bool {
    let digits = combo.digits();
    let max = digits.iter().max().copied().unwrap_or(0);
    let min = digits.iter().min().copied().unwrap_or(0);
    max - min < 4
}

pub fn all_digits_low(combo: &Combo) -> bool {
    combo.digits().iter().all(|d| *d <= 5)
}

const WINDOW_WIDTH: u8 = 2;

/// Some window [base, base+2], base in 0..=9, holds at least 4 of the digits.
pub fn has_four_in_window(combo: &Combo) -> bool {
    (0..=9u8).any(|base| {
        combo
            .digits()
            .iter()
            .filter(|d| (base..=base + WINDOW_WIDTH).contains(*d))
            .count()
            >= 4
    })
}

pub fn matches_pool(combo: &Combo, pool: DigitSet) -> bool {
    combo.count_in(pool) > 0
}

//! V-Trac digit groups and the sum-based match category.
//!
//! The ten digits pair up into five groups: {0,5}→1, {1,6}→2, {2,7}→3,
//! {3,8}→4, {4,9}→5.

use crate::domain::model::VTracMatch;

pub fn vtrac_group(digit: u8) -> u8 {
    debug_assert!(digit <= 9);
    digit % 5 + 1
}

/// Groups of the two zero-padded decimal digits of a sum (0..=45),
/// as a bitmask over groups 1-5.
fn sum_groups(sum: u8) -> u8 {
    let tens = (sum / 10) % 10;
    let ones = sum % 10;
    (1 << vtrac_group(tens)) | (1 << vtrac_group(ones))
}

/// "Both V-Tracs Match" only when the two sums share two distinct groups.
/// A sum whose digits fall in one group (11, 16, 50...) can never match.
pub fn vtrac_match_category(seed_sum: u8, combo_sum: u8) -> VTracMatch {
    let overlap = sum_groups(seed_sum) & sum_groups(combo_sum);
    if overlap.count_ones() == 2 {
        VTracMatch::BothMatch
    } else {
        VTracMatch::Other
    }
}

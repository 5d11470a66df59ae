use crate::utils::error::TrapError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const COMBO_LEN: usize = 5;

/// Set of digits 0-9 packed into a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DigitSet(u16);

impl DigitSet {
    pub const EMPTY: DigitSet = DigitSet(0);

    pub fn from_digits<I: IntoIterator<Item = u8>>(digits: I) -> Self {
        let mut set = Self::EMPTY;
        for d in digits {
            set.insert(d);
        }
        set
    }

    pub fn insert(&mut self, digit: u8) {
        debug_assert!(digit <= 9, "digit out of range: {}", digit);
        self.0 |= 1 << digit;
    }

    pub fn contains(&self, digit: u8) -> bool {
        digit <= 9 && self.0 & (1 << digit) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: DigitSet) -> DigitSet {
        DigitSet(self.0 | other.0)
    }

    pub fn intersection(self, other: DigitSet) -> DigitSet {
        DigitSet(self.0 & other.0)
    }

    /// Ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=9u8).filter(move |d| self.contains(*d))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// An ordered 5-digit candidate. Identity is the digit sequence, so
/// `01234` and `43210` are different combos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combo([u8; COMBO_LEN]);

impl Combo {
    pub fn new(digits: [u8; COMBO_LEN]) -> Self {
        debug_assert!(digits.iter().all(|d| *d <= 9));
        Self(digits)
    }

    /// Decimal expansion of `n` (0..=99_999), most significant digit first.
    pub fn from_index(n: u32) -> Self {
        debug_assert!(n < 100_000);
        let mut digits = [0u8; COMBO_LEN];
        let mut rest = n;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        Self(digits)
    }

    pub fn digits(&self) -> &[u8; COMBO_LEN] {
        &self.0
    }

    pub fn sum(&self) -> u8 {
        self.0.iter().sum()
    }

    pub fn last(&self) -> u8 {
        self.0[COMBO_LEN - 1]
    }

    pub fn distinct(&self) -> DigitSet {
        DigitSet::from_digits(self.0)
    }

    /// Positions whose digit is in `set` (duplicates count once per position).
    pub fn count_in(&self, set: DigitSet) -> usize {
        self.0.iter().filter(|d| set.contains(**d)).count()
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl FromStr for Combo {
    type Err = TrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| TrapError::MalformedSeed {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if s.chars().count() != COMBO_LEN {
            return Err(malformed("must be exactly 5 characters"));
        }

        let mut digits = [0u8; COMBO_LEN];
        for (slot, ch) in digits.iter_mut().zip(s.chars()) {
            *slot = ch
                .to_digit(10)
                .ok_or_else(|| malformed("must contain only digits 0-9"))? as u8;
        }
        Ok(Self(digits))
    }
}

impl Serialize for Combo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Hot,
    Cold,
    Due,
}

impl PoolKind {
    pub fn label(&self) -> &'static str {
        match self {
            PoolKind::Hot => "Hot",
            PoolKind::Cold => "Cold",
            PoolKind::Due => "Due",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPools {
    pub hot: DigitSet,
    pub cold: DigitSet,
    pub due: DigitSet,
}

impl DigitPools {
    pub fn get(&self, kind: PoolKind) -> DigitSet {
        match kind {
            PoolKind::Hot => self.hot,
            PoolKind::Cold => self.cold,
            PoolKind::Due => self.due,
        }
    }

    /// Hot ∪ Cold ∪ Due, duplicates collapsed.
    pub fn source_digits(&self) -> DigitSet {
        self.hot.union(self.cold).union(self.due)
    }
}

/// Validated engine inputs. The engine itself never re-checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapInputs {
    pub seed: Combo,
    pub pools: DigitPools,
}

impl TrapInputs {
    pub fn seed_sum(&self) -> u8 {
        self.seed.sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VTracMatch {
    BothMatch,
    Other,
}

impl VTracMatch {
    pub fn label(&self) -> &'static str {
        match self {
            VTracMatch::BothMatch => "Both V-Tracs Match",
            VTracMatch::Other => "Other",
        }
    }
}

impl fmt::Display for VTracMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for VTracMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The eight selectable filters, in table column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterName {
    Consecutive,
    Spread,
    AllLow,
    Window,
    VTracBoth,
    HotMatch,
    ColdMatch,
    DueMatch,
}

impl FilterName {
    pub const ALL: [FilterName; 8] = [
        FilterName::Consecutive,
        FilterName::Spread,
        FilterName::AllLow,
        FilterName::Window,
        FilterName::VTracBoth,
        FilterName::HotMatch,
        FilterName::ColdMatch,
        FilterName::DueMatch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterName::Consecutive => "F1: Consecutive ≥4",
            FilterName::Spread => "F2: Spread < 4",
            FilterName::AllLow => "F3: All 0–5",
            FilterName::Window => "F4: 4 in ±2 Range",
            FilterName::VTracBoth => "F5: Both V-Tracs Match",
            FilterName::HotMatch => "Hot Digit Match",
            FilterName::ColdMatch => "Cold Digit Match",
            FilterName::DueMatch => "Due Digit Match",
        }
    }

    fn short_keys(&self) -> &'static [&'static str] {
        match self {
            FilterName::Consecutive => &["f1", "consecutive"],
            FilterName::Spread => &["f2", "spread"],
            FilterName::AllLow => &["f3", "low", "all-low"],
            FilterName::Window => &["f4", "window", "range"],
            FilterName::VTracBoth => &["f5", "vtrac"],
            FilterName::HotMatch => &["hot"],
            FilterName::ColdMatch => &["cold"],
            FilterName::DueMatch => &["due"],
        }
    }

    /// Match filters keep combos whose flag is true; the structural
    /// filters (F1-F4) keep combos whose flag is false.
    pub fn is_match_filter(&self) -> bool {
        self.label().contains("Match")
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterName {
    type Err = TrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let lowered = wanted.to_lowercase();
        FilterName::ALL
            .into_iter()
            .find(|f| f.label() == wanted || f.short_keys().contains(&lowered.as_str()))
            .ok_or_else(|| TrapError::UnknownFilter {
                name: wanted.to_string(),
            })
    }
}

impl Serialize for FilterName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterFlags {
    pub consecutive: bool,
    pub spread: bool,
    pub all_low: bool,
    pub window: bool,
    pub vtrac_both: bool,
    pub hot_match: bool,
    pub cold_match: bool,
    pub due_match: bool,
}

impl FilterFlags {
    pub fn get(&self, filter: FilterName) -> bool {
        match filter {
            FilterName::Consecutive => self.consecutive,
            FilterName::Spread => self.spread,
            FilterName::AllLow => self.all_low,
            FilterName::Window => self.window,
            FilterName::VTracBoth => self.vtrac_both,
            FilterName::HotMatch => self.hot_match,
            FilterName::ColdMatch => self.cold_match,
            FilterName::DueMatch => self.due_match,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCombo {
    pub combo: Combo,
    pub combo_sum: u8,
    pub seed_sum: u8,
    pub vtrac: VTracMatch,
    pub flags: FilterFlags,
    pub trap_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub strategy: &'static str,
    pub stages: Vec<StageCount>,
}

impl GenerationReport {
    pub fn new(strategy: &'static str) -> Self {
        Self {
            strategy,
            stages: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: &'static str, count: usize) {
        tracing::debug!("{} - {}: {} combos", self.strategy, stage, count);
        self.stages.push(StageCount { stage, count });
    }

    pub fn count(&self, stage: &str) -> Option<usize> {
        self.stages.iter().find(|s| s.stage == stage).map(|s| s.count)
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub combos: Vec<Combo>,
    pub report: GenerationReport,
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub combos: Vec<ScoredCombo>,
    pub initial_count: usize,
    pub remaining_count: usize,
    pub selected: Vec<FilterName>,
    pub threshold: u8,
    pub report: GenerationReport,
}

pub const DEFAULT_CSV_FILENAME: &str = "filtered_combos.csv";
pub const DEFAULT_TSV_FILENAME: &str = "filtered_combos.tsv";
pub const DEFAULT_JSON_FILENAME: &str = "filtered_combos.json";
pub const DEFAULT_ARCHIVE_FILENAME: &str = "dc5_trap_output.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, TrapError> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(TrapError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, tsv, json".to_string(),
            }),
        }
    }

    pub fn default_filename(&self) -> &'static str {
        match self {
            OutputFormat::Csv => DEFAULT_CSV_FILENAME,
            OutputFormat::Tsv => DEFAULT_TSV_FILENAME,
            OutputFormat::Json => DEFAULT_JSON_FILENAME,
        }
    }
}

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use self::core::{
    engine::{RunSummary, TrapEngine},
    enumerator::{EnumerationStrategy, PercentileSample},
    filter::{Annotator, FilterSpec},
    pipeline::TrapPipeline,
    scorer::TrapScorer,
    vtrac::{vtrac_group, vtrac_match_category},
};
pub use domain::model::{
    Combo, DigitPools, DigitSet, FilterName, ScoredCombo, TrapInputs, VTracMatch,
};
pub use utils::error::{Result, TrapError};

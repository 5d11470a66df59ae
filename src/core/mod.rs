pub mod engine;
pub mod enumerator;
pub mod export;
pub mod filter;
pub mod pipeline;
pub mod predicates;
pub mod scorer;
pub mod vtrac;

pub use crate::domain::model::{Combo, FilterOutcome, Generation, ScoredCombo};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

use crate::domain::model::{FilterOutcome, Generation, OutputFormat, DEFAULT_ARCHIVE_FILENAME};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Raw, caller-supplied run settings. Parsing and validation happen in
/// `utils::validation` before any combo is generated.
pub trait ConfigProvider {
    fn seed(&self) -> &str;
    fn hot_digits(&self) -> &str;
    fn cold_digits(&self) -> &str;
    fn due_digits(&self) -> &str;
    fn strategy(&self) -> &str;
    fn retention(&self) -> f64;
    fn sample_seed(&self) -> u64;
    fn filters(&self) -> &[String];
    fn threshold(&self) -> u8;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;

    fn output_filename(&self, format: OutputFormat) -> String {
        format.default_filename().to_string()
    }

    fn archive_filename(&self) -> String {
        DEFAULT_ARCHIVE_FILENAME.to_string()
    }
}

pub trait Pipeline {
    fn generate(&self) -> Result<Generation>;
    fn transform(&self, generation: Generation) -> Result<FilterOutcome>;
    fn load(&self, outcome: &FilterOutcome) -> Result<String>;
}

use crate::core::enumerator::{DEFAULT_RETENTION, DEFAULT_SAMPLE_SEED};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{RunRequest, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dc5-trap")]
#[command(about = "DC-5 Trap V3 combo generator and filter")]
pub struct CliConfig {
    /// Seed combo, exactly five digits
    #[arg(long)]
    pub seed: String,

    /// Hot digits, comma-separated (at least 3)
    #[arg(long, default_value = "0,5,9")]
    pub hot: String,

    /// Cold digits, comma-separated (at least 3)
    #[arg(long, default_value = "2,3,7")]
    pub cold: String,

    /// Due digits, comma-separated (2 to 5)
    #[arg(long, default_value = "1,4")]
    pub due: String,

    /// Enumeration strategy: reduced or two-stage
    #[arg(long, default_value = "reduced")]
    pub strategy: String,

    /// Fraction of the full space kept by the two-stage percentile sample
    #[arg(long, default_value_t = DEFAULT_RETENTION)]
    pub retention: f64,

    /// RNG seed for the two-stage percentile sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SEED)]
    pub sample_seed: u64,

    /// Filter to apply; repeat for several (label or key such as f2, hot)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Minimum Trap V3 score to keep a combo
    #[arg(long, default_value = "5")]
    pub threshold: u8,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long = "format", value_delimiter = ',', default_value = "csv")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Bundle all outputs into a single ZIP archive")]
    pub compress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each stage")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn seed(&self) -> &str {
        &self.seed
    }

    fn hot_digits(&self) -> &str {
        &self.hot
    }

    fn cold_digits(&self) -> &str {
        &self.cold
    }

    fn due_digits(&self) -> &str {
        &self.due
    }

    fn strategy(&self) -> &str {
        &self.strategy
    }

    fn retention(&self) -> f64 {
        self.retention
    }

    fn sample_seed(&self) -> u64 {
        self.sample_seed
    }

    fn filters(&self) -> &[String] {
        &self.filters
    }

    fn threshold(&self) -> u8 {
        self.threshold
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn compress(&self) -> bool {
        self.compress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        RunRequest::from_config(self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["dc5-trap", "--seed", "13579"]);
        assert_eq!(config.hot, "0,5,9");
        assert_eq!(config.cold, "2,3,7");
        assert_eq!(config.due, "1,4");
        assert_eq!(config.threshold, 5);
        assert_eq!(config.output_formats, vec!["csv"]);
        assert!(config.filters.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_repeated_filters_and_formats() {
        let config = CliConfig::parse_from([
            "dc5-trap",
            "--seed",
            "13579",
            "--filter",
            "hot",
            "--filter",
            "F2: Spread < 4",
            "--format",
            "csv,json",
            "--strategy",
            "two-stage",
        ]);
        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.output_formats, vec!["csv", "json"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_bad_seed() {
        let config = CliConfig::parse_from(["dc5-trap", "--seed", "12a45"]);
        assert!(config.validate().is_err());
    }
}

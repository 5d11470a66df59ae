use crate::core::enumerator::{DEFAULT_RETENTION, DEFAULT_SAMPLE_SEED};
use crate::domain::model::{OutputFormat, DEFAULT_ARCHIVE_FILENAME};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TrapError};
use crate::utils::validation::{RunRequest, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: RunConfig,
    pub inputs: InputsConfig,
    pub generation: Option<GenerationConfig>,
    pub filters: Option<FiltersConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub seed: String,
    pub hot: String,
    pub cold: String,
    pub due: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub strategy: Option<String>,
    pub retention: Option<f64>,
    pub sample_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub selected: Option<Vec<String>>,
    pub threshold: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub csv: Option<String>,
    pub tsv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

const DEFAULT_THRESHOLD: u8 = 5;

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DC5_SEED})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrapError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn strategy_name(&self) -> &str {
        self.generation
            .as_ref()
            .and_then(|g| g.strategy.as_deref())
            .unwrap_or("reduced")
    }

    pub fn compression_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn seed(&self) -> &str {
        &self.inputs.seed
    }

    fn hot_digits(&self) -> &str {
        &self.inputs.hot
    }

    fn cold_digits(&self) -> &str {
        &self.inputs.cold
    }

    fn due_digits(&self) -> &str {
        &self.inputs.due
    }

    fn strategy(&self) -> &str {
        self.strategy_name()
    }

    fn retention(&self) -> f64 {
        self.generation
            .as_ref()
            .and_then(|g| g.retention)
            .unwrap_or(DEFAULT_RETENTION)
    }

    fn sample_seed(&self) -> u64 {
        self.generation
            .as_ref()
            .and_then(|g| g.sample_seed)
            .unwrap_or(DEFAULT_SAMPLE_SEED)
    }

    fn filters(&self) -> &[String] {
        self.filters
            .as_ref()
            .and_then(|f| f.selected.as_deref())
            .unwrap_or(&[])
    }

    fn threshold(&self) -> u8 {
        self.filters
            .as_ref()
            .and_then(|f| f.threshold)
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress(&self) -> bool {
        self.compression_enabled()
    }

    fn output_filename(&self, format: OutputFormat) -> String {
        let names = self.load.filenames.as_ref();
        let configured = match format {
            OutputFormat::Csv => names.and_then(|n| n.csv.clone()),
            OutputFormat::Tsv => names.and_then(|n| n.tsv.clone()),
            OutputFormat::Json => names.and_then(|n| n.json.clone()),
        };
        configured.unwrap_or_else(|| format.default_filename().to_string())
    }

    fn archive_filename(&self) -> String {
        self.load
            .compression
            .as_ref()
            .and_then(|c| c.filename.clone())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_FILENAME.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.run.name.trim().is_empty() {
            return Err(TrapError::MissingConfigError {
                field: "run.name".to_string(),
            });
        }
        RunRequest::from_config(self).map(|_| ())
    }
}

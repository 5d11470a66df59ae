use crate::core::export;
use crate::core::filter::Annotator;
use crate::domain::model::{FilterOutcome, Generation};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use crate::utils::validation::RunRequest;
use std::path::Path;

/// generate → annotate → filter → export, for one validated request.
pub struct TrapPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    request: RunRequest,
}

impl<S: Storage, C: ConfigProvider> TrapPipeline<S, C> {
    /// Fails on malformed inputs before anything is generated.
    pub fn new(storage: S, config: C) -> Result<Self> {
        let request = RunRequest::from_config(&config)?;
        Ok(Self {
            storage,
            config,
            request,
        })
    }

    pub fn request(&self) -> &RunRequest {
        &self.request
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for TrapPipeline<S, C> {
    fn generate(&self) -> Result<Generation> {
        let inputs = &self.request.inputs;
        tracing::debug!(
            "Seed {} (sum {}), hot [{}], cold [{}], due [{}]",
            inputs.seed,
            inputs.seed_sum(),
            inputs.pools.hot,
            inputs.pools.cold,
            inputs.pools.due
        );

        let generation = self.request.strategy.enumerate(inputs);
        for stage in &generation.report.stages {
            tracing::info!("  {}: {} combos", stage.stage, stage.count);
        }
        Ok(generation)
    }

    fn transform(&self, generation: Generation) -> Result<FilterOutcome> {
        let annotator = Annotator::new(self.request.inputs);
        let scored = annotator.annotate_all(&generation.combos);
        Ok(self.request.filters.apply(scored, generation.report))
    }

    fn load(&self, outcome: &FilterOutcome) -> Result<String> {
        let mut files = Vec::with_capacity(self.request.formats.len());
        for format in &self.request.formats {
            let name = self.config.output_filename(*format);
            files.push((name, export::render(*format, outcome)?));
        }

        let written = if self.config.compress() {
            let archive_name = self.config.archive_filename();
            let archive = export::bundle_zip(&files)?;
            tracing::debug!(
                "Writing ZIP archive with {} files ({} bytes)",
                files.len(),
                archive.len()
            );
            self.storage.write_file(&archive_name, &archive)?;
            vec![archive_name]
        } else {
            for (name, contents) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, contents.len());
                self.storage.write_file(name, contents.as_bytes())?;
            }
            files.into_iter().map(|(name, _)| name).collect()
        };

        let base = Path::new(self.config.output_path());
        let paths: Vec<String> = written
            .iter()
            .map(|name| base.join(name).display().to_string())
            .collect();
        Ok(paths.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::domain::model::FilterName;
    use crate::utils::error::TrapError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).ok_or_else(|| {
                TrapError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn config(extra: &str) -> TomlConfig {
        let toml_content = format!(
            r#"
[run]
name = "pipeline-test"

[inputs]
seed = "13579"
hot = "0,5,9"
cold = "2,3,7"
due = "1,4"

{}

[load]
output_path = "./test-output"
output_formats = ["csv", "json"]
"#,
            extra
        );
        TomlConfig::from_toml_str(&toml_content).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_inputs() {
        let mut bad = config("");
        bad.inputs.due = "1".to_string();
        let result = TrapPipeline::new(MockStorage::default(), bad);
        assert!(matches!(result, Err(TrapError::InsufficientPool { .. })));
    }

    #[test]
    fn test_generate_reduced_cross_product() {
        let pipeline = TrapPipeline::new(MockStorage::default(), config("")).unwrap();
        let generation = pipeline.generate().unwrap();
        assert_eq!(generation.combos.len(), 32_768);
    }

    #[test]
    fn test_transform_applies_filters_and_threshold() {
        let pipeline = TrapPipeline::new(
            MockStorage::default(),
            config("[filters]\nselected = [\"hot\", \"f2\"]\nthreshold = 6"),
        )
        .unwrap();
        let generation = pipeline.generate().unwrap();
        let outcome = pipeline.transform(generation).unwrap();

        assert_eq!(outcome.initial_count, 32_768);
        assert_eq!(outcome.remaining_count, outcome.combos.len());
        assert_eq!(outcome.selected, vec![FilterName::HotMatch, FilterName::Spread]);
        assert!(outcome.remaining_count < outcome.initial_count);
        assert!(outcome.combos.iter().all(|c| c.flags.hot_match
            && !c.flags.spread
            && c.trap_score >= 6));
    }

    #[test]
    fn test_load_writes_each_format() {
        let storage = MockStorage::default();
        let pipeline = TrapPipeline::new(storage.clone(), config("")).unwrap();
        let outcome = pipeline.transform(pipeline.generate().unwrap()).unwrap();

        let output = pipeline.load(&outcome).unwrap();
        assert!(output.contains("filtered_combos.csv"));
        assert!(output.contains("filtered_combos.json"));

        let csv = String::from_utf8(storage.get_file("filtered_combos.csv").unwrap()).unwrap();
        assert_eq!(csv.lines().count(), outcome.remaining_count + 1);
        assert!(csv.starts_with("Combo,"));
        assert!(storage.get_file("filtered_combos.json").is_some());
    }

    #[test]
    fn test_load_bundles_zip_when_compressed() {
        let storage = MockStorage::default();
        let mut cfg = config("");
        cfg.load.compression = Some(crate::config::toml_config::CompressionConfig {
            enabled: true,
            filename: None,
        });
        let pipeline = TrapPipeline::new(storage.clone(), cfg).unwrap();
        let outcome = pipeline.transform(pipeline.generate().unwrap()).unwrap();

        let output = pipeline.load(&outcome).unwrap();
        assert!(output.ends_with("dc5_trap_output.zip"));
        assert!(storage.get_file("filtered_combos.csv").is_none());

        let bytes = storage.get_file("dc5_trap_output.zip").unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}

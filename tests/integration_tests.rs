use dc5_trap::domain::ports::Pipeline;
use dc5_trap::{CliConfig, LocalStorage, TrapEngine, TrapError, TrapPipeline};
use tempfile::TempDir;

fn cli_config(output_path: &str) -> CliConfig {
    CliConfig {
        seed: "13579".to_string(),
        hot: "0,5,9".to_string(),
        cold: "2,3,7".to_string(),
        due: "1,4".to_string(),
        strategy: "reduced".to_string(),
        retention: 0.952,
        sample_seed: 42,
        filters: vec![],
        threshold: 0,
        output_path: output_path.to_string(),
        output_formats: vec!["csv".to_string()],
        compress: false,
        verbose: false,
        monitor: false,
    }
}

#[test]
fn test_end_to_end_reduced_cross_product() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = cli_config(&output_path);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = TrapPipeline::new(storage, config).unwrap();
    let engine = TrapEngine::new(pipeline);

    let summary = engine.run().unwrap();

    // {0,5,9} ∪ {2,3,7} ∪ {1,4} = 8 digits
    assert_eq!(summary.generated, 32_768);
    // threshold 0 and no filters keeps everything
    assert_eq!(summary.remaining, 32_768);
    assert!(summary.output_path.contains("filtered_combos.csv"));

    let csv_path = temp_dir.path().join("filtered_combos.csv");
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Combo");
    assert_eq!(&headers[12], "Trap V3 Score");

    let mut rows = 0;
    for record in reader.records() {
        let record = record.unwrap();
        let combo = &record[0];
        assert_eq!(combo.len(), 5);
        assert!(combo.chars().all(|c| "01234579".contains(c)));
        let score: u8 = record[12].parse().unwrap();
        assert!(score <= 8);
        rows += 1;
    }
    assert_eq!(rows, 32_768);
}

#[test]
fn test_end_to_end_with_filters_and_threshold() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(&output_path);
    config.filters = vec!["hot".to_string(), "F2: Spread < 4".to_string()];
    config.threshold = 5;
    config.output_formats = vec!["csv".to_string(), "json".to_string()];

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = TrapPipeline::new(storage, config).unwrap();
    let engine = TrapEngine::new(pipeline);
    let summary = engine.run().unwrap();

    assert_eq!(summary.generated, 32_768);
    assert!(summary.remaining > 0);
    assert!(summary.remaining < summary.generated);

    let json = std::fs::read_to_string(temp_dir.path().join("filtered_combos.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["remaining_count"], summary.remaining);
    assert_eq!(report["initial_count"], 32_768);

    for row in report["combos"].as_array().unwrap() {
        assert_eq!(row["Hot Digit Match"], true);
        assert_eq!(row["F2: Spread < 4"], false);
        assert!(row["Trap V3 Score"].as_u64().unwrap() >= 5);
    }
}

#[test]
fn test_empty_result_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(&output_path);
    // Mirror-free combos only use 1,3,5,7,9; a due hit then needs 1 and a
    // cold hit needs 3 or 7, so the single-overlap rule cannot also hold.
    config.threshold = 8;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = TrapPipeline::new(storage, config).unwrap();
    let outcome = pipeline.transform(pipeline.generate().unwrap()).unwrap();
    assert_eq!(outcome.initial_count, 32_768);
    assert_eq!(outcome.remaining_count, 0);
    assert!(outcome.combos.is_empty());

    pipeline.load(&outcome).unwrap();
    let csv = std::fs::read_to_string(temp_dir.path().join("filtered_combos.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn test_invalid_inputs_stop_before_generation() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(&output_path);
    config.seed = "1234".to_string();
    let result = TrapPipeline::new(LocalStorage::new(output_path.clone()), config);
    assert!(matches!(result, Err(TrapError::MalformedSeed { .. })));

    let mut config = cli_config(&output_path);
    config.cold = "2,3".to_string();
    let result = TrapPipeline::new(LocalStorage::new(output_path.clone()), config);
    match result {
        Err(TrapError::InsufficientPool { pool, size, .. }) => {
            assert_eq!(pool, "Cold");
            assert_eq!(size, 2);
        }
        _ => panic!("expected an insufficient pool error"),
    }

    assert!(!temp_dir.path().join("filtered_combos.csv").exists());
}

#[test]
fn test_end_to_end_two_stage_zip() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(&output_path);
    config.strategy = "two-stage".to_string();
    config.output_formats = vec!["csv".to_string(), "tsv".to_string()];
    config.compress = true;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = TrapPipeline::new(storage, config).unwrap();
    let summary = TrapEngine::new(pipeline).run().unwrap();

    // 10 seed pairs x 1000 triplets, roughly 95% survive the sample
    assert!(summary.generated > 9_000 && summary.generated <= 10_000);
    assert_eq!(summary.remaining, summary.generated);

    let zip_path = temp_dir.path().join("dc5_trap_output.zip");
    let archive = zip::ZipArchive::new(std::fs::File::open(zip_path).unwrap()).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"filtered_combos.csv"));
    assert!(names.contains(&"filtered_combos.tsv"));
}

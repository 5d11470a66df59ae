use anyhow::Context;
use clap::Parser;
use dc5_trap::domain::ports::ConfigProvider;
use dc5_trap::utils::validation::{RunRequest, Validate};
use dc5_trap::utils::logger;
use dc5_trap::{EnumerationStrategy, LocalStorage, TomlConfig, TrapEngine, TrapPipeline};

#[derive(Parser)]
#[command(name = "toml-trap")]
#[command(about = "Run the DC-5 Trap V3 generator from a TOML run file")]
struct Args {
    /// Path to TOML run file
    #[arg(short, long, default_value = "dc5-trap.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the seed from config
    #[arg(long)]
    seed: Option<String>,

    /// Validate and describe the run without generating anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load run file '{}'", args.config))?;

    if config.json_logging() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based dc5-trap run");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(seed) = &args.seed {
        config.inputs.seed = seed.clone();
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let request = RunRequest::from_config(&config)?;
    display_config_summary(&config, &request, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No combos will be generated");
        perform_dry_run(&config, &request);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TrapPipeline::new(storage, config)?;
    let engine = TrapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(summary) => {
            println!(
                "✅ Remaining combinations: {} / {}",
                summary.remaining, summary.generated
            );
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, request: &RunRequest, args: &Args) {
    println!("📋 Run Summary:");
    println!("  Run: {}", config.run.name);
    if let Some(description) = &config.run.description {
        println!("  Description: {}", description);
    }
    println!("  Seed: {} (sum {})", request.inputs.seed, request.inputs.seed_sum());
    println!("  Hot: {}", request.inputs.pools.hot);
    println!("  Cold: {}", request.inputs.pools.cold);
    println!("  Due: {}", request.inputs.pools.due);
    println!("  Strategy: {}", request.strategy.name());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, request: &RunRequest) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🎲 Generation:");
    match request.strategy {
        EnumerationStrategy::ReducedCrossProduct => {
            let k = request.inputs.pools.source_digits().len();
            println!("  Source digits: {}", request.inputs.pools.source_digits());
            println!("  Expected combos: {}^5 = {}", k, k.pow(5));
        }
        EnumerationStrategy::TwoStageIntersect(sample) => {
            println!("  Full space: 100000 combos");
            println!(
                "  Percentile survivors: {} (retention {}, sample seed {})",
                sample.survivor_count(100_000),
                sample.retention,
                sample.seed
            );
            println!("  Formula combos: seed pairs x 1000 triplets");
        }
    }

    println!();
    println!("⚙️ Filters:");
    if request.filters.selected.is_empty() {
        println!("  (none selected)");
    }
    for constraint in request.filters.constraints() {
        println!(
            "  {} must be {}",
            constraint.filter,
            if constraint.required { "True" } else { "False" }
        );
    }
    println!("  Minimum Trap V3 score: {}", request.filters.threshold);

    println!();
    println!("💾 Output:");
    for format in &request.formats {
        println!("  {}", config.output_filename(*format));
    }
    if config.compress() {
        println!("  Compression: {} (ZIP)", config.archive_filename());
    }

    println!();
    println!("✅ Dry run analysis complete.");
}

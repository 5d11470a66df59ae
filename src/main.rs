use clap::Parser;
use dc5_trap::utils::{logger, validation::Validate};
use dc5_trap::{CliConfig, LocalStorage, TrapEngine, TrapError, TrapPipeline};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting dc5-trap");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證輸入
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match TrapPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };

    let engine = TrapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(summary) => {
            tracing::info!("✅ Run completed");
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
            fail(&e);
        }
    }

    Ok(())
}

fn fail(e: &TrapError) -> ! {
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

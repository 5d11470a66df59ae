use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub generated: usize,
    pub remaining: usize,
}

pub struct TrapEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> TrapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunSummary> {
        tracing::info!("🎲 Generating combos...");
        let generation = self.pipeline.generate()?;
        let generated = generation.combos.len();
        tracing::info!("Generated {} combos ({})", generated, generation.report.strategy);
        self.monitor.log_stats("generate");

        tracing::info!("🔍 Scoring and filtering...");
        let outcome = self.pipeline.transform(generation)?;
        tracing::info!(
            "Remaining combinations after filtering and Trap V3 ≥ {}: {} / {}",
            outcome.threshold,
            outcome.remaining_count,
            outcome.initial_count
        );
        if outcome.remaining_count == 0 {
            tracing::warn!("No combos survived the selected filters");
        }
        self.monitor.log_stats("filter");

        tracing::info!("💾 Exporting...");
        let output_path = self.pipeline.load(&outcome)?;
        self.monitor.log_stats("export");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            generated,
            remaining: outcome.remaining_count,
        })
    }
}

use super::report;
use fieldbench_core::bench::run_strategy_bench;
use fieldbench_core::{MeasureConfig, Strategy};
use miette::{IntoDiagnostic, Result};

/// Run the run command for one strategy.
pub fn run(strategy: &str, elements: usize, config: &MeasureConfig, json: bool) -> Result<()> {
    let strategy: Strategy = strategy.parse().into_diagnostic()?;
    let report = run_strategy_bench(strategy, elements, config).into_diagnostic()?;
    report::print(&report, "fieldbench run", json)
}

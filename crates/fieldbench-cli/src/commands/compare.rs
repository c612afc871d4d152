use super::report;
use fieldbench_core::bench::run_compare_bench;
use fieldbench_core::MeasureConfig;
use miette::{IntoDiagnostic, Result};

/// Run the compare command: whole-element first, then single-field.
pub fn run(elements: usize, config: &MeasureConfig, json: bool) -> Result<()> {
    let report = run_compare_bench(elements, config).into_diagnostic()?;
    report::print(&report, "fieldbench compare", json)
}

use fieldbench_core::bench::{BenchReport, Severity};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};

/// Print a report as JSON or as formatted text on stdout.
pub fn print(report: &BenchReport, title: &str, json: bool) -> Result<()> {
    if json {
        print_json(report)
    } else {
        print_human(report, title)
    }
}

fn print_json(report: &BenchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_human(report: &BenchReport, title: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    let params = &report.params;

    // Header
    writeln!(out, "\x1b[1m{title}\x1b[0m").into_diagnostic()?;
    writeln!(
        out,
        "Params: elements={} seed={} warmup={}ms max={}ms iters={}..{} reset={}",
        params.elements,
        params.config.seed,
        params.config.warmup_ms,
        params.config.max_time_ms,
        params.config.min_iters,
        params.config.max_iters,
        params.config.reset_each_iteration
    )
    .into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    for line in report.summary_lines() {
        writeln!(out, "{line}").into_diagnostic()?;
    }
    writeln!(out).into_diagnostic()?;

    for result in &report.results {
        writeln!(
            out,
            "\x1b[32m{:<16}\x1b[0m mean={:<10} median={:<10} p95={:<10} \x1b[90mmin={:<10} max={:<10} samples={}\x1b[0m",
            result.name,
            format_duration(result.mean_ns),
            format_duration(result.median_ns),
            format_duration(result.p95_ns),
            format_duration(result.min_ns),
            format_duration(result.max_ns),
            result.samples
        )
        .into_diagnostic()?;
    }

    if !report.warnings.is_empty() {
        writeln!(out).into_diagnostic()?;
        writeln!(
            out,
            "\x1b[1mWarnings\x1b[0m ({} total)",
            report.warnings.len()
        )
        .into_diagnostic()?;
        for warning in &report.warnings {
            let prefix = match warning.severity {
                Severity::Info => "\x1b[34minfo\x1b[0m",
                Severity::Warn => "\x1b[33mwarn\x1b[0m",
            };
            writeln!(out, "  [{prefix}] {}: {}", warning.code, warning.message)
                .into_diagnostic()?;
        }
    }

    out.flush().into_diagnostic()?;
    Ok(())
}

/// Format a duration in nanoseconds to a human-readable string.
pub fn format_duration(ns: u64) -> String {
    // Precision loss is acceptable for display purposes
    if ns >= 1_000_000_000 {
        format!("{:.2}s", ns as f64 / 1_000_000_000.0)
    } else if ns >= 1_000_000 {
        format!("{:.2}ms", ns as f64 / 1_000_000.0)
    } else if ns >= 1_000 {
        format!("{:.2}us", ns as f64 / 1_000.0)
    } else {
        format!("{ns}ns")
    }
}

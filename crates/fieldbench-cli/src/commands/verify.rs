use fieldbench_core::bench::verify_strategies;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;

#[derive(Serialize)]
struct VerifyOutput {
    ok: bool,
    elements: usize,
    seed: u64,
    first_mismatch: Option<usize>,
    non_finite: bool,
}

/// Run both strategies once on equal inputs and fail if they disagree.
pub fn run(elements: usize, seed: u64, json: bool) -> Result<()> {
    let verification = verify_strategies(elements, seed);
    let ok = verification.identical();

    if json {
        let output = VerifyOutput {
            ok,
            elements,
            seed,
            first_mismatch: verification.first_mismatch,
            non_finite: verification.non_finite,
        };
        let json = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{json}");
    } else if ok {
        println!("Whole-element and single-field write-back agree on {elements} elements (seed {seed}).");
        if verification.non_finite {
            println!("Note: the sequence holds infinite or NaN values.");
        }
    }

    match verification.first_mismatch {
        None => Ok(()),
        Some(index) => Err(miette!(
            "write-back strategies diverged at element {index} of {elements} (seed {seed})"
        )),
    }
}

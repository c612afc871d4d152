#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Criterion benchmarks for fieldbench.
//!
//! Run benchmarks with: `cargo bench -p fieldbench-bench`
//!
//! This crate only holds the Criterion suite; the in-process harness with
//! warmup and measurement windows lives in `fieldbench_core::bench`.

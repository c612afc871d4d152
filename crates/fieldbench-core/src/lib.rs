#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]

//! Whole-element vs single-field write-back micro-benchmark.
//!
//! A [`Record`] holds several fixed-length `f64` vector fields. The mutation
//! routine updates one field of every pair of records in a `Vec<Record>`; the
//! [`Strategy`] decides whether the whole record or only that field is written
//! back. The [`bench`] harness measures both.

pub mod bench;
pub mod config;
pub mod error;
pub mod mutation;
pub mod record;
pub mod version;

pub use config::MeasureConfig;
pub use error::Error;
pub use mutation::{mutate, SingleField, Strategy, WholeElement, WriteBack};
pub use record::{build_sequence, new_record, Lanes, Record, FIELD_COUNT, LANES};
pub use version::VERSION;

//! Pairwise mutation routine with pluggable write-back.
//!
//! Every pair `(i, j)` with `i < j` contributes a `mag` derived from the two
//! records' `g` fields to field `a` of both records. The arithmetic is shared;
//! a [`WriteBack`] implementation decides how the mutated working copy is
//! stored back into the sequence.

use crate::error::Error;
use crate::record::Record;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a locally mutated record is stored back into the sequence.
///
/// Implementations must leave the stored record equal to `local` in every
/// field the routine mutates (only `a`).
pub trait WriteBack {
    /// Stable name used in reports.
    const NAME: &'static str;

    fn store(seq: &mut [Record], index: usize, local: &Record);
}

/// Replace the entire stored record.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeElement;

impl WriteBack for WholeElement {
    const NAME: &'static str = "whole_element";

    #[inline]
    fn store(seq: &mut [Record], index: usize, local: &Record) {
        seq[index] = *local;
    }
}

/// Replace only field `a`; sibling fields are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleField;

impl WriteBack for SingleField {
    const NAME: &'static str = "single_field";

    #[inline]
    fn store(seq: &mut [Record], index: usize, local: &Record) {
        seq[index].a = local.a;
    }
}

/// Run the pairwise update over `seq`, writing back with `W`.
///
/// One scalar is drawn from `rng` per pair, so two runs over equal sequences
/// with identically seeded RNGs see the same draws. `mag = r / d_sq` is not
/// guarded: identical `g` lanes produce non-finite values which propagate.
pub fn mutate<W: WriteBack, R: Rng + ?Sized>(seq: &mut [Record], rng: &mut R) {
    let n = seq.len();
    for i in 0..n {
        let mut ri = seq[i];
        for j in (i + 1)..n {
            let mut rj = seq[j];

            let delta = ri.g - rj.g;
            let d_sq = delta * delta;
            let r: f64 = rng.gen();
            let mag = r / d_sq;

            rj.a += (ri.b + ri.c) * mag;
            ri.a += (rj.b + rj.c) * mag;

            W::store(seq, j, &rj);
        }
        W::store(seq, i, &ri);
    }
}

/// Write-back strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    WholeElement,
    SingleField,
}

impl Strategy {
    /// Both strategies, whole-element first.
    pub const ALL: [Strategy; 2] = [Strategy::WholeElement, Strategy::SingleField];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WholeElement => WholeElement::NAME,
            Self::SingleField => SingleField::NAME,
        }
    }

    /// Human label used in report lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::WholeElement => "Whole-element write-back",
            Self::SingleField => "Single-field write-back",
        }
    }

    /// Run [`mutate`] with this strategy.
    ///
    /// Dispatch happens once per call; the loop body is monomorphized.
    pub fn apply<R: Rng + ?Sized>(&self, seq: &mut [Record], rng: &mut R) {
        match self {
            Self::WholeElement => mutate::<WholeElement, R>(seq, rng),
            Self::SingleField => mutate::<SingleField, R>(seq, rng),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "whole" | "whole_element" | "whole-element" => Ok(Self::WholeElement),
            "single" | "single_field" | "single-field" => Ok(Self::SingleField),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

//! Record type and value generator.
//!
//! A [`Record`] is a fixed-shape aggregate of [`FIELD_COUNT`] fields, each a
//! [`Lanes`] vector of [`LANES`] `f64` values. Records are `Copy`: reading one
//! out of a sequence yields an independent working copy.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Number of `f64` values in every field.
pub const LANES: usize = 16;

/// Number of fields in a [`Record`].
pub const FIELD_COUNT: usize = 7;

/// Fixed-length vector of `f64` with elementwise arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lanes(pub [f64; LANES]);

impl Lanes {
    /// All lanes set to `value`.
    #[must_use]
    pub const fn splat(value: f64) -> Self {
        Self([value; LANES])
    }

    /// Every lane drawn independently from uniform `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut lanes = [0.0; LANES];
        for lane in &mut lanes {
            *lane = rng.gen::<f64>();
        }
        Self(lanes)
    }

    /// True when no lane is infinite or NaN.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// True when every lane is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; LANES] {
        &self.0
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = f(*o, r);
        }
        Self(out)
    }
}

impl Default for Lanes {
    fn default() -> Self {
        Self::splat(0.0)
    }
}

impl Add for Lanes {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Lanes {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul for Lanes {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl AddAssign for Lanes {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        for (o, r) in self.0.iter_mut().zip(rhs.0) {
            *o += r;
        }
    }
}

/// `scalar / lanes`, elementwise. A zero lane yields `inf` (or `NaN` for a
/// zero scalar); no check is made.
impl Div<Lanes> for f64 {
    type Output = Lanes;

    #[inline]
    fn div(self, rhs: Lanes) -> Lanes {
        let mut out = rhs.0;
        for o in &mut out {
            *o = self / *o;
        }
        Lanes(out)
    }
}

/// Fixed-shape aggregate of independently replaceable fields.
///
/// Only `a` is written by the mutation routine. `b` and `c` feed the update
/// and `g` feeds the pairwise distance; `d`, `e` and `f` are payload that
/// whole-element write-back copies along.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub a: Lanes,
    pub b: Lanes,
    pub c: Lanes,
    pub d: Lanes,
    pub e: Lanes,
    pub f: Lanes,
    pub g: Lanes,
}

impl Record {
    /// A record with every lane of every field drawn from uniform `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: Lanes::random(rng),
            b: Lanes::random(rng),
            c: Lanes::random(rng),
            d: Lanes::random(rng),
            e: Lanes::random(rng),
            f: Lanes::random(rng),
            g: Lanes::random(rng),
        }
    }

    /// An all-zero record.
    ///
    /// Not used for measurement: zero fields make the routine unrepresentatively
    /// fast.
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> [&Lanes; FIELD_COUNT] {
        [
            &self.a, &self.b, &self.c, &self.d, &self.e, &self.f, &self.g,
        ]
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.fields().iter().all(|f| f.is_finite())
    }

    /// True when any field is entirely zero.
    #[must_use]
    pub fn has_degenerate_field(&self) -> bool {
        self.fields().iter().any(|f| f.is_zero())
    }
}

/// Generate a record from the thread-local RNG.
#[must_use]
pub fn new_record() -> Record {
    Record::random(&mut rand::thread_rng())
}

/// Build a sequence of `len` freshly generated records.
pub fn build_sequence<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<Record> {
    (0..len).map(|_| Record::random(rng)).collect()
}

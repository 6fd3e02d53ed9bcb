//! # Penalty numbers
//!
//! The Big-M method penalizes artificial variables with a constant `M` that is larger than any
//! other number appearing in the problem. Rather than substituting a concrete (large) float for
//! `M`, values are kept as a pair `constant + m_coefficient * M` and compared symbolically.
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// A number of the form `constant + m_coefficient * M`, with `M` arbitrarily large and positive.
///
/// The ordering is total and `M`-dominant: whenever the `M` coefficients differ, they alone decide
/// the comparison, no matter the constants.
///
/// # Note
///
/// Both components are expected to be finite. The equality and ordering implementations are only
/// lawful under that assumption.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct MNumber {
    constant: f64,
    m_coefficient: f64,
}

impl MNumber {
    /// Create a new value `constant + m_coefficient * M`.
    #[must_use]
    pub fn new(constant: f64, m_coefficient: f64) -> Self {
        debug_assert!(constant.is_finite() && m_coefficient.is_finite());

        Self { constant, m_coefficient }
    }

    /// A value without any `M` component.
    #[must_use]
    pub fn constant(constant: f64) -> Self {
        Self::new(constant, 0_f64)
    }

    /// A pure penalty `m_coefficient * M`.
    #[must_use]
    pub fn penalty(m_coefficient: f64) -> Self {
        Self::new(0_f64, m_coefficient)
    }

    /// The finite part.
    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// The coefficient of `M`.
    pub fn m_coefficient(&self) -> f64 {
        self.m_coefficient
    }

    /// Multiply both components with a real number.
    #[must_use]
    pub fn scalar_multiply(self, factor: f64) -> Self {
        Self::new(self.constant * factor, self.m_coefficient * factor)
    }

    /// Compare two values assuming `M` dominates any finite constant.
    ///
    /// The sign of the difference of the `M` coefficients decides, unless it is zero, in which case
    /// the sign of the difference of the constants decides. No tolerance is used.
    pub fn compare(&self, other: &Self) -> Ordering {
        sign_of(self.m_coefficient - other.m_coefficient)
            .then_with(|| sign_of(self.constant - other.constant))
    }

    /// Sign of this value for every sufficiently large `M`, with components of magnitude at most
    /// `tolerance` counted as zero.
    pub fn sign_within(&self, tolerance: f64) -> Ordering {
        let significant = |value: f64| if value.abs() <= tolerance { 0_f64 } else { value };
        sign_of(significant(self.m_coefficient)).then_with(|| sign_of(significant(self.constant)))
    }

    /// Whether this value is strictly larger than zero for every sufficiently large `M`.
    pub fn is_positive(&self) -> bool {
        self.compare(&Self::zero()) == Ordering::Greater
    }

    /// Whether this value is strictly smaller than zero for every sufficiently large `M`.
    pub fn is_negative(&self) -> bool {
        self.compare(&Self::zero()) == Ordering::Less
    }
}

fn sign_of(difference: f64) -> Ordering {
    if difference > 0_f64 {
        Ordering::Greater
    } else if difference < 0_f64 {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

impl PartialEq for MNumber {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for MNumber {}

impl PartialOrd for MNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Add for MNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.constant + rhs.constant, self.m_coefficient + rhs.m_coefficient)
    }
}

impl AddAssign for MNumber {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for MNumber {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.constant - rhs.constant, self.m_coefficient - rhs.m_coefficient)
    }
}

impl Neg for MNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.constant, -self.m_coefficient)
    }
}

impl Mul<f64> for MNumber {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scalar_multiply(rhs)
    }
}

impl Zero for MNumber {
    fn zero() -> Self {
        Self::new(0_f64, 0_f64)
    }

    /// Exact zero in both components.
    fn is_zero(&self) -> bool {
        self.constant == 0_f64 && self.m_coefficient == 0_f64
    }
}

impl Sum for MNumber {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl From<f64> for MNumber {
    fn from(constant: f64) -> Self {
        Self::constant(constant)
    }
}

impl Display for MNumber {
    /// Writes e.g. `3`, `M`, `-2M`, `3+M` or `3-2M`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        if self.m_coefficient == 0_f64 {
            return write!(f, "{}", self.constant);
        }

        let m_part = if self.m_coefficient == 1_f64 {
            "M".to_string()
        } else if self.m_coefficient == -1_f64 {
            "-M".to_string()
        } else {
            format!("{}M", self.m_coefficient)
        };

        if self.constant == 0_f64 {
            write!(f, "{}", m_part)
        } else if self.m_coefficient < 0_f64 {
            write!(f, "{}{}", self.constant, m_part)
        } else {
            write!(f, "{}+{}", self.constant, m_part)
        }
    }
}

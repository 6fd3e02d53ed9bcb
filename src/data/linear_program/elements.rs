//! # Building blocks to describe linear programs.
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::ops::Not;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::algorithm::EPSILON;
use crate::data::number_types::big_m::MNumber;

/// A `Constraint` is a type of (in)equality.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ConstraintType {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">=")]
    Greater,
    #[serde(rename = "<=")]
    Less,
}

/// Flipping the direction of an inequality, as happens when a row is multiplied by `-1`.
impl Not for ConstraintType {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Equal => Self::Equal,
            Self::Greater => Self::Less,
            Self::Less => Self::Greater,
        }
    }
}

impl Display for ConstraintType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.write_str(match self {
            Self::Equal => "=",
            Self::Greater => ">=",
            Self::Less => "<=",
        })
    }
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    Maximize,
    #[default]
    Minimize,
}

impl Objective {
    /// Whether a relative cost `Zj - Cj` indicates that bringing the column into the basis improves
    /// the objective.
    ///
    /// When maximizing, negative values improve; when minimizing, positive values do. Components
    /// within `EPSILON` of zero are rounding noise and don't count.
    pub fn is_improving(self, relative_cost: &MNumber) -> bool {
        let sign = relative_cost.sign_within(EPSILON);
        match self {
            Self::Maximize => sign == Ordering::Less,
            Self::Minimize => sign == Ordering::Greater,
        }
    }

    /// The `M` coefficient used to penalize artificial variables in the cost row.
    ///
    /// Artificial variables should leave the basis, so they get cost `-M` when maximizing and `+M`
    /// when minimizing.
    pub fn artificial_penalty(self) -> MNumber {
        match self {
            Self::Maximize => MNumber::penalty(-1_f64),
            Self::Minimize => MNumber::penalty(1_f64),
        }
    }

    #[allow(missing_docs)]
    pub fn is_maximization(self) -> bool {
        self == Self::Maximize
    }

    /// Short name as used in a written formulation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Maximize => "max",
            Self::Minimize => "min",
        }
    }
}

impl From<bool> for Objective {
    /// Interpret an `is_maximization` flag.
    fn from(is_maximization: bool) -> Self {
        if is_maximization { Self::Maximize } else { Self::Minimize }
    }
}

/// The role of a column in a simplex tableau.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    /// Variable of the original problem.
    Decision,
    /// Added to a `<=` row with coefficient `1`.
    Slack,
    /// Added to a `>=` row with coefficient `-1`.
    Surplus,
    /// Added to a `>=` or `=` row to get an initial basis, penalized with `M`.
    Artificial,
}

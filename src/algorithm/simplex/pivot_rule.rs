//! # Pivot rules
//!
//! Strategies for moving from basis to basis.
use serde::{Deserialize, Serialize};

use crate::algorithm::EPSILON;
use crate::algorithm::simplex::SimplexState;

/// Deciding how to pivot.
///
/// During the Simplex method, one needs to decide which column enters the basis. The pivot rule
/// describes that behavior. Once the column has been selected, the leaving row follows from the
/// minimum ratio test, independent of the rule.
pub trait PivotRule {
    /// Column selection rule for the primal Simplex method.
    ///
    /// # Return value
    ///
    /// The index of a column whose relative cost improves the objective, or `None` if there is no
    /// such column and the tableau is optimal.
    fn select_primal_pivot_column(state: &SimplexState) -> Option<usize>;
}

/// Pivot on the column with the most improving relative cost: the most negative `Zj - Cj` when
/// maximizing, the most positive when minimizing.
///
/// Ties are broken in favour of the lowest column index.
pub struct LargestCoefficient;
impl PivotRule for LargestCoefficient {
    fn select_primal_pivot_column(state: &SimplexState) -> Option<usize> {
        let objective = state.objective();
        let relative_cost = state.relative_cost();

        let mut best: Option<usize> = None;
        for (j, cost) in relative_cost.iter().enumerate() {
            let better = match best {
                None => true,
                Some(existing) => if objective.is_maximization() {
                    cost < &relative_cost[existing]
                } else {
                    cost > &relative_cost[existing]
                },
            };
            if better {
                best = Some(j);
            }
        }

        best.filter(|&j| objective.is_improving(&relative_cost[j]))
    }
}

/// Simply pivot on the first column which has an improving relative cost.
///
/// Combined with the lowest index tie breaking of the ratio test, this is Bland's rule, which can't
/// cycle.
pub struct FirstProfitable;
impl PivotRule for FirstProfitable {
    fn select_primal_pivot_column(state: &SimplexState) -> Option<usize> {
        let objective = state.objective();

        state.relative_cost().iter()
            .position(|cost| objective.is_improving(cost))
    }
}

/// Everything that is known about the next pivot, before doing it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotInfo {
    /// Column that enters the basis, `None` if the tableau is optimal or terminal.
    pub entering_column: Option<usize>,
    /// Row of the variable leaving the basis.
    pub leaving_row: Option<usize>,
    /// For each row, `rhs / coefficient` if the coefficient in the entering column is positive.
    pub ratios: Vec<Option<f64>>,
    /// Smallest nonnegative ratio.
    pub min_ratio: Option<f64>,
    /// The entering column has no positive coefficient.
    pub is_unbounded: bool,
}

/// Preview the next pivot of a state.
///
/// # Arguments
///
/// * `state`: Any state. Terminal states have no next pivot.
///
/// # Return value
///
/// A `PivotInfo` with the entering column chosen by `PR` and the minimum ratio test applied to it.
pub fn pivot_info<PR: PivotRule>(state: &SimplexState) -> PivotInfo {
    if state.status().is_terminal() {
        return PivotInfo::default();
    }

    match PR::select_primal_pivot_column(state) {
        None => PivotInfo::default(),
        Some(column) => {
            let (ratios, leaving_row) = minimum_ratio_test(state, column);
            PivotInfo {
                entering_column: Some(column),
                leaving_row,
                min_ratio: leaving_row.and_then(|row| ratios[row]),
                is_unbounded: ratios.iter().all(Option::is_none),
                ratios,
            }
        },
    }
}

/// Compute the ratios of the right hand side and the entering column.
///
/// Only rows with a coefficient larger than `EPSILON` get a ratio. A right hand side within
/// `EPSILON` below zero counts as zero. The leaving row has the smallest nonnegative ratio, the
/// first one found in case of ties.
fn minimum_ratio_test(state: &SimplexState, column: usize) -> (Vec<Option<f64>>, Option<usize>) {
    let ratios = state.tableau().column(column).into_iter()
        .zip(state.rhs())
        .map(|(coefficient, &rhs)| {
            let rhs = if rhs.abs() <= EPSILON { 0_f64 } else { rhs };
            (coefficient > EPSILON).then(|| rhs / coefficient)
        })
        .collect::<Vec<_>>();

    let mut leaving_row: Option<(usize, f64)> = None;
    for (i, ratio) in ratios.iter().enumerate() {
        if let &Some(ratio) = ratio {
            if ratio >= 0_f64 && leaving_row.is_none_or(|(_, smallest)| ratio < smallest) {
                leaving_row = Some((i, ratio));
            }
        }
    }

    (ratios, leaving_row.map(|(i, _)| i))
}

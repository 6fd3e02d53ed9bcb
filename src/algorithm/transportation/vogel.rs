//! # Vogel's approximation method
//!
//! For every row and column with remaining capacity, the penalty is the difference between the
//! two cheapest available cells: the extra cost per unit of not using the cheapest one. The line
//! with the highest penalty gets an allocation in its cheapest available cell.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::algorithm::transportation::{AllocationRule, Cell, InitialMethod, TransportationState};

/// Whether a penalty belongs to a row or a column.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Line {
    Row,
    Column,
}

/// Penalty of a single row or column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    /// Row or column.
    pub line: Line,
    /// Index of the row or column.
    pub index: usize,
    /// Second smallest minus smallest available cost, zero if fewer than two cells are available.
    pub penalty: f64,
    /// Costs of the available cells in the line, ascending.
    pub costs: Vec<f64>,
}

/// Penalties of all rows with remaining supply, followed by all columns with remaining demand.
pub fn penalties(state: &TransportationState) -> Vec<Penalty> {
    let rows = (0..state.nr_rows())
        .filter(|&row| state.is_source_available(row))
        .map(|row| {
            let cells = (0..state.nr_columns())
                .filter(|&column| state.is_destination_available(column))
                .map(|column| Cell::new(row, column));
            penalty(state, Line::Row, row, cells)
        });
    let columns = (0..state.nr_columns())
        .filter(|&column| state.is_destination_available(column))
        .map(|column| {
            let cells = (0..state.nr_rows())
                .filter(|&row| state.is_source_available(row))
                .map(|row| Cell::new(row, column));
            penalty(state, Line::Column, column, cells)
        });

    rows.chain(columns).collect()
}

fn penalty(state: &TransportationState, line: Line, index: usize, cells: impl Iterator<Item = Cell>) -> Penalty {
    let costs = cells.map(|cell| state.cost(cell)).sorted_by(f64::total_cmp).collect::<Vec<_>>();
    let penalty = match costs.as_slice() {
        [smallest, second, ..] => second - smallest,
        _ => 0_f64,
    };

    Penalty { line, index, penalty, costs }
}

/// Allocate in the line with the highest penalty, at its cheapest available cell.
///
/// Ties between penalties go to the first line: rows before columns, lower indices first. Ties
/// between cells in the line go to the lowest index.
pub struct Vogel;
impl AllocationRule for Vogel {
    const METHOD: InitialMethod = InitialMethod::Vogel;

    fn select_cell(state: &TransportationState) -> Option<(Cell, String)> {
        let penalties = penalties(state);
        let mut highest: Option<&Penalty> = None;
        for penalty in &penalties {
            if highest.is_none_or(|best| penalty.penalty > best.penalty) {
                highest = Some(penalty);
            }
        }
        let highest = highest?;

        let candidates = match highest.line {
            Line::Row => (0..state.nr_columns())
                .filter(|&column| state.is_destination_available(column))
                .map(|column| Cell::new(highest.index, column))
                .collect::<Vec<_>>(),
            Line::Column => (0..state.nr_rows())
                .filter(|&row| state.is_source_available(row))
                .map(|row| Cell::new(row, highest.index))
                .collect(),
        };
        let mut cheapest: Option<Cell> = None;
        for cell in candidates {
            if cheapest.is_none_or(|best| state.cost(cell) < state.cost(best)) {
                cheapest = Some(cell);
            }
        }
        let cell = cheapest?;

        let (kind, label) = match highest.line {
            Line::Row => ("row", state.source_label(highest.index)),
            Line::Column => ("column", state.destination_label(highest.index)),
        };
        Some((cell, format!(
            "Highest penalty ({}) in {} {}, its cheapest available cell has cost {}.",
            highest.penalty, kind, label, state.cost(cell),
        )))
    }
}

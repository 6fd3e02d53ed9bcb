//! # Least cost method
use crate::algorithm::transportation::{AllocationRule, Cell, InitialMethod, TransportationState};

/// Allocate to the available cell with the lowest unit cost.
///
/// Ties are broken in favour of the first cell in row major order.
pub struct LeastCost;
impl AllocationRule for LeastCost {
    const METHOD: InitialMethod = InitialMethod::LeastCost;

    fn select_cell(state: &TransportationState) -> Option<(Cell, String)> {
        let mut cheapest: Option<Cell> = None;
        for cell in state.available_cells() {
            if cheapest.is_none_or(|best| state.cost(cell) < state.cost(best)) {
                cheapest = Some(cell);
            }
        }

        cheapest.map(|cell| (cell, format!("Selected the cell with minimum cost {}.", state.cost(cell))))
    }
}

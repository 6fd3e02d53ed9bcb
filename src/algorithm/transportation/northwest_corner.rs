//! # Northwest corner method
use crate::algorithm::transportation::{AllocationRule, Cell, InitialMethod, TransportationState};

/// Allocate to the first available cell, scanning rows and then columns in index order.
///
/// Ignores the costs entirely, so the initial solution is usually far from optimal.
pub struct NorthwestCorner;
impl AllocationRule for NorthwestCorner {
    const METHOD: InitialMethod = InitialMethod::NorthwestCorner;

    fn select_cell(state: &TransportationState) -> Option<(Cell, String)> {
        let cell = state.available_cells().next()?;
        Some((cell, format!("Northwest-most available cell has cost {}.", state.cost(cell))))
    }
}

//! # Transportation problems
//!
//! An initial basic feasible solution is built one allocation at a time by one of the
//! `InitialMethod`s. It can then be improved by the MODI method, see the `modi` module.
//!
//! All methods work on the balanced problem, see `TransportationProblem::balance`.
use std::fmt::{Display, Formatter, Result as FormatResult};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::{EPSILON, Progress, SolveError, Stepwise};
use crate::algorithm::transportation::least_cost::LeastCost;
use crate::algorithm::transportation::modi::ModiData;
use crate::algorithm::transportation::northwest_corner::NorthwestCorner;
use crate::algorithm::transportation::vogel::Vogel;
use crate::data::transportation::TransportationProblem;

pub mod least_cost;
pub mod modi;
pub mod northwest_corner;
pub mod vogel;

/// Position in the cost matrix.
///
/// Ordered by row first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Index of the source.
    pub row: usize,
    /// Index of the destination.
    pub column: usize,
}

impl Cell {
    #[allow(missing_docs)]
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Amount shipped through a cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Where the amount is shipped.
    pub cell: Cell,
    /// Amount shipped, may be zero for a degenerate basic cell.
    pub value: f64,
}

/// Heuristics for an initial basic feasible solution.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum InitialMethod {
    /// Allocate to the top left available cell.
    NorthwestCorner,
    /// Allocate to the cheapest available cell.
    LeastCost,
    /// Vogel's approximation method: allocate where not doing so would be most expensive.
    Vogel,
}

/// The method that produces the next state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[allow(missing_docs)]
    Initial(InitialMethod),
    /// Modified distribution method, improving a complete initial solution.
    Modi,
}

impl From<InitialMethod> for Method {
    fn from(method: InitialMethod) -> Self {
        Method::Initial(method)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.write_str(match self {
            Method::Initial(InitialMethod::NorthwestCorner) => "Northwest Corner Method",
            Method::Initial(InitialMethod::LeastCost) => "Least Cost Method",
            Method::Initial(InitialMethod::Vogel) => "Vogel's Approximation Method",
            Method::Modi => "MODI Method",
        })
    }
}

/// Snapshot of a transportation solution in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransportationState {
    /// The balanced problem.
    problem: TransportationProblem,
    /// Sorted by cell, at most one per cell.
    allocations: Vec<Allocation>,
    total_cost: f64,
    step: usize,
    method: Method,
    status: Progress,
    explanation: String,
    remaining_supply: Vec<f64>,
    remaining_demand: Vec<f64>,
    /// Set by the MODI method once the opportunity costs are known.
    is_optimal: Option<bool>,
    degenerate: bool,
    modi: Option<ModiData>,
}

/// Set up a transportation problem for one of the initial methods.
///
/// # Errors
///
/// If the problem is inconsistent, see `TransportationProblem::validate`.
pub fn initialize(problem: &TransportationProblem, method: InitialMethod) -> Result<TransportationState, SolveError> {
    problem.validate()?;
    let balanced = problem.balance();
    debug!(
        "Initialized {}x{} transportation problem for the {}",
        balanced.nr_sources(), balanced.nr_destinations(), Method::from(method),
    );

    Ok(TransportationState {
        remaining_supply: balanced.supply.clone(),
        remaining_demand: balanced.demand.clone(),
        problem: balanced,
        allocations: Vec::new(),
        total_cost: 0_f64,
        step: 0,
        method: method.into(),
        status: Progress::Initial,
        explanation: format!("Starting {} to find initial basic feasible solution.", Method::from(method)),
        is_optimal: None,
        degenerate: false,
        modi: None,
    })
}

/// Decides which cell an initial method allocates to next.
pub trait AllocationRule {
    #[allow(missing_docs)]
    const METHOD: InitialMethod;

    /// Choose the next cell among those with both remaining supply and remaining demand.
    ///
    /// # Return value
    ///
    /// The cell and a description of why it was chosen, or `None` if no cell is available.
    fn select_cell(state: &TransportationState) -> Option<(Cell, String)>;
}

/// Do a single allocation according to `R`.
///
/// The largest possible amount is allocated: the minimum of the remaining supply and demand.
pub fn allocate_step<R: AllocationRule>(state: &TransportationState) -> TransportationState {
    let method = Method::from(R::METHOD);
    if state.status == Progress::Complete {
        return state.clone();
    }

    let mut next = state.clone();
    if state.is_allocation_complete() {
        next.status = Progress::Complete;
        next.degenerate = state.is_degenerate();
        next.explanation = format!("{} completed. All supply and demand satisfied.", method);
        return next;
    }

    next.step += 1;
    let Some((cell, reason)) = R::select_cell(state) else {
        next.status = Progress::Complete;
        next.degenerate = state.is_degenerate();
        next.explanation = "No more allocations possible.".to_string();
        return next;
    };

    let amount = state.remaining_supply[cell.row].min(state.remaining_demand[cell.column]);
    next.add_allocation(cell, amount);
    debug!("{} step {}: allocated {} to {:?}", method, next.step, amount, cell);

    next.explanation = format!(
        "Step {}: {} Allocated {} units to cell ({}, {}). Remaining supply of {}: {}, remaining demand of {}: {}.",
        next.step, reason, amount,
        next.source_label(cell.row), next.destination_label(cell.column),
        next.source_label(cell.row), next.remaining_supply[cell.row],
        next.destination_label(cell.column), next.remaining_demand[cell.column],
    );
    if next.is_allocation_complete() {
        next.status = Progress::Complete;
        next.degenerate = next.is_degenerate();
        if next.degenerate {
            debug!("Initial solution is degenerate: {} basic cells", next.basic_cells().len());
        }
    } else {
        next.status = Progress::Running;
    }

    next
}

impl TransportationState {
    /// Add to the allocation of a cell and update the remaining supply, demand and total cost.
    fn add_allocation(&mut self, cell: Cell, value: f64) {
        match self.allocations.binary_search_by_key(&cell, |allocation| allocation.cell) {
            Ok(index) => self.allocations[index].value += value,
            Err(index) => self.allocations.insert(index, Allocation { cell, value }),
        }

        self.remaining_supply[cell.row] -= value;
        self.remaining_demand[cell.column] -= value;
        self.total_cost = self.compute_total_cost();
    }

    /// `Σ cost · value` over all allocations.
    fn compute_total_cost(&self) -> f64 {
        self.allocations.iter()
            .map(|allocation| self.cost(allocation.cell) * allocation.value)
            .sum()
    }

    /// Whether all supply has been shipped and all demand has been met.
    pub fn is_allocation_complete(&self) -> bool {
        self.remaining_supply.iter().chain(&self.remaining_demand).all(|&value| value <= EPSILON)
    }

    /// Whether a source still has supply left.
    pub fn is_source_available(&self, row: usize) -> bool {
        self.remaining_supply[row] > EPSILON
    }

    /// Whether a destination still has demand left.
    pub fn is_destination_available(&self, column: usize) -> bool {
        self.remaining_demand[column] > EPSILON
    }

    /// All cells that can still receive an allocation, row by row.
    pub fn available_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.nr_rows())
            .filter(|&row| self.is_source_available(row))
            .flat_map(move |row| (0..self.nr_columns())
                .filter(|&column| self.is_destination_available(column))
                .map(move |column| Cell::new(row, column)))
    }

    /// Cells with a positive allocation.
    pub fn basic_cells(&self) -> Vec<Cell> {
        self.allocations.iter()
            .filter(|allocation| allocation.value > EPSILON)
            .map(|allocation| allocation.cell)
            .collect()
    }

    /// Whether a cell has a positive allocation.
    pub fn is_basic(&self, cell: Cell) -> bool {
        self.allocation(cell) > EPSILON
    }

    /// Amount allocated to a cell, zero if there is no allocation.
    pub fn allocation(&self, cell: Cell) -> f64 {
        self.allocations.binary_search_by_key(&cell, |allocation| allocation.cell)
            .map_or(0_f64, |index| self.allocations[index].value)
    }

    /// Fewer than `rows + columns - 1` cells have a positive allocation.
    pub fn is_degenerate(&self) -> bool {
        self.basic_cells().len() + 1 < self.nr_rows() + self.nr_columns()
    }

    /// Unit cost of a cell.
    pub fn cost(&self, cell: Cell) -> f64 {
        self.problem.costs[cell.row][cell.column]
    }

    #[allow(missing_docs)]
    pub fn source_label(&self, row: usize) -> &str {
        &self.problem.supply_labels[row]
    }

    #[allow(missing_docs)]
    pub fn destination_label(&self, column: usize) -> &str {
        &self.problem.demand_labels[column]
    }

    /// The balanced problem.
    pub fn problem(&self) -> &TransportationProblem {
        &self.problem
    }
    #[allow(missing_docs)]
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }
    #[allow(missing_docs)]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
    /// Number of steps taken by the current method.
    pub fn step_count(&self) -> usize {
        self.step
    }
    #[allow(missing_docs)]
    pub fn method(&self) -> Method {
        self.method
    }
    #[allow(missing_docs)]
    pub fn status(&self) -> Progress {
        self.status
    }
    /// What happened in the step that produced this state.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
    #[allow(missing_docs)]
    pub fn remaining_supply(&self) -> &[f64] {
        &self.remaining_supply
    }
    #[allow(missing_docs)]
    pub fn remaining_demand(&self) -> &[f64] {
        &self.remaining_demand
    }
    /// `None` until the MODI method has computed the opportunity costs.
    pub fn is_optimal(&self) -> Option<bool> {
        self.is_optimal
    }
    /// Whether the completed initial solution has too few basic cells.
    pub fn degenerate(&self) -> bool {
        self.degenerate
    }
    /// Intermediate results of the MODI method.
    pub fn modi(&self) -> Option<&ModiData> {
        self.modi.as_ref()
    }
    /// Number of sources in the balanced problem.
    pub fn nr_rows(&self) -> usize {
        self.problem.nr_sources()
    }
    /// Number of destinations in the balanced problem.
    pub fn nr_columns(&self) -> usize {
        self.problem.nr_destinations()
    }
}

impl Stepwise for TransportationState {
    fn step(&self) -> Result<Self, SolveError> {
        match self.method {
            Method::Initial(InitialMethod::NorthwestCorner) => Ok(allocate_step::<NorthwestCorner>(self)),
            Method::Initial(InitialMethod::LeastCost) => Ok(allocate_step::<LeastCost>(self)),
            Method::Initial(InitialMethod::Vogel) => Ok(allocate_step::<Vogel>(self)),
            Method::Modi => modi::step(self),
        }
    }

    fn is_terminal(&self) -> bool {
        self.status == Progress::Complete
    }
}

//! # Transportation problems
//!
//! Sources with a supply, destinations with a demand and a cost for shipping a single unit from
//! each source to each destination.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::{EPSILON, SolveError};

/// Label of a row or column added to balance a problem.
pub const DUMMY_LABEL: &str = "Dummy";

/// A transportation problem as entered by the user.
///
/// Label lists may be left empty, in which case the sources are named `S1`, `S2`, ... and the
/// destinations `D1`, `D2`, ...
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransportationProblem {
    /// Amount available at each source.
    pub supply: Vec<f64>,
    /// Amount required at each destination.
    pub demand: Vec<f64>,
    /// Unit costs, one row per source.
    pub costs: Vec<Vec<f64>>,
    /// Names of the sources.
    #[serde(default)]
    pub supply_labels: Vec<String>,
    /// Names of the destinations.
    #[serde(default)]
    pub demand_labels: Vec<String>,
}

impl TransportationProblem {
    /// Create a problem with default labels.
    pub fn new(supply: Vec<f64>, demand: Vec<f64>, costs: Vec<Vec<f64>>) -> Self {
        Self { supply, demand, costs, supply_labels: Vec::new(), demand_labels: Vec::new() }
    }

    /// Check the dimensions and values of the problem.
    ///
    /// # Errors
    ///
    /// A `SolveError::InvalidProblem` if there are no sources or destinations, the cost matrix
    /// doesn't have one row per source and one column per destination, a label list has the wrong
    /// length, or any supply, demand or cost is negative or not finite.
    pub fn validate(&self) -> Result<(), SolveError> {
        let invalid = |message: String| Err(SolveError::InvalidProblem(message));

        if self.supply.is_empty() || self.demand.is_empty() {
            return invalid("at least one source and one destination are needed".to_string());
        }
        if self.costs.len() != self.nr_sources() {
            return invalid(format!("{} cost rows for {} sources", self.costs.len(), self.nr_sources()));
        }
        if let Some((i, row)) = self.costs.iter().enumerate().find(|(_, row)| row.len() != self.nr_destinations()) {
            return invalid(format!("cost row {} has {} entries for {} destinations", i + 1, row.len(), self.nr_destinations()));
        }
        if !self.supply_labels.is_empty() && self.supply_labels.len() != self.nr_sources() {
            return invalid(format!("{} supply labels for {} sources", self.supply_labels.len(), self.nr_sources()));
        }
        if !self.demand_labels.is_empty() && self.demand_labels.len() != self.nr_destinations() {
            return invalid(format!("{} demand labels for {} destinations", self.demand_labels.len(), self.nr_destinations()));
        }
        if self.supply.iter().chain(&self.demand).any(|&value| !value.is_finite() || value < 0_f64) {
            return invalid("supply and demand must be finite and nonnegative".to_string());
        }
        if self.costs.iter().flatten().any(|cost| !cost.is_finite()) {
            return invalid("all costs must be finite".to_string());
        }

        Ok(())
    }

    /// Make total supply equal total demand.
    ///
    /// A zero cost dummy destination absorbs excess supply, a zero cost dummy source covers excess
    /// demand. Missing labels are filled in.
    pub fn balance(&self) -> Self {
        let mut balanced = self.labelled();

        let difference = self.total_supply() - self.total_demand();
        if difference > EPSILON {
            debug!("Adding dummy destination with demand {}", difference);
            balanced.demand.push(difference);
            balanced.demand_labels.push(DUMMY_LABEL.to_string());
            for row in &mut balanced.costs {
                row.push(0_f64);
            }
        } else if difference < -EPSILON {
            debug!("Adding dummy source with supply {}", -difference);
            balanced.supply.push(-difference);
            balanced.supply_labels.push(DUMMY_LABEL.to_string());
            balanced.costs.push(vec![0_f64; balanced.nr_destinations()]);
        }

        balanced
    }

    /// A copy with default labels for empty label lists.
    fn labelled(&self) -> Self {
        let defaults = |prefix: &str, n: usize| (1..=n).map(|i| format!("{}{}", prefix, i)).collect::<Vec<_>>();

        let mut labelled = self.clone();
        if labelled.supply_labels.is_empty() {
            labelled.supply_labels = defaults("S", self.nr_sources());
        }
        if labelled.demand_labels.is_empty() {
            labelled.demand_labels = defaults("D", self.nr_destinations());
        }

        labelled
    }

    /// Whether total supply equals total demand.
    pub fn is_balanced(&self) -> bool {
        (self.total_supply() - self.total_demand()).abs() <= EPSILON
    }

    #[allow(missing_docs)]
    pub fn total_supply(&self) -> f64 {
        self.supply.iter().sum()
    }

    #[allow(missing_docs)]
    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }

    /// Number of rows.
    pub fn nr_sources(&self) -> usize {
        self.supply.len()
    }

    /// Number of columns.
    pub fn nr_destinations(&self) -> usize {
        self.demand.len()
    }
}

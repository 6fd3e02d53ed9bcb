//! # Written formulation
//!
//! The standardized problem as a person would write it down, e.g.
//!
//! ```text
//! max z = 40x1 + 30x2
//! x1 + x2 + s1 = 12
//! 2x1 + x2 + s2 = 16
//! ```
use std::fmt::Display;

use crate::algorithm::simplex::SimplexState;
use crate::data::number_types::big_m::MNumber;

/// Write the objective row followed by one line per constraint row.
pub fn write(state: &SimplexState) -> String {
    let objective = state.cost().iter()
        .zip(state.variables())
        .filter(|(cost, _)| **cost != MNumber::constant(0_f64))
        .map(|(cost, name)| term(cost, name))
        .collect::<Vec<_>>();

    let mut lines = vec![format!("{} z = {}", state.objective().abbreviation(), join(&objective))];
    for (row, rhs) in state.tableau().rows().zip(state.rhs()) {
        let terms = row.iter()
            .zip(state.variables())
            .filter(|(coefficient, _)| **coefficient != 0_f64)
            .map(|(coefficient, name)| term(coefficient, name))
            .collect::<Vec<_>>();
        lines.push(format!("{} = {}", join(&terms), rhs));
    }

    lines.join("\n")
}

/// A coefficient directly followed by a variable name, leaving out a coefficient of one.
fn term(coefficient: &impl Display, name: &str) -> String {
    match coefficient.to_string().as_str() {
        "1" => name.to_string(),
        "-1" => format!("-{}", name),
        other => format!("{}{}", other, name),
    }
}

/// Join terms with `+` and `-` operators.
fn join(terms: &[String]) -> String {
    if terms.is_empty() {
        return "0".to_string();
    }

    let mut result = String::new();
    for term in terms {
        match (term.strip_prefix('-'), result.is_empty()) {
            (Some(negated), false) => {
                result.push_str(" - ");
                result.push_str(negated);
            },
            (None, false) => {
                result.push_str(" + ");
                result.push_str(term);
            },
            (_, true) => result.push_str(term),
        }
    }

    result
}

//! # Textual linear programs
//!
//! A small format for writing down linear programs by hand:
//!
//! ```text
//! max z = 40x1 + 30x2
//! // capacity
//! x1 + x2 <= 12
//! 2x1 + x2 <= 16
//! ```
//!
//! The first line holds the objective, every following line a constraint with one of the
//! operators `<=`, `>=`, `=`, `<` or `>`. Lines starting with `//` are skipped. Terms consist of an
//! optional sign, an optional coefficient and a variable name; repeated variables are summed.
use std::iter::Peekable;
use std::str::Chars;

use log::debug;

use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::problem::{Constraint, LinearProgram, ObjectiveFunction};
use crate::io::error::{FileLocation, ParseError};

/// Parse a linear program.
///
/// All variables are sorted by name and every constraint gets a coefficient for each of them,
/// zero where the variable doesn't appear.
///
/// # Errors
///
/// A `ParseError` referencing the offending line.
pub fn parse(program: &str) -> Result<LinearProgram, ParseError> {
    let mut lines = program.lines()
        .enumerate()
        .map(|(number, line)| (number as u64 + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"));

    let (is_maximization, objective_terms) = match lines.next() {
        None => return Err(ParseError::new("Problem definition is empty")),
        Some(location) => parse_objective(location)
            .map_err(|error| ParseError::with_cause("Invalid objective function", error))?,
    };

    let mut constraint_lines = Vec::new();
    for location in lines {
        let constraint = parse_constraint(location)
            .map_err(|error| ParseError::with_cause("Invalid constraint", error))?;
        constraint_lines.push(constraint);
    }
    if constraint_lines.is_empty() {
        return Err(ParseError::new("Need at least an objective function and one constraint"));
    }

    let mut variables = objective_terms.iter()
        .chain(constraint_lines.iter().flat_map(|(terms, _, _)| terms))
        .map(|(name, _)| name.clone())
        .collect::<Vec<_>>();
    variables.sort();
    variables.dedup();
    debug!("Parsed {} constraints over variables {:?}", constraint_lines.len(), variables);

    let coefficients = |terms: &[(String, f64)]| variables.iter()
        .map(|variable| terms.iter()
            .find(|(name, _)| name == variable)
            .map_or(0_f64, |&(_, coefficient)| coefficient))
        .collect::<Vec<_>>();

    Ok(LinearProgram {
        objective: ObjectiveFunction {
            coefficients: coefficients(&objective_terms),
            variables: variables.clone(),
        },
        constraints: constraint_lines.iter()
            .map(|(terms, constraint_type, rhs)| Constraint {
                coefficients: coefficients(terms),
                variables: variables.clone(),
                constraint_type: *constraint_type,
                rhs: *rhs,
            })
            .collect(),
        is_maximization,
    })
}

/// Parse `max z = ...` or `minimize z = ...`.
fn parse_objective(location: FileLocation) -> Result<(bool, Vec<(String, f64)>), ParseError> {
    let (_, line) = location;
    let error = |description: &str| ParseError::with_file_location(description, location);

    let (head, expression) = line.split_once('=')
        .ok_or_else(|| error("Should be 'min/max z = expression'"))?;
    let mut words = head.split_whitespace().map(str::to_lowercase);
    let is_maximization = match words.next().as_deref() {
        Some("max" | "maximize") => true,
        Some("min" | "minimize") => false,
        _ => return Err(error("Should start with 'min' or 'max'")),
    };
    if words.next().as_deref() != Some("z") || words.next().is_some() {
        return Err(error("Should be 'min/max z = expression'"));
    }

    let terms = parse_expression(expression).map_err(|description| error(&description))?;
    Ok((is_maximization, terms))
}

/// Parse `expression operator number`.
fn parse_constraint(location: FileLocation) -> Result<(Vec<(String, f64)>, ConstraintType, f64), ParseError> {
    let (_, line) = location;
    let error = |description: &str| ParseError::with_file_location(description, location);

    let start = line.find(['<', '>', '='])
        .ok_or_else(|| error("No constraint operator found, expected one of <=, >=, ="))?;
    let (constraint_type, length) = match (&line[start..start + 1], line[start + 1..].starts_with('=')) {
        ("<", true) => (ConstraintType::Less, 2),
        ("<", false) => (ConstraintType::Less, 1),
        (">", true) => (ConstraintType::Greater, 2),
        (">", false) => (ConstraintType::Greater, 1),
        (_, true) => (ConstraintType::Equal, 2),
        (_, false) => (ConstraintType::Equal, 1),
    };

    let terms = parse_expression(&line[..start]).map_err(|description| error(&description))?;
    let right = line[start + length..].trim();
    let rhs = right.parse::<f64>()
        .map_err(|_| error(&format!("Right side \"{}\" must be a number", right)))?;

    Ok((terms, constraint_type, rhs))
}

/// Parse a sum of terms like `3x1 - x2 + 2.5y`.
fn parse_expression(expression: &str) -> Result<Vec<(String, f64)>, String> {
    let mut terms: Vec<(String, f64)> = Vec::new();
    let mut chars = expression.chars().peekable();

    loop {
        skip_whitespace(&mut chars);
        if chars.peek().is_none() {
            break;
        }

        let mut sign = 1_f64;
        let mut has_sign = false;
        while let Some(&c) = chars.peek() {
            match c {
                '+' => has_sign = true,
                '-' => {
                    has_sign = true;
                    sign = -sign;
                },
                c if c.is_whitespace() => {},
                _ => break,
            }
            chars.next();
        }
        if !has_sign && !terms.is_empty() {
            return Err("Missing operator between terms".to_string());
        }

        let number = take_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
        let coefficient = if number.is_empty() {
            1_f64
        } else {
            number.parse::<f64>().map_err(|_| format!("Invalid coefficient: {}", number))?
        };
        skip_whitespace(&mut chars);

        if !chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(match chars.peek() {
                Some(c) => format!("Unexpected character '{}' in expression", c),
                None => "Expected a variable name at the end of the expression".to_string(),
            });
        }
        let name = take_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');

        match terms.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, total)) => *total += sign * coefficient,
            None => terms.push((name, sign * coefficient)),
        }
    }

    if terms.is_empty() {
        Err("Expression has no terms".to_string())
    } else {
        Ok(terms)
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn take_while(chars: &mut Peekable<Chars>, predicate: impl Fn(char) -> bool) -> String {
    let mut taken = String::new();
    while let Some(c) = chars.next_if(|&c| predicate(c)) {
        taken.push(c);
    }
    taken
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::ConstraintType;
    use crate::io::lp::{parse, parse_expression};

    #[test]
    fn expression() {
        assert_eq!(
            parse_expression("3x1 - x2 + 2.5y").unwrap(),
            vec![("x1".to_string(), 3_f64), ("x2".to_string(), -1_f64), ("y".to_string(), 2.5)],
        );
        assert_eq!(parse_expression("x1 + - 2x1").unwrap(), vec![("x1".to_string(), -1_f64)]);
        assert_eq!(parse_expression("-  4 x2").unwrap(), vec![("x2".to_string(), -4_f64)]);
        assert!(parse_expression("x1 x2").is_err());
        assert!(parse_expression("3 * x1").is_err());
        assert!(parse_expression("2x1 + 3").is_err());
        assert!(parse_expression("").is_err());
    }

    #[test]
    fn program() {
        let program = parse("minimize z = 2y + 3x\n\n// a comment\nx + y >= 4\nx + 3y = 6\n-x < -1").unwrap();

        assert!(!program.is_maximization);
        assert_eq!(program.objective.variables, vec!["x", "y"]);
        assert_eq!(program.objective.coefficients, vec![3_f64, 2_f64]);
        assert_eq!(program.constraints.len(), 3);
        assert_eq!(program.constraints[1].constraint_type, ConstraintType::Equal);
        assert_eq!(program.constraints[2].constraint_type, ConstraintType::Less);
        assert_eq!(program.constraints[2].coefficients, vec![-1_f64, 0_f64]);
        assert_eq!(program.constraints[2].rhs, -1_f64);
    }

    #[test]
    fn errors() {
        assert!(parse("").is_err());
        assert!(parse("max z = x1").is_err());
        assert!(parse("optimize z = x1\nx1 <= 1").is_err());

        let error = parse("max z = x1\nx1 <= 1\nx1 + x2 <= four").unwrap_err();
        assert_eq!(error.line_number(), Some(3));
        let error = parse("max z = x1\n\nx1 x2 <= 1").unwrap_err();
        assert_eq!(error.line_number(), Some(3));
    }
}

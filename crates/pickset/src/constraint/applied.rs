use std::fmt;

use super::Constraint;
use crate::input::Identifier;

/// A constraint together with the variable that carries it.
///
/// Resolution failures are explained as a list of applied constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedConstraint {
    pub variable: Identifier,
    pub constraint: Constraint,
}

impl AppliedConstraint {
    pub fn new(variable: Identifier, constraint: Constraint) -> Self {
        Self { variable, constraint }
    }
}

impl fmt::Display for AppliedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint.describe(&self.variable))
    }
}

use serde::{Deserialize, Serialize};

use super::Identifier;
use crate::constraint::Constraint;

/// A boolean choice together with the constraints it imposes.
///
/// Variables are produced by a [`VariableSource`](super::VariableSource)
/// and only read by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    id: Identifier,
    #[serde(default)]
    constraints: Vec<Constraint>,
}

impl Variable {
    /// Create a variable with the given constraints
    pub fn new(id: impl Into<Identifier>, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            id: id.into(),
            constraints: constraints.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Append a constraint while the variable is still being assembled
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Builder form of [`add_constraint`](Self::add_constraint)
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.add_constraint(constraint);
        self
    }
}

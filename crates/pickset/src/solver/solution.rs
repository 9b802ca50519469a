use indexmap::IndexMap;

use super::problem::NotSatisfiable;
use crate::input::{Identifier, Variable};

/// Result of a completed solve.
///
/// An unsatisfiable variable set still produces a `Solution`; the reason is
/// available from [`error`](Self::error) and nothing is selected.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    /// Selected variables, in input order
    selected: IndexMap<Identifier, Variable>,
    all: Option<Vec<Variable>>,
    error: Option<NotSatisfiable>,
}

impl Solution {
    pub(crate) fn satisfied(selected: IndexMap<Identifier, Variable>, all: Option<Vec<Variable>>) -> Self {
        Self {
            selected,
            all,
            error: None,
        }
    }

    pub(crate) fn unsatisfiable(error: NotSatisfiable, all: Option<Vec<Variable>>) -> Self {
        Self {
            selected: IndexMap::new(),
            all,
            error: Some(error),
        }
    }

    /// Variables chosen by the solver, keyed by identifier in input order
    pub fn selected_variables(&self) -> &IndexMap<Identifier, Variable> {
        &self.selected
    }

    /// Every input variable, if requested with
    /// [`SolveOptions::include_all_variables`](super::SolveOptions::include_all_variables)
    pub fn all_variables(&self) -> Option<&[Variable]> {
        self.all.as_deref()
    }

    /// Why no selection exists, if the constraints cannot be satisfied
    pub fn error(&self) -> Option<&NotSatisfiable> {
        self.error.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains_key(id)
    }
}

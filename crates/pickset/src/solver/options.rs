use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options for a single [`Solver::solve`](super::Solver::solve) call.
///
/// Can be loaded from configuration; missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Echo every input variable in [`Solution::all_variables`](super::Solution::all_variables)
    pub include_all_variables: bool,
    /// Give up once this much time has passed since the solve started
    pub timeout: Option<Duration>,
}

impl SolveOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the solution echoes all input variables
    pub fn include_all_variables(mut self, include: bool) -> Self {
        self.include_all_variables = include;
        self
    }

    /// Set a time limit for the whole solve
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

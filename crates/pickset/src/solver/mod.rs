//! SAT-based resolver for boolean variables with typed constraints.
//!
//! This module implements a DPLL search with unit propagation and
//! chronological backtracking. It looks for a satisfying assignment that
//! selects as little as possible, and explains failures as a minimal list of
//! the constraints involved.
//!
//! # Architecture
//!
//! - `ClauseCompiler`: Turns variables and their
//!   constraints into a deduplicated clause set
//! - `Engine`: The search itself, driven as a state machine
//! - [`Solver`]: Fetches variables, runs the search and builds a [`Solution`]
//!
//! # Algorithm Overview
//!
//! 1. **Compilation**: Map identifiers to variables in ascending order and
//!    emit clauses, with cardinality encodings for `AtMost`
//! 2. **Unit Propagation**: Force the last open literal of every clause
//! 3. **Decision Making**: Try the lowest free variable as unselected
//! 4. **Backtracking**: On conflict, flip the latest decision
//! 5. **Minimization**: Unselect variables no clause needs
//! 6. **Explanation**: Reduce an unsatisfiable core to the constraints that
//!    cannot be dropped

mod cancel;
mod cardinality;
mod clause;
mod compiler;
mod decisions;
mod engine;
mod options;
mod problem;
mod solution;
#[allow(clippy::module_inception)]
mod solver;


pub use cancel::CancelToken;
pub use options::SolveOptions;
pub use problem::NotSatisfiable;
pub use solution::Solution;
pub use solver::Solver;

//! Boolean constraint resolution for interdependent selections.
//!
//! Callers describe their domain as a list of [`Variable`]s, each carrying
//! typed [`Constraint`]s. The solver compiles those constraints into clauses,
//! searches for a consistent and minimal assignment and returns a
//! [`Solution`] naming the selected variables.
//!
//! # Example
//!
//! ```
//! use pickset::constraint::{dependency, mandatory};
//! use pickset::{CancelToken, SolveOptions, Solver, Variable};
//!
//! let variables = vec![
//!     Variable::new("app", vec![mandatory(), dependency(["lib"])]),
//!     Variable::new("lib", vec![]),
//!     Variable::new("unused", vec![]),
//! ];
//!
//! let solver = Solver::new(variables);
//! let solution = tokio_test::block_on(solver.solve(&CancelToken::new(), &SolveOptions::default()))
//!     .expect("variables are well-formed");
//!
//! assert!(solution.error().is_none());
//! assert!(solution.is_selected("app"));
//! assert!(solution.is_selected("lib"));
//! assert!(!solution.is_selected("unused"));
//! ```

pub mod constraint;
pub mod input;
pub mod solver;

mod error;

pub use constraint::{AppliedConstraint, Constraint};
pub use error::{CompileError, Error, Result};
pub use input::{Identifier, JsonFileSource, Variable, VariableSource};
pub use solver::{CancelToken, NotSatisfiable, Solution, SolveOptions, Solver};

//! Solver input: identifiers, variables and the sources that produce them.

mod identifier;
mod source;
mod variable;

pub use identifier::Identifier;
pub use source::{JsonFileSource, VariableSource};
pub use variable::Variable;

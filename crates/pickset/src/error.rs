use thiserror::Error;

use crate::input::Identifier;

/// Errors that abort a solve before a [`Solution`](crate::Solution) exists.
///
/// Unsatisfiable constraints are not reported here; they are carried by
/// [`Solution::error`](crate::Solution::error).
#[derive(Error, Debug)]
pub enum Error {
    /// The variable source failed. The message is passed through unchanged.
    #[error(transparent)]
    VariableSource(#[from] anyhow::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("cancelled before a solution could be found")]
    Cancelled,

    #[error("deadline exceeded before a solution could be found")]
    DeadlineExceeded,
}

/// The variable set cannot be turned into clauses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("duplicate identifier \"{0}\" in input")]
    DuplicateIdentifier(Identifier),

    #[error("variable \"{subject}\" references \"{reference}\", which is not in the input")]
    UnknownIdentifier {
        subject: Identifier,
        reference: Identifier,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_source_error_is_verbatim() {
        let err = Error::from(anyhow::anyhow!("filter failure"));
        assert_eq!(err.to_string(), "filter failure");
    }

    #[test]
    fn test_compile_error_messages() {
        let err = Error::from(CompileError::DuplicateIdentifier("a".into()));
        assert_eq!(err.to_string(), "duplicate identifier \"a\" in input");

        let err = CompileError::UnknownIdentifier {
            subject: "a".into(),
            reference: "b".into(),
        };
        assert_eq!(
            err.to_string(),
            "variable \"a\" references \"b\", which is not in the input"
        );
    }
}

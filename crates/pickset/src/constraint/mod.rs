//! Typed constraint primitives.
//!
//! Every [`Constraint`] belongs to the variable that carries it (its *owner*)
//! and can be rendered as a sentence about a subject or reduced to a
//! [`Canonical`] form that the compiler turns into clauses.

mod applied;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::Identifier;

pub use applied::AppliedConstraint;

/// A restriction on which variables may be selected together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// The owner must be selected
    Mandatory,
    /// The owner must not be selected
    Prohibited,
    /// If the owner is selected, at least one of `ids` must be selected
    Dependency { ids: Vec<Identifier> },
    /// The owner and `id` must not both be selected
    Conflict { id: Identifier },
    /// At most `n` of `ids` may be selected; `ids` may include the owner
    AtMost { n: usize, ids: Vec<Identifier> },
    /// `owner ∨ id` must hold, with either side negated by its flag
    Or {
        id: Identifier,
        #[serde(default)]
        negate_owner: bool,
        #[serde(default)]
        negate_target: bool,
    },
}

/// Canonical form of a constraint over identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical<'a> {
    /// At least one of these `(identifier, polarity)` literals must hold
    Clause(Vec<(&'a Identifier, bool)>),
    /// At most `n` of these identifiers may be selected
    AtMost(usize, &'a [Identifier]),
}

impl Constraint {
    /// Render the constraint as a sentence about `subject`
    pub fn describe(&self, subject: &Identifier) -> String {
        match self {
            Constraint::Mandatory => format!("{} is mandatory", subject),
            Constraint::Prohibited => format!("{} is prohibited", subject),
            Constraint::Dependency { ids } if ids.is_empty() => {
                format!("{} has a dependency without any candidates to satisfy it", subject)
            }
            Constraint::Dependency { ids } => {
                format!("{} requires at least one of {}", subject, join(ids))
            }
            Constraint::Conflict { id } => format!("{} conflicts with {}", subject, id),
            Constraint::AtMost { n, ids } => {
                format!("{} permits at most {} of {}", subject, n, join(ids))
            }
            Constraint::Or { id, negate_owner, negate_target } => format!(
                "{} or {}",
                Negatable(subject, *negate_owner),
                Negatable(id, *negate_target)
            ),
        }
    }

    /// Reduce the constraint owned by `owner` to its canonical form
    pub fn canonical<'a>(&'a self, owner: &'a Identifier) -> Canonical<'a> {
        match self {
            Constraint::Mandatory => Canonical::Clause(vec![(owner, true)]),
            Constraint::Prohibited => Canonical::Clause(vec![(owner, false)]),
            Constraint::Dependency { ids } => {
                let mut literals = Vec::with_capacity(ids.len() + 1);
                literals.push((owner, false));
                literals.extend(ids.iter().map(|id| (id, true)));
                Canonical::Clause(literals)
            }
            Constraint::Conflict { id } => Canonical::Clause(vec![(owner, false), (id, false)]),
            Constraint::AtMost { n, ids } => Canonical::AtMost(*n, ids),
            Constraint::Or { id, negate_owner, negate_target } => {
                Canonical::Clause(vec![(owner, !negate_owner), (id, !negate_target)])
            }
        }
    }

    /// Identifiers other than the owner that this constraint refers to
    pub fn references(&self) -> &[Identifier] {
        match self {
            Constraint::Mandatory | Constraint::Prohibited => &[],
            Constraint::Dependency { ids } | Constraint::AtMost { ids, .. } => ids,
            Constraint::Conflict { id } | Constraint::Or { id, .. } => std::slice::from_ref(id),
        }
    }
}

struct Negatable<'a>(&'a Identifier, bool);

impl fmt::Display for Negatable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "not {}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn join(ids: &[Identifier]) -> String {
    ids.iter().map(Identifier::as_str).collect::<Vec<_>>().join(", ")
}

/// Collect identifiers, dropping repeats but keeping first-seen order
fn unique_ids<I, T>(ids: I) -> Vec<Identifier>
where
    I: IntoIterator<Item = T>,
    T: Into<Identifier>,
{
    let mut unique: Vec<Identifier> = Vec::new();
    for id in ids {
        let id = id.into();
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// The owner must be selected
pub fn mandatory() -> Constraint {
    Constraint::Mandatory
}

/// The owner must not be selected
pub fn prohibited() -> Constraint {
    Constraint::Prohibited
}

/// If the owner is selected, at least one of `ids` must be selected.
///
/// An empty list makes the owner unselectable.
pub fn dependency<I, T>(ids: I) -> Constraint
where
    I: IntoIterator<Item = T>,
    T: Into<Identifier>,
{
    Constraint::Dependency { ids: unique_ids(ids) }
}

/// The owner and `id` must not both be selected
pub fn conflict(id: impl Into<Identifier>) -> Constraint {
    Constraint::Conflict { id: id.into() }
}

/// At most `n` of `ids` may be selected at once
pub fn at_most<I, T>(n: usize, ids: I) -> Constraint
where
    I: IntoIterator<Item = T>,
    T: Into<Identifier>,
{
    Constraint::AtMost { n, ids: unique_ids(ids) }
}

/// `owner ∨ id` must hold regardless of whether the owner is selected
pub fn or(id: impl Into<Identifier>, negate_owner: bool, negate_target: bool) -> Constraint {
    Constraint::Or {
        id: id.into(),
        negate_owner,
        negate_target,
    }
}

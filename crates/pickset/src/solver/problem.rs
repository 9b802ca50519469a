use std::collections::BTreeSet;

use log::debug;
use thiserror::Error;

use super::cancel::Interrupt;
use super::clause::ClauseId;
use super::compiler::Compiled;
use super::engine::{Engine, Outcome};
use crate::constraint::AppliedConstraint;

/// Largest explanation that is shrunk by re-solving without each constraint.
/// Bigger cores are reported as found.
const SHRINK_LIMIT: usize = 64;

/// The constraints cannot all hold at once.
///
/// Lists the applied constraints that together make the variable set
/// unsatisfiable, in input order. When the search ran to completion no
/// constraint can be dropped from the list without the remainder becoming
/// satisfiable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("constraints not satisfiable: {}", join(.0))]
pub struct NotSatisfiable(pub Vec<AppliedConstraint>);

impl NotSatisfiable {
    pub fn constraints(&self) -> &[AppliedConstraint] {
        &self.0
    }
}

fn join(constraints: &[AppliedConstraint]) -> String {
    constraints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn an unsatisfiable clause core into a minimal set of applied
/// constraints.
///
/// Each candidate constraint is dropped in turn and the rest is solved
/// again. Constraints whose removal makes the rest satisfiable are kept;
/// when it stays unsatisfiable, the candidates are narrowed to the new core.
/// An interruption stops shrinking and returns what is left.
pub(crate) fn explain(compiled: &Compiled, core: &[ClauseId], interrupt: &Interrupt<'_>) -> NotSatisfiable {
    let groups = origins_of(compiled, core);
    if groups.len() > SHRINK_LIMIT {
        debug!("explanation has {} constraints, not shrinking", groups.len());
        return render(compiled, groups);
    }

    let mut necessary: BTreeSet<usize> = BTreeSet::new();
    let mut pending: BTreeSet<usize> = groups;
    let mut resolves = 0;

    while let Some(candidate) = pending.pop_first() {
        let trial: BTreeSet<usize> = necessary.union(&pending).copied().collect();
        let active = clauses_of(compiled, &trial);

        resolves += 1;
        let (outcome, _) = Engine::new(compiled.clauses(), &active, compiled.num_vars(), interrupt).run();
        match outcome {
            Outcome::Satisfied(_) => {
                necessary.insert(candidate);
            }
            Outcome::Unsatisfiable(core) => {
                let remaining = origins_of(compiled, &core);
                pending.retain(|group| remaining.contains(group));
            }
            Outcome::Interrupted(interruption) => {
                debug!("explanation shrinking stopped: {:?}", interruption);
                necessary.insert(candidate);
                necessary.append(&mut pending);
                break;
            }
        }
    }

    debug!("explanation: {} constraints after {} re-solves", necessary.len(), resolves);
    render(compiled, necessary)
}

/// Applied constraint indices that produced any of `clauses`
fn origins_of(compiled: &Compiled, clauses: &[ClauseId]) -> BTreeSet<usize> {
    clauses
        .iter()
        .flat_map(|&id| compiled.clauses().origins(id).iter().copied())
        .collect()
}

/// Every clause produced by at least one of `groups`
fn clauses_of(compiled: &Compiled, groups: &BTreeSet<usize>) -> Vec<ClauseId> {
    compiled
        .clauses()
        .ids()
        .into_iter()
        .filter(|&id| compiled.clauses().origins(id).iter().any(|origin| groups.contains(origin)))
        .collect()
}

fn render(compiled: &Compiled, groups: BTreeSet<usize>) -> NotSatisfiable {
    let applied = compiled.applied();
    NotSatisfiable(groups.into_iter().map(|index| applied[index].clone()).collect())
}

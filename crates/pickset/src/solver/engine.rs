//! DPLL search with unit propagation and chronological backtracking.
//!
//! The engine tries "not selected" first for every free variable, which
//! together with the final minimization pass keeps selections as small as
//! the clauses allow. There is no clause learning; conflicts are resolved by
//! undoing the latest decision and taking the other branch.

use std::collections::BTreeSet;

use log::trace;

use super::cancel::{Interrupt, Interruption};
use super::clause::{literal_index, positive, var_of, ClauseId, ClauseSet, Literal, VarId};
use super::compiler::Preference;
use super::decisions::{Decisions, Reason};

/// Final result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Selected/unselected per variable, indexed by [`VarId`]
    Satisfied(Vec<bool>),
    /// Clauses that cannot all hold at once
    Unsatisfiable(Vec<ClauseId>),
    Interrupted(Interruption),
}

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub flips: u64,
}

enum State {
    Propagating,
    Searching,
    Backtracking(ClauseId),
    Satisfied,
    Unsatisfiable(Vec<ClauseId>),
}

pub(crate) struct Engine<'a> {
    clauses: &'a ClauseSet,
    active: &'a [ClauseId],
    /// Active clauses containing each literal, indexed by [`literal_index`]
    occurrences: Vec<Vec<ClauseId>>,
    /// Variables that appear in at least one active clause
    relevant: Vec<bool>,
    preferences: Option<&'a [Preference]>,
    decisions: Decisions,
    /// Next trail position whose consequences have not been propagated
    propagated: usize,
    interrupt: &'a Interrupt<'a>,
    stats: SearchStats,
}

impl<'a> Engine<'a> {
    /// Search over the `active` subset of `clauses`
    pub fn new(
        clauses: &'a ClauseSet,
        active: &'a [ClauseId],
        num_vars: u32,
        interrupt: &'a Interrupt<'a>,
    ) -> Self {
        let mut occurrences = vec![Vec::new(); 2 * (num_vars as usize + 1)];
        let mut relevant = vec![false; num_vars as usize + 1];
        for &id in active {
            for &literal in clauses.literals(id) {
                occurrences[literal_index(literal)].push(id);
                relevant[var_of(literal) as usize] = true;
            }
        }

        Self {
            clauses,
            active,
            occurrences,
            relevant,
            preferences: None,
            decisions: Decisions::new(num_vars),
            propagated: 0,
            interrupt,
            stats: SearchStats::default(),
        }
    }

    /// Minimize the selection of a satisfying assignment using these
    /// preferences, indexed by [`VarId`]
    pub fn with_preferences(mut self, preferences: &'a [Preference]) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn run(mut self) -> (Outcome, SearchStats) {
        let mut state = match self.seed() {
            Ok(()) => State::Propagating,
            Err(conflict) => State::Backtracking(conflict),
        };

        loop {
            state = match state {
                State::Propagating => match self.propagate() {
                    Ok(()) => State::Searching,
                    Err(conflict) => State::Backtracking(conflict),
                },
                State::Searching => {
                    if let Some(interruption) = self.interrupt.check() {
                        return (Outcome::Interrupted(interruption), self.stats);
                    }
                    match self.next_unassigned() {
                        Some(var) => {
                            self.stats.decisions += 1;
                            self.decisions.push_level();
                            trace!("decide -{} at level {}", var, self.decisions.level());
                            self.decisions.assign(-positive(var), Reason::Decision);
                            State::Propagating
                        }
                        None => State::Satisfied,
                    }
                }
                State::Backtracking(conflict) => {
                    self.stats.conflicts += 1;
                    let core = self.analyze(conflict);
                    let level = self.decisions.level();
                    match self.decisions.decision_at(level) {
                        Some(decision) => {
                            trace!("conflict in clause {}, flipping {} at level {}", conflict, decision, level);
                            self.decisions.revert_to_level(level - 1);
                            self.propagated = self.decisions.trail().len();
                            self.decisions.assign(-decision, Reason::Refuted(core));
                            State::Propagating
                        }
                        None => State::Unsatisfiable(core),
                    }
                }
                State::Satisfied => {
                    let mut model = self.decisions.model();
                    if let Some(preferences) = self.preferences {
                        self.minimize(&mut model, preferences);
                    }
                    return (Outcome::Satisfied(model), self.stats);
                }
                State::Unsatisfiable(core) => return (Outcome::Unsatisfiable(core), self.stats),
            };
        }
    }

    /// Assign the literals of unit clauses at level 0
    fn seed(&mut self) -> Result<(), ClauseId> {
        for &id in self.active {
            match self.clauses.literals(id) {
                [] => return Err(id),
                &[literal] => {
                    if !self.decisions.assign(literal, Reason::Propagated(id)) {
                        return Err(id);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Unit propagation over every trail literal not yet processed
    fn propagate(&mut self) -> Result<(), ClauseId> {
        while self.propagated < self.decisions.trail().len() {
            let literal = self.decisions.trail()[self.propagated];
            self.propagated += 1;

            let watching = &self.occurrences[literal_index(-literal)];
            for &id in watching {
                let mut unassigned = None;
                let mut open = 0;
                let mut satisfied = false;

                for &candidate in self.clauses.literals(id) {
                    match self.decisions.value(candidate) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            open += 1;
                            unassigned = Some(candidate);
                        }
                    }
                }

                if satisfied {
                    continue;
                }
                match (open, unassigned) {
                    (0, _) => return Err(id),
                    (1, Some(forced)) => {
                        self.stats.propagations += 1;
                        self.decisions.assign(forced, Reason::Propagated(id));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Lowest relevant variable without a value.
    ///
    /// Every variable below the current level's decision is already
    /// assigned, so the scan starts there.
    fn next_unassigned(&self) -> Option<VarId> {
        let start = self
            .decisions
            .decision_at(self.decisions.level())
            .map(var_of)
            .unwrap_or(1);

        (start..self.relevant.len() as VarId)
            .find(|&var| self.relevant[var as usize] && !self.decisions.is_assigned(var))
    }

    /// Collect the clauses that led to a conflict, following propagation
    /// reasons back to decisions.
    fn analyze(&self, conflict: ClauseId) -> Vec<ClauseId> {
        let mut core = BTreeSet::new();
        let mut seen = vec![false; self.relevant.len()];
        let mut pending: Vec<VarId> = Vec::new();

        core.insert(conflict);
        pending.extend(self.clauses.literals(conflict).iter().map(|&l| var_of(l)));

        while let Some(var) = pending.pop() {
            if std::mem::replace(&mut seen[var as usize], true) {
                continue;
            }
            match self.decisions.reason(var) {
                Some(Reason::Propagated(id)) => {
                    if core.insert(*id) {
                        pending.extend(self.clauses.literals(*id).iter().map(|&l| var_of(l)));
                    }
                }
                Some(Reason::Refuted(ids)) => core.extend(ids.iter().copied()),
                Some(Reason::Decision) | None => {}
            }
        }

        core.into_iter().collect()
    }

    /// Flip selected variables back to unselected while every clause still
    /// holds, until nothing changes.
    fn minimize(&mut self, model: &mut [bool], preferences: &[Preference]) {
        loop {
            let mut changed = false;
            for var in 1..model.len() {
                if !model[var] || !matches!(preferences.get(var), Some(Preference::Optional { cost }) if *cost > 0) {
                    continue;
                }

                model[var] = false;
                let holds = self.occurrences[literal_index(positive(var as VarId))]
                    .iter()
                    .all(|&id| self.satisfied_by(id, model));
                if holds {
                    trace!("minimize: unselect {}", var);
                    self.stats.flips += 1;
                    changed = true;
                } else {
                    model[var] = true;
                }
            }
            if !changed {
                return;
            }
        }
    }

    fn satisfied_by(&self, id: ClauseId, model: &[bool]) -> bool {
        self.clauses
            .literals(id)
            .iter()
            .any(|&literal: &Literal| model[var_of(literal) as usize] == (literal > 0))
    }
}

use super::clause::{var_of, ClauseId, Literal, VarId};

/// Why a variable holds its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reason {
    /// Chosen by the search
    Decision,
    /// Forced by the clause once all its other literals were false
    Propagated(ClauseId),
    /// The opposite value was a decision whose branch failed; these clauses
    /// (together with earlier decisions) refute it
    Refuted(Vec<ClauseId>),
}

/// A single assignment record
#[derive(Debug, Clone)]
struct Assignment {
    /// Whether the variable is selected
    value: bool,
    reason: Reason,
}

/// Partial assignment with a trail for backtracking.
///
/// Each assignment records:
/// - Whether the variable is selected (+) or not (-)
/// - Why it was assigned
#[derive(Debug)]
pub(crate) struct Decisions {
    /// Assignment per variable, indexed by [`VarId`]
    assignments: Vec<Option<Assignment>>,

    /// Literals in the order they were assigned
    trail: Vec<Literal>,

    /// Trail position at which each decision level starts
    level_starts: Vec<usize>,
}

impl Decisions {
    /// Create an empty assignment over variables `1..=num_vars`
    pub fn new(num_vars: u32) -> Self {
        Self {
            assignments: vec![None; num_vars as usize + 1],
            trail: Vec::new(),
            level_starts: Vec::new(),
        }
    }

    /// Get the current decision level
    pub fn level(&self) -> u32 {
        self.level_starts.len() as u32
    }

    /// Open a new decision level
    pub fn push_level(&mut self) {
        self.level_starts.push(self.trail.len());
    }

    /// Make `literal` true at the current level.
    ///
    /// Returns false if the variable already holds the opposite value.
    pub fn assign(&mut self, literal: Literal, reason: Reason) -> bool {
        let var = var_of(literal) as usize;
        let value = literal > 0;

        if let Some(existing) = &self.assignments[var] {
            return existing.value == value;
        }

        self.assignments[var] = Some(Assignment { value, reason });
        self.trail.push(literal);
        true
    }

    /// Truth value of a literal, or `None` while its variable is unassigned
    pub fn value(&self, literal: Literal) -> Option<bool> {
        self.assignments[var_of(literal) as usize]
            .as_ref()
            .map(|a| a.value == (literal > 0))
    }

    pub fn is_assigned(&self, var: VarId) -> bool {
        self.assignments[var as usize].is_some()
    }

    pub fn reason(&self, var: VarId) -> Option<&Reason> {
        self.assignments[var as usize].as_ref().map(|a| &a.reason)
    }

    /// The literal decided at the start of `level`
    pub fn decision_at(&self, level: u32) -> Option<Literal> {
        if level == 0 {
            return None;
        }
        let start = *self.level_starts.get(level as usize - 1)?;
        self.trail.get(start).copied()
    }

    /// Undo every assignment made above `target_level`
    pub fn revert_to_level(&mut self, target_level: u32) {
        let Some(&start) = self.level_starts.get(target_level as usize) else {
            return;
        };

        for literal in self.trail.drain(start..) {
            self.assignments[var_of(literal) as usize] = None;
        }
        self.level_starts.truncate(target_level as usize);
    }

    /// Literals in assignment order
    pub fn trail(&self) -> &[Literal] {
        &self.trail
    }

    /// Selected/unselected per variable; unassigned variables read as unselected
    pub fn model(&self) -> Vec<bool> {
        self.assignments
            .iter()
            .map(|a| a.as_ref().map(|a| a.value).unwrap_or(false))
            .collect()
    }
}

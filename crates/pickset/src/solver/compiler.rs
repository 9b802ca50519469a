use std::collections::HashSet;

use super::cardinality::encode_at_most;
use super::clause::{positive, ClauseId, ClauseSet, Literal, VarId};
use crate::constraint::{AppliedConstraint, Canonical, Constraint};
use crate::error::CompileError;
use crate::input::{Identifier, Variable};

/// How the engine should treat a variable when nothing forces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Preference {
    /// Fixed by a unit clause
    Pinned(bool),
    /// Free; left unselected unless something requires it. Selecting a
    /// variable with a non-zero cost is avoided whenever possible.
    Optional { cost: u32 },
}

/// Two unit clauses that force the same variable both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnitConflict {
    pub selected: ClauseId,
    pub unselected: ClauseId,
}

impl UnitConflict {
    pub fn clauses(&self) -> Vec<ClauseId> {
        vec![self.selected, self.unselected]
    }
}

/// The clause form of one variable set.
#[derive(Debug)]
pub(crate) struct Compiled {
    /// Input identifiers in ascending order; identifier `i` is variable `i + 1`
    ids: Vec<Identifier>,
    /// Every constraint of every variable, in input order
    applied: Vec<AppliedConstraint>,
    clauses: ClauseSet,
    /// Input variables plus auxiliary counter variables
    num_vars: u32,
}

impl Compiled {
    pub fn var_of(&self, id: &Identifier) -> Option<VarId> {
        self.ids.binary_search(id).ok().map(|index| index as VarId + 1)
    }

    pub fn clauses(&self) -> &ClauseSet {
        &self.clauses
    }

    pub fn applied(&self) -> &[AppliedConstraint] {
        &self.applied
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn num_input_vars(&self) -> u32 {
        self.ids.len() as u32
    }

    /// Preference per variable, indexed by [`VarId`] (index 0 is unused).
    ///
    /// Fails fast when two unit clauses contradict each other.
    pub fn preferences(&self) -> Result<Vec<Preference>, UnitConflict> {
        let input_vars = self.num_input_vars();
        let mut preferences: Vec<Preference> = (0..=self.num_vars)
            .map(|var| Preference::Optional {
                cost: u32::from(var != 0 && var <= input_vars),
            })
            .collect();
        let mut pinned_by: Vec<Option<ClauseId>> = vec![None; self.num_vars as usize + 1];

        for (id, literals) in self.clauses.iter() {
            let [literal] = literals else {
                continue;
            };
            let var = literal.unsigned_abs() as usize;
            let value = *literal > 0;

            match (preferences[var], pinned_by[var]) {
                (Preference::Pinned(existing), Some(other)) if existing != value => {
                    return Err(if value {
                        UnitConflict { selected: id, unselected: other }
                    } else {
                        UnitConflict { selected: other, unselected: id }
                    });
                }
                (Preference::Pinned(_), _) => {}
                (Preference::Optional { .. }, _) => {
                    preferences[var] = Preference::Pinned(value);
                    pinned_by[var] = Some(id);
                }
            }
        }

        Ok(preferences)
    }
}

/// Compiles a variable set into clauses.
///
/// Each constraint is reduced to its canonical form and every identifier is
/// mapped to a solver variable:
/// - Mandatory / Prohibited: a unit clause on the owner
/// - Dependency: `¬owner ∨ t1 ∨ t2 ∨ ...`
/// - Conflict: `¬owner ∨ ¬target`
/// - Or: the two signed literals
/// - AtMost: a cardinality encoding, possibly with auxiliary variables
pub(crate) struct ClauseCompiler<'a> {
    variables: &'a [Variable],
    ids: Vec<Identifier>,
    applied: Vec<AppliedConstraint>,
    clauses: ClauseSet,
    next_var: VarId,
}

impl<'a> ClauseCompiler<'a> {
    /// Index the variables, rejecting duplicate identifiers
    pub fn new(variables: &'a [Variable]) -> Result<Self, CompileError> {
        let mut seen = HashSet::with_capacity(variables.len());
        for variable in variables {
            if !seen.insert(variable.id()) {
                return Err(CompileError::DuplicateIdentifier(variable.id().clone()));
            }
        }

        let mut ids: Vec<Identifier> = variables.iter().map(|v| v.id().clone()).collect();
        ids.sort();
        let next_var = ids.len() as VarId;

        Ok(Self {
            variables,
            ids,
            applied: Vec::new(),
            clauses: ClauseSet::new(),
            next_var,
        })
    }

    pub fn compile(mut self) -> Result<Compiled, CompileError> {
        for variable in self.variables {
            for constraint in variable.constraints() {
                self.add_constraint(variable.id(), constraint)?;
            }
        }

        Ok(Compiled {
            ids: self.ids,
            applied: self.applied,
            clauses: self.clauses,
            num_vars: self.next_var,
        })
    }

    fn lookup(&self, subject: &Identifier, id: &Identifier) -> Result<VarId, CompileError> {
        self.ids
            .binary_search(id)
            .map(|index| index as VarId + 1)
            .map_err(|_| CompileError::UnknownIdentifier {
                subject: subject.clone(),
                reference: id.clone(),
            })
    }

    fn add_constraint(&mut self, owner: &Identifier, constraint: &Constraint) -> Result<(), CompileError> {
        let origin = self.applied.len();
        self.applied.push(AppliedConstraint::new(owner.clone(), constraint.clone()));

        match constraint.canonical(owner) {
            Canonical::Clause(terms) => {
                let literals = terms
                    .into_iter()
                    .map(|(id, selected)| {
                        let literal = positive(self.lookup(owner, id)?);
                        Ok(if selected { literal } else { -literal })
                    })
                    .collect::<Result<Vec<Literal>, CompileError>>()?;
                self.clauses.add(literals, origin);
            }
            Canonical::AtMost(n, ids) => {
                let vars = ids
                    .iter()
                    .map(|id| self.lookup(owner, id))
                    .collect::<Result<Vec<VarId>, CompileError>>()?;
                let mut vars_unique: Vec<VarId> = Vec::with_capacity(vars.len());
                for var in vars {
                    if !vars_unique.contains(&var) {
                        vars_unique.push(var);
                    }
                }

                let next_var = &mut self.next_var;
                let mut fresh = || {
                    *next_var += 1;
                    *next_var
                };
                for literals in encode_at_most(&vars_unique, n, &mut fresh) {
                    self.clauses.add(literals, origin);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{at_most, conflict, dependency, mandatory, or, prohibited};

    fn compile(variables: &[Variable]) -> Result<Compiled, CompileError> {
        ClauseCompiler::new(variables)?.compile()
    }

    #[test]
    fn test_compile_assigns_variables_by_identifier_order() {
        let variables = vec![Variable::new("b", vec![]), Variable::new("a", vec![]), Variable::new("c", vec![])];
        let compiled = compile(&variables).unwrap();

        assert_eq!(compiled.var_of(&"a".into()), Some(1));
        assert_eq!(compiled.var_of(&"b".into()), Some(2));
        assert_eq!(compiled.var_of(&"c".into()), Some(3));
        assert_eq!(compiled.var_of(&"d".into()), None);
        assert_eq!(compiled.num_vars(), 3);
    }

    #[test]
    fn test_compile_clauses() {
        let variables = vec![
            Variable::new("1", vec![mandatory(), dependency(["2", "3"])]),
            Variable::new("2", vec![conflict("3"), or("3", true, false)]),
            Variable::new("3", vec![prohibited()]),
        ];
        let compiled = compile(&variables).unwrap();
        let clauses: Vec<Vec<Literal>> = compiled.clauses().iter().map(|(_, l)| l.to_vec()).collect();

        assert_eq!(clauses, vec![vec![1], vec![-1, 2, 3], vec![-2, -3], vec![-2, 3], vec![-3]]);
        assert_eq!(compiled.applied().len(), 5);
        assert_eq!(compiled.applied()[1].to_string(), "1 requires at least one of 2, 3");
    }

    #[test]
    fn test_compile_rejects_duplicate_identifiers() {
        let variables = vec![Variable::new("1", vec![]), Variable::new("1", vec![mandatory()])];
        assert_eq!(compile(&variables).unwrap_err(), CompileError::DuplicateIdentifier("1".into()));
    }

    #[test]
    fn test_compile_rejects_unknown_identifiers() {
        let variables = vec![Variable::new("1", vec![dependency(["2"])])];
        assert_eq!(
            compile(&variables).unwrap_err(),
            CompileError::UnknownIdentifier {
                subject: "1".into(),
                reference: "2".into(),
            }
        );

        let variables = vec![Variable::new("1", vec![at_most(1, ["1", "9"])])];
        assert!(matches!(compile(&variables), Err(CompileError::UnknownIdentifier { .. })));
    }

    #[test]
    fn test_compile_deduplicates_identical_clauses() {
        let variables = vec![
            Variable::new("1", vec![conflict("2")]),
            Variable::new("2", vec![conflict("1")]),
        ];
        let compiled = compile(&variables).unwrap();

        assert_eq!(compiled.clauses().len(), 1);
        assert_eq!(compiled.clauses().origins(0), &[0, 1]);
    }

    #[test]
    fn test_compile_self_referencing_at_most() {
        let variables = vec![
            Variable::new("1", vec![at_most(1, ["1", "2"])]),
            Variable::new("2", vec![]),
        ];
        let compiled = compile(&variables).unwrap();
        let clauses: Vec<Vec<Literal>> = compiled.clauses().iter().map(|(_, l)| l.to_vec()).collect();
        assert_eq!(clauses, vec![vec![-1, -2]]);
    }

    #[test]
    fn test_compile_allocates_counter_variables_after_inputs() {
        let ids: Vec<String> = (0..20).map(|i| format!("v{:02}", i)).collect();
        let mut variables: Vec<Variable> = ids.iter().map(|id| Variable::new(id.as_str(), vec![])).collect();
        variables[0].add_constraint(at_most(2, ids.iter().map(String::as_str)));

        let compiled = compile(&variables).unwrap();
        assert_eq!(compiled.num_input_vars(), 20);
        assert!(compiled.num_vars() > 20);

        let preferences = compiled.preferences().unwrap();
        assert_eq!(preferences[1], Preference::Optional { cost: 1 });
        assert!(preferences[21..]
            .iter()
            .all(|p| matches!(p, Preference::Optional { cost: 0 } | Preference::Pinned(false))));
    }

    #[test]
    fn test_preferences_pin_unit_clauses() {
        let variables = vec![
            Variable::new("1", vec![mandatory()]),
            Variable::new("2", vec![prohibited()]),
            Variable::new("3", vec![]),
        ];
        let preferences = compile(&variables).unwrap().preferences().unwrap();

        assert_eq!(preferences[1], Preference::Pinned(true));
        assert_eq!(preferences[2], Preference::Pinned(false));
        assert_eq!(preferences[3], Preference::Optional { cost: 1 });
    }

    #[test]
    fn test_preferences_detect_contradicting_units() {
        let variables = vec![
            Variable::new("1", vec![mandatory()]),
            Variable::new("2", vec![conflict("1"), conflict("2")]),
            Variable::new("3", vec![]),
        ];
        let compiled = compile(&variables).unwrap();
        assert!(compiled.preferences().is_ok());

        let variables = vec![Variable::new("1", vec![mandatory(), prohibited()])];
        let compiled = compile(&variables).unwrap();
        let conflict = compiled.preferences().unwrap_err();
        assert_eq!(conflict, UnitConflict { selected: 0, unselected: 1 });
    }
}

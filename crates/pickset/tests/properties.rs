//! Randomized checks of solver results against exhaustive enumeration.
//!
//! Variable sets are small enough to try every assignment, so satisfiability,
//! minimality and explanations can be verified directly.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pickset::constraint::{at_most, conflict, dependency, mandatory, or, prohibited};
use pickset::{AppliedConstraint, CancelToken, Constraint, Identifier, SolveOptions, Solver, Variable};

const CASES: u64 = 300;
const MAX_VARIABLES: usize = 6;

fn random_ids(rng: &mut StdRng, ids: &[String], max: usize) -> Vec<String> {
    let count = rng.random_range(0..=max.min(ids.len()));
    (0..count)
        .map(|_| ids[rng.random_range(0..ids.len())].clone())
        .collect()
}

fn random_constraint(rng: &mut StdRng, ids: &[String]) -> Constraint {
    let pick = |rng: &mut StdRng| ids[rng.random_range(0..ids.len())].clone();
    match rng.random_range(0..10) {
        0 => mandatory(),
        1 => prohibited(),
        2..=4 => dependency(random_ids(rng, ids, 3)),
        5 | 6 => conflict(pick(rng)),
        7 => {
            let targets = random_ids(rng, ids, ids.len());
            at_most(rng.random_range(0..3), targets)
        }
        _ => or(pick(rng), rng.random_bool(0.5), rng.random_bool(0.5)),
    }
}

fn random_variables(rng: &mut StdRng) -> Vec<Variable> {
    let count = rng.random_range(1..=MAX_VARIABLES);
    let ids: Vec<String> = (0..count).map(|i| format!("x{}", i)).collect();

    ids.iter()
        .map(|id| {
            let constraints = (0..rng.random_range(0..=2))
                .map(|_| random_constraint(rng, &ids))
                .collect::<Vec<_>>();
            Variable::new(id.as_str(), constraints)
        })
        .collect()
}

fn holds(owner: &Identifier, constraint: &Constraint, selection: &HashSet<&str>) -> bool {
    let on = |id: &Identifier| selection.contains(id.as_str());
    match constraint {
        Constraint::Mandatory => on(owner),
        Constraint::Prohibited => !on(owner),
        Constraint::Dependency { ids } => !on(owner) || ids.iter().any(on),
        Constraint::Conflict { id } => !(on(owner) && on(id)),
        Constraint::AtMost { n, ids } => ids.iter().filter(|id| on(*id)).count() <= *n,
        Constraint::Or {
            id,
            negate_owner,
            negate_target,
        } => on(owner) != *negate_owner || on(id) != *negate_target,
    }
}

fn satisfies(applied: &[AppliedConstraint], selection: &HashSet<&str>) -> bool {
    applied
        .iter()
        .all(|a| holds(&a.variable, &a.constraint, selection))
}

fn applied_of(variables: &[Variable]) -> Vec<AppliedConstraint> {
    variables
        .iter()
        .flat_map(|v| {
            v.constraints()
                .iter()
                .map(|c| AppliedConstraint::new(v.id().clone(), c.clone()))
        })
        .collect()
}

/// Try every subset of `ids`
fn brute_force_satisfiable(ids: &[&str], applied: &[AppliedConstraint]) -> bool {
    (0..1u32 << ids.len()).any(|mask| {
        let selection: HashSet<&str> = ids
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, id)| *id)
            .collect();
        satisfies(applied, &selection)
    })
}

#[tokio::test]
async fn test_solutions_match_exhaustive_search() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for case in 0..CASES {
        let variables = random_variables(&mut rng);
        let ids: Vec<&str> = variables.iter().map(|v| v.id().as_str()).collect();
        let applied = applied_of(&variables);

        let solution = Solver::new(variables.clone())
            .solve(&CancelToken::new(), &SolveOptions::default())
            .await
            .unwrap_or_else(|e| panic!("case {}: {}", case, e));

        match solution.error() {
            None => {
                let selection: HashSet<&str> = solution
                    .selected_variables()
                    .keys()
                    .map(Identifier::as_str)
                    .collect();
                assert!(
                    satisfies(&applied, &selection),
                    "case {}: selection {:?} violates {:?}",
                    case,
                    selection,
                    variables
                );

                for id in &selection {
                    let mut smaller = selection.clone();
                    smaller.remove(id);
                    assert!(
                        !satisfies(&applied, &smaller),
                        "case {}: {} could be unselected in {:?} for {:?}",
                        case,
                        id,
                        selection,
                        variables
                    );
                }
            }
            Some(error) => {
                assert!(
                    !brute_force_satisfiable(&ids, &applied),
                    "case {}: reported unsatisfiable but a selection exists for {:?}",
                    case,
                    variables
                );
                assert!(solution.selected_variables().is_empty());

                let explanation = error.constraints();
                assert!(!explanation.is_empty(), "case {}: empty explanation", case);
                assert!(
                    !brute_force_satisfiable(&ids, explanation),
                    "case {}: explanation {} is satisfiable",
                    case,
                    error
                );
                for skip in 0..explanation.len() {
                    let rest: Vec<AppliedConstraint> = explanation
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, a)| a.clone())
                        .collect();
                    assert!(
                        brute_force_satisfiable(&ids, &rest),
                        "case {}: {} is not needed in {}",
                        case,
                        explanation[skip],
                        error
                    );
                }
            }
        }
    }
}

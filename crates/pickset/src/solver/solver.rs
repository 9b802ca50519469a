use std::time::Instant;

use indexmap::IndexMap;
use log::debug;

use super::cancel::{CancelToken, Interrupt};
use super::compiler::ClauseCompiler;
use super::engine::{Engine, Outcome};
use super::options::SolveOptions;
use super::problem::explain;
use super::solution::Solution;
use crate::error::{Error, Result};
use crate::input::{Variable, VariableSource};

/// Resolves the variables of a [`VariableSource`] into a [`Solution`].
///
/// Every call to [`solve`](Self::solve) fetches a fresh variable set and
/// builds its own clauses, so a solver can be shared and reused.
#[derive(Debug, Clone)]
pub struct Solver<S> {
    source: S,
}

impl<S: VariableSource> Solver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Find a minimal selection that satisfies every constraint.
    ///
    /// Unsatisfiable constraints are reported through [`Solution::error`].
    /// An `Err` means no answer could be produced: the source failed, the
    /// input is malformed, or the solve was cancelled or timed out.
    pub async fn solve(&self, cancel: &CancelToken, options: &SolveOptions) -> Result<Solution> {
        let deadline = options
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));

        let variables = self.fetch(cancel, deadline).await?;
        debug!("Fetched {} variables", variables.len());

        let interrupt = Interrupt::new(cancel, deadline);
        resolve(variables, &interrupt, options.include_all_variables)
    }

    /// Fetch the variables, giving up as soon as the solve is cancelled or
    /// the deadline passes.
    async fn fetch(&self, cancel: &CancelToken, deadline: Option<Instant>) -> Result<Vec<Variable>> {
        let expired = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            _ = expired => Err(Error::DeadlineExceeded),
            variables = self.source.get_variables(cancel) => variables.map_err(Error::from),
        }
    }
}

fn resolve(variables: Vec<Variable>, interrupt: &Interrupt<'_>, include_all: bool) -> Result<Solution> {
    let compiled = ClauseCompiler::new(&variables)?.compile()?;
    let stats = compiled.clauses().stats();
    debug!(
        "Compiled {} constraints into {} clauses ({} unit, {} binary, longest {}) over {} variables ({} auxiliary)",
        compiled.applied().len(),
        stats.total,
        stats.unit,
        stats.binary,
        stats.longest,
        compiled.num_vars(),
        compiled.num_vars() - compiled.num_input_vars()
    );

    let all = include_all.then(|| variables.clone());

    let preferences = match compiled.preferences() {
        Ok(preferences) => preferences,
        Err(conflict) => {
            debug!(
                "Clauses {} and {} pin the same variable both ways",
                conflict.selected, conflict.unselected
            );
            let error = explain(&compiled, &conflict.clauses(), interrupt);
            return Ok(Solution::unsatisfiable(error, all));
        }
    };

    let active = compiled.clauses().ids();
    let (outcome, stats) = Engine::new(compiled.clauses(), &active, compiled.num_vars(), interrupt)
        .with_preferences(&preferences)
        .run();
    debug!(
        "Search finished: {} decisions, {} propagations, {} conflicts, {} flips",
        stats.decisions, stats.propagations, stats.conflicts, stats.flips
    );

    match outcome {
        Outcome::Satisfied(model) => {
            let selected: IndexMap<_, _> = variables
                .iter()
                .filter(|variable| {
                    compiled
                        .var_of(variable.id())
                        .is_some_and(|var| model[var as usize])
                })
                .map(|variable| (variable.id().clone(), variable.clone()))
                .collect();
            debug!("Selected {} of {} variables", selected.len(), variables.len());
            Ok(Solution::satisfied(selected, all))
        }
        Outcome::Unsatisfiable(core) => {
            debug!("Unsatisfiable, core of {} clauses", core.len());
            let error = explain(&compiled, &core, interrupt);
            Ok(Solution::unsatisfiable(error, all))
        }
        Outcome::Interrupted(interruption) => Err(interruption.into()),
    }
}

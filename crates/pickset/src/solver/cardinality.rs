//! Clause encodings of "at most n of these variables".
//!
//! Small bounds are encoded by forbidding every (n + 1)-subset outright.
//! Larger ones use the sequential counter encoding, which needs auxiliary
//! variables but only O(n * len) clauses.

use super::clause::{Literal, VarId};

/// Largest number of forbidden subsets emitted before switching to the
/// sequential counter.
pub(crate) const COMBINATORIAL_LIMIT: u64 = 64;

/// Encode `at most n of vars` as clauses.
///
/// `fresh` allocates auxiliary variables and is only called when the
/// sequential counter is used.
pub(crate) fn encode_at_most(
    vars: &[VarId],
    n: usize,
    fresh: &mut impl FnMut() -> VarId,
) -> Vec<Vec<Literal>> {
    if n >= vars.len() {
        return Vec::new();
    }
    if n == 0 {
        return vars.iter().map(|&var| vec![-(var as Literal)]).collect();
    }

    if binomial_at_most(vars.len(), n + 1, COMBINATORIAL_LIMIT) {
        combinatorial(vars, n)
    } else {
        sequential_counter(vars, n, fresh)
    }
}

/// Whether C(len, k) is no larger than `limit`
fn binomial_at_most(len: usize, k: usize, limit: u64) -> bool {
    let k = k.min(len - k) as u64;
    let len = len as u64;
    let mut value: u64 = 1;
    for i in 0..k {
        value = match value.checked_mul(len - i) {
            Some(product) => product / (i + 1),
            None => return false,
        };
        if value > limit {
            return false;
        }
    }
    true
}

/// One clause per (n + 1)-subset: not all of them may be selected
pub(crate) fn combinatorial(vars: &[VarId], n: usize) -> Vec<Vec<Literal>> {
    let k = n + 1;
    let len = vars.len();
    let mut clauses = Vec::new();
    if k > len {
        return clauses;
    }

    let mut picks: Vec<usize> = (0..k).collect();
    loop {
        clauses.push(picks.iter().map(|&i| -(vars[i] as Literal)).collect());

        let Some(i) = (0..k).rev().find(|&i| picks[i] < len - k + i) else {
            return clauses;
        };
        picks[i] += 1;
        for j in i + 1..k {
            picks[j] = picks[j - 1] + 1;
        }
    }
}

/// Sequential counter: register `s[i][j]` holds when more than `j` of the
/// first `i + 1` variables are selected.
pub(crate) fn sequential_counter(
    vars: &[VarId],
    n: usize,
    fresh: &mut impl FnMut() -> VarId,
) -> Vec<Vec<Literal>> {
    let len = vars.len();
    let mut clauses = Vec::new();
    if n == 0 || n >= len {
        return clauses;
    }

    let x = |i: usize| vars[i] as Literal;
    let mut s: Vec<Vec<Literal>> = Vec::with_capacity(len - 1);
    for _ in 0..len - 1 {
        let mut row = Vec::with_capacity(n);
        for _ in 0..n {
            row.push(fresh() as Literal);
        }
        s.push(row);
    }

    clauses.push(vec![-x(0), s[0][0]]);
    for j in 1..n {
        clauses.push(vec![-s[0][j]]);
    }

    for i in 1..len - 1 {
        clauses.push(vec![-x(i), s[i][0]]);
        clauses.push(vec![-s[i - 1][0], s[i][0]]);
        for j in 1..n {
            clauses.push(vec![-x(i), -s[i - 1][j - 1], s[i][j]]);
            clauses.push(vec![-s[i - 1][j], s[i][j]]);
        }
        clauses.push(vec![-x(i), -s[i - 1][n - 1]]);
    }

    clauses.push(vec![-x(len - 1), -s[len - 2][n - 1]]);
    clauses
}

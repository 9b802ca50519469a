use indexmap::IndexMap;

/// Solver variable index. Index 0 is never used so that every variable has
/// both a positive and a negative literal.
pub(crate) type VarId = u32;

/// A signed variable index: positive means "selected", negative means
/// "not selected".
pub(crate) type Literal = i32;

/// Position of a clause inside its [`ClauseSet`]
pub(crate) type ClauseId = usize;

pub(crate) fn var_of(literal: Literal) -> VarId {
    literal.unsigned_abs()
}

pub(crate) fn positive(var: VarId) -> Literal {
    var as Literal
}

/// Dense index for per-literal tables: `2 * var` for the positive literal,
/// `2 * var + 1` for the negative one.
pub(crate) fn literal_index(literal: Literal) -> usize {
    2 * var_of(literal) as usize + usize::from(literal < 0)
}

/// Deduplicated collection of clauses.
///
/// Literals inside a clause are sorted by variable, so two clauses with the
/// same literals in a different order are stored once. Each clause keeps the
/// indices of every applied constraint that produced it.
#[derive(Debug, Default)]
pub(crate) struct ClauseSet {
    clauses: IndexMap<Box<[Literal]>, Vec<usize>>,
}

/// Clause counts by shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ClauseStats {
    pub total: usize,
    pub unit: usize,
    pub binary: usize,
    pub longest: usize,
}

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause produced by the applied constraint `origin`.
    ///
    /// Returns `None` for clauses that contain a literal and its negation,
    /// since those always hold and are not stored.
    pub fn add(&mut self, mut literals: Vec<Literal>, origin: usize) -> Option<ClauseId> {
        literals.sort_by_key(|&literal| (var_of(literal), literal));
        literals.dedup();

        if literals.windows(2).any(|pair| var_of(pair[0]) == var_of(pair[1])) {
            return None;
        }

        let entry = self.clauses.entry(literals.into_boxed_slice());
        let id = entry.index();
        let origins = entry.or_default();
        if !origins.contains(&origin) {
            origins.push(origin);
        }
        Some(id)
    }

    pub fn literals(&self, id: ClauseId) -> &[Literal] {
        self.clauses.get_index(id).map(|(literals, _)| &literals[..]).unwrap_or(&[])
    }

    pub fn origins(&self, id: ClauseId) -> &[usize] {
        self.clauses.get_index(id).map(|(_, origins)| &origins[..]).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseId, &[Literal])> + '_ {
        self.clauses.keys().enumerate().map(|(id, literals)| (id, &literals[..]))
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Every clause id
    pub fn ids(&self) -> Vec<ClauseId> {
        (0..self.clauses.len()).collect()
    }

    pub fn stats(&self) -> ClauseStats {
        let mut stats = ClauseStats::default();
        for literals in self.clauses.keys() {
            stats.total += 1;
            match literals.len() {
                1 => stats.unit += 1,
                2 => stats.binary += 1,
                _ => {}
            }
            stats.longest = stats.longest.max(literals.len());
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_helpers() {
        assert_eq!(var_of(-3), 3);
        assert_eq!(var_of(3), 3);
        assert_eq!(positive(4), 4);
        assert_eq!(literal_index(1), 2);
        assert_eq!(literal_index(-1), 3);
    }

    #[test]
    fn test_clause_set_deduplicates_and_merges_origins() {
        let mut clauses = ClauseSet::new();
        let a = clauses.add(vec![-1, 2], 0).unwrap();
        let b = clauses.add(vec![2, -1], 1).unwrap();
        let c = clauses.add(vec![-1, 2, 2], 1).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses.literals(a), &[-1, 2]);
        assert_eq!(clauses.origins(a), &[0, 1]);
    }

    #[test]
    fn test_clause_set_drops_tautologies() {
        let mut clauses = ClauseSet::new();
        assert_eq!(clauses.add(vec![1, -1], 0), None);
        assert_eq!(clauses.add(vec![-2, 3, 2], 0), None);
        assert!(clauses.is_empty());
    }

    #[test]
    fn test_clause_set_stats() {
        let mut clauses = ClauseSet::new();
        clauses.add(vec![1], 0);
        clauses.add(vec![-1, 2], 1);
        clauses.add(vec![-2, 3, 4], 2);

        let stats = clauses.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unit, 1);
        assert_eq!(stats.binary, 1);
        assert_eq!(stats.longest, 3);
    }
}

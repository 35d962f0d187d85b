use std::cmp::Reverse;

use super::{
    assignment::Assignment,
    clause::ClauseDB,
    data::{LitVec, VarVec},
    Lit, Var,
};

/// Static branching order over the input variables.
///
/// Literals are ranked by how often they occur in the formula, most
/// frequent first, ties broken by first appearance. Each variable is
/// represented once, by its more frequent polarity.
#[derive(Default)]
pub(crate) struct VariableOrder {
    order: Vec<Lit>,
}

impl VariableOrder {
    /// Rank the literals of `db` and derive the initial pure literals
    /// (those whose complement occurs nowhere) from the same counts.
    pub fn build(db: &ClauseDB) -> (Self, Vec<Lit>) {
        let mut counts: LitVec<u32> = LitVec::new();
        let mut ranked: Vec<Lit> = Vec::new();

        for cls in db.iter() {
            for &lit in cls {
                counts.expand(-Lit::from(lit.var()), 0);
                if counts[lit] == 0 {
                    ranked.push(lit);
                }
                counts[lit] += 1;
            }
        }

        // Stable sort keeps first-appearance order between equal counts.
        ranked.sort_by_key(|&lit| Reverse(counts[lit]));

        let mut order = Vec::new();
        let mut chosen: VarVec<bool> = VarVec::new();
        for &lit in &ranked {
            chosen.expand(lit.var(), false);
            if !chosen[lit.var()] {
                chosen[lit.var()] = true;
                order.push(lit);
            }
        }

        let pure = ranked
            .iter()
            .copied()
            .filter(|&lit| counts[-lit] == 0)
            .collect();

        (Self { order }, pure)
    }

    /// The highest-ranked literal whose variable is still free.
    pub fn next_unassigned(&self, assignment: &Assignment) -> Option<Lit> {
        self.order
            .iter()
            .copied()
            .find(|&lit| assignment.is_lit_unassigned(lit))
    }

    /// Number of distinct variables in the formula.
    pub fn var_count(&self) -> usize {
        self.order.len()
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.order.iter().map(|lit| lit.var())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_of(clauses: &[&[i32]]) -> ClauseDB {
        let mut db = ClauseDB::default();
        for cls in clauses {
            let lits: Vec<Lit> = cls.iter().map(|&l| Lit::new(l)).collect();
            db.insert_clause(&lits);
        }
        db
    }

    #[test]
    fn most_frequent_polarity_ranks_first() {
        let db = db_of(&[&[-3, 1], &[-3, 2], &[-3, -1]]);
        let (order, _) = VariableOrder::build(&db);

        let vars: Vec<u32> = order.vars().map(|v| v.get()).collect();
        assert_eq!(vars, vec![3, 1, 2]);

        let mut assignment = Assignment::default();
        assignment.expand(Var::new(3));
        // Variable 3 only ever occurs negatively, so the order holds -3.
        assert_eq!(order.next_unassigned(&assignment), Some(Lit::new(-3)));
    }

    #[test]
    fn pure_literals_come_from_the_counts() {
        let db = db_of(&[&[-3, 1], &[-3, 2], &[-3, -1]]);
        let (_, pure) = VariableOrder::build(&db);
        assert_eq!(pure, vec![Lit::new(-3), Lit::new(2)]);
    }

    #[test]
    fn frequency_ties_keep_first_appearance() {
        let db = db_of(&[&[2, 1], &[-1, -2]]);
        let (order, pure) = VariableOrder::build(&db);

        let vars: Vec<u32> = order.vars().map(|v| v.get()).collect();
        assert_eq!(vars, vec![2, 1]);
        assert!(pure.is_empty());
    }
}

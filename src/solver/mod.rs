mod assignment;
mod clause;
mod data;
mod log;
mod order;
mod propagate;
mod search;
mod watch;

use assignment::Assignment;
use clause::{ClauseDB, ClauseIdx};
use data::LitVec;
pub use data::{Lit, Var};
use order::VariableOrder;
use tracing::debug;
use watch::Watch;

/// Counters accumulated over `solve`.
#[derive(Debug, Default)]
pub struct Stats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
}

#[derive(Default)]
pub struct Solver {
    clause_db: ClauseDB,

    watches: LitVec<Vec<Watch>>,

    assignment: Assignment,

    /// Static branching order, built by `initialise` before the search.
    order: VariableOrder,

    /// Seed literals for the root: unit clauses and initial pure literals.
    initial_units: Vec<Lit>,
    initialised: bool,

    /// The input formula is trivially unsat because an empty clause was
    /// added.
    trivially_unsat: bool,

    stats: Stats,
}

pub struct Model<'a> {
    assignment: &'a Assignment,
    order: &'a VariableOrder,
}

impl<'a> Model<'a> {
    /// Get truth assignment of literal.
    pub fn lit(&self, l: i32) -> bool {
        self.assignment.is_lit_satisfied(Lit::new(l))
    }

    /// The model as signed integers in ascending variable order, one
    /// entry for every variable that appears in the input.
    pub fn as_vec(&self) -> Vec<i32> {
        let mut lits: Vec<i32> = self
            .order
            .vars()
            .map(|var| {
                self.assignment
                    .value(var)
                    .expect("model is total over the input variables")
                    .as_int()
            })
            .collect();
        lits.sort_by_key(|lit| lit.unsigned_abs());
        lits
    }
}

impl std::fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Model").field(&self.as_vec()).finish()
    }
}

#[derive(Debug)]
pub struct Proof;

#[derive(Debug)]
pub enum Result<'a> {
    Sat(Model<'a>),
    Unsat(Proof),
}

impl<'a> Result<'a> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Result::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Result::Unsat(_))
    }

    pub fn unwrap_sat(self) -> Model<'a> {
        match self {
            Result::Sat(model) => model,
            Result::Unsat(_) => panic!("Result is not SAT."),
        }
    }

    pub fn unwrap_unsat(self) -> Proof {
        match self {
            Result::Unsat(proof) => proof,
            Result::Sat(_) => panic!("Result is SAT."),
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dimacs(input: &str) -> std::result::Result<Solver, Box<dyn std::error::Error>> {
        let clauses = crate::dimacs::Dimacs::parse(input)?;

        let mut solver = Solver::new();
        for clause in clauses {
            solver.add_clause(clause);
        }

        Ok(solver)
    }

    /// Remove duplicated literals.
    /// Returns true if the clause is trivially satisfied (i.e. contains
    /// positive and negative literal of the same variable).
    fn normalise_clause(cls: &mut Vec<Lit>) -> bool {
        cls.sort_by_key(|lit| lit.var().get());
        cls.dedup();

        cls.windows(2).any(|pair| pair[0].var() == pair[1].var())
    }

    pub fn add_clause<I>(&mut self, cls: I)
    where
        I: IntoIterator<Item = i32>,
    {
        let mut cls: Vec<Lit> = cls.into_iter().map(Lit::new).collect();

        if Self::normalise_clause(&mut cls) {
            return;
        }

        if let Some(max_lit) = cls.iter().max_by_key(|l| l.var().get()) {
            self.assignment.expand(max_lit.var());
            self.watches.expand(-Lit::from(max_lit.var()), Vec::new());
        }

        if cls.is_empty() {
            self.trivially_unsat = true;
        } else {
            // Unit clauses land in the database too; they count toward
            // the branching order and are seeded at initialisation.
            self.clause_db.insert_clause(&cls);
        }
    }

    /// Build the branching order and the watch index: seed pure literals
    /// and unit clauses, install positions 0 and 1 of every other clause
    /// as its watchers. Content-duplicate clauses stay unwatched so no
    /// clause is watched twice.
    fn initialise(&mut self) {
        if self.initialised {
            return;
        }

        let (order, pure) = VariableOrder::build(&self.clause_db);
        self.order = order;

        let mut seed = pure;
        for idx in self.clause_db.indices() {
            let cls = self.clause_db.get(idx);
            if let [unit] = cls {
                seed.push(*unit);
            } else if !self.is_duplicate(idx) {
                let pair = [cls[0], cls[1]];
                self.clause_db.install_watchers(idx, pair);
                for lit in pair {
                    self.watches[lit].push(Watch { clause: idx });
                }
            }
        }

        self.initial_units = seed;
        self.initialised = true;
    }

    /// Content comparison against the clauses already watching this
    /// clause's first literal. Normalisation sorts literals, so duplicate
    /// clauses compare equal.
    fn is_duplicate(&self, idx: ClauseIdx) -> bool {
        let cls = self.clause_db.get(idx);
        self.watches[cls[0]]
            .iter()
            .any(|watch| self.clause_db.get(watch.clause) == cls)
    }

    pub fn solve(&mut self) -> Result {
        if self.trivially_unsat {
            return Result::Unsat(Proof);
        }

        self.initialise();
        self.log_state();

        let seed = self.initial_units.clone();
        if self.search(seed, None) {
            assert!(
                self.check_assignment(),
                "Generated assignment doesn't satisfy the input formula"
            );
            let model = self.extract_model();
            debug!("Satisfying assignment found! {:?}", model.as_vec());
            Result::Sat(model)
        } else {
            debug!("Problem is Unsat");
            Result::Unsat(Proof)
        }
    }

    fn extract_model(&self) -> Model {
        Model {
            assignment: &self.assignment,
            order: &self.order,
        }
    }

    /// Check that the current assignment satisfies the entire input
    /// formula.
    fn check_assignment(&self) -> bool {
        self.clause_db
            .iter()
            .all(|clause| self.assignment.is_clause_satisfied(clause))
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Every watched clause sits in exactly the two watch lists named by
    /// its watcher pair; unwatched clauses sit in none.
    #[cfg(test)]
    pub(crate) fn watch_invariant_holds(&self) -> bool {
        self.clause_db.indices().all(|idx| {
            let entries = self
                .watches
                .iter()
                .flat_map(|list| list.iter())
                .filter(|watch| watch.clause == idx)
                .count();

            match self.clause_db.watchers(idx) {
                Some([a, b]) => {
                    let in_a = self.watches[a].iter().any(|watch| watch.clause == idx);
                    let in_b = self.watches[b].iter().any(|watch| watch.clause == idx);
                    in_a && in_b && entries == 2
                }
                None => entries == 0,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_formula_is_sat() {
        let mut solver = Solver::new();
        let result = solver.solve();
        assert!(result.is_sat());
        assert!(result.unwrap_sat().as_vec().is_empty());
    }

    #[test]
    fn empty_clause_is_unsat() {
        let mut solver = Solver::new();
        solver.add_clause([]);
        assert!(solver.solve().is_unsat());
    }

    #[test]
    fn single_unit() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        let model = solver.solve().unwrap_sat().as_vec();
        assert_eq!(model, vec![1]);
    }

    #[test]
    fn contradictory_units() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([-1]);
        assert!(solver.solve().is_unsat());
    }

    #[test]
    #[should_panic(expected = "Literals cant be zero")]
    fn zero_literal_is_rejected() {
        let mut solver = Solver::new();
        solver.add_clause([0]);
    }

    #[test]
    fn propagation_chain() {
        let mut solver = Solver::new();
        solver.add_clause([-1, 2, 3]);
        solver.add_clause([-1, -2]);
        solver.add_clause([1]);

        let result = solver.solve();
        assert!(result.is_sat());
        let model = result.unwrap_sat();
        assert!(model.lit(1));
        assert!(!model.lit(2));
    }

    #[test]
    fn forced_assignments() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2, 3]);
        solver.add_clause([-1]);
        solver.add_clause([-2]);
        assert_eq!(solver.solve().unwrap_sat().as_vec(), vec![-1, -2, 3]);
    }

    #[test]
    fn both_polarities_square_is_unsat() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2]);
        solver.add_clause([-1, 2]);
        solver.add_clause([1, -2]);
        solver.add_clause([-1, -2]);

        assert!(solver.solve().is_unsat());
        assert!(solver.watch_invariant_holds());
        assert!(solver.stats().conflicts > 0);
    }

    #[test]
    fn model_satisfies_every_clause() {
        let clauses = [vec![1, -2], vec![-1, 2], vec![1, 2]];
        let mut solver = Solver::new();
        for cls in &clauses {
            solver.add_clause(cls.iter().copied());
        }

        let model = solver.solve().unwrap_sat();
        for cls in &clauses {
            assert!(cls.iter().any(|&l| model.lit(l)));
        }
    }

    #[test]
    fn pure_literal_is_asserted_up_front() {
        // 3 only occurs positively, so it is true before any branching.
        let mut solver = Solver::new();
        solver.add_clause([1, 3]);
        solver.add_clause([-1, 3]);
        assert!(solver.solve().unwrap_sat().as_vec().contains(&3));
    }

    #[test]
    fn tautological_clause_is_dropped() {
        let mut solver = Solver::new();
        solver.add_clause([1, -1]);
        let result = solver.solve();
        assert!(result.is_sat());
        assert!(result.unwrap_sat().as_vec().is_empty());
    }

    #[test]
    fn duplicate_clauses_are_watched_once() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2]);
        solver.add_clause([1, 2]);
        solver.add_clause([2, 1]); // identical after normalisation
        solver.initialise();

        assert!(solver.watch_invariant_holds());
        assert!(solver.solve().is_sat());
    }

    #[test]
    fn migrated_watches_stay_consistent() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2, 3]);
        solver.add_clause([1, 2, -3]);
        solver.add_clause([-1, -2, 3]);
        solver.add_clause([-2, -3]);

        assert!(solver.solve().is_sat());
        assert!(solver.watch_invariant_holds());
    }

    #[test]
    fn variable_numbering_may_have_gaps() {
        let mut solver = Solver::new();
        solver.add_clause([7, -9]);
        solver.add_clause([9]);

        let model = solver.solve().unwrap_sat().as_vec();
        assert_eq!(model, vec![7, 9]);
    }
}

/// Two-watched-literal unit propagation.
use std::collections::VecDeque;

use tracing::debug;

use super::{watch::Watch, Lit, Solver};

/// Outcome of asserting a single literal.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SetResult {
    /// Some clause watching the falsified complement ran out of literals.
    Conflict,

    /// Unit literals discovered by the walk, and the last free literal
    /// installed as a new watcher, if any. An empty unit set is an
    /// ordinary success, distinct from a conflict.
    Propagated {
        units: Vec<Lit>,
        last_free: Option<Lit>,
    },
}

/// Outcome of draining the unit queue.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Propagation {
    Conflict,

    /// Every literal asserted by this run, in assertion order, plus the
    /// last free watcher encountered anywhere in it.
    Done {
        trail: Vec<Lit>,
        last_free: Option<Lit>,
    },
}

impl Solver {
    /// Assert `lit` as true and repair the watch invariant for every
    /// clause watching the now-false `-lit`.
    ///
    /// The watch list of `-lit` is partitioned in place: clauses that are
    /// satisfied or have become unit stay, clauses with two or more free
    /// literals migrate to a free non-watcher. On conflict the walk stops
    /// and the unvisited rest of the list is kept as is, so the invariant
    /// holds for every clause.
    pub(crate) fn set_literal(&mut self, lit: Lit) -> SetResult {
        debug_assert!(self.assignment.is_lit_unassigned(lit));

        self.assignment.assign_lit(lit);
        self.stats.propagations += 1;

        let mut conflict = false;
        let mut units = Vec::new();
        let mut last_free = None;

        // Take the list out of the index so the walk can push migrated
        // clauses into other lists. Putting it back is a pointer swap.
        let mut lit_watches = std::mem::take(&mut self.watches[-lit]);
        lit_watches.retain(|watch| {
            // Once a conflict is latched, `retain` keeps the rest of the
            // list untouched.
            if conflict {
                return true;
            }

            let cls_idx = watch.clause;
            let cls = self.clause_db.get(cls_idx);

            // A satisfied clause may keep a false watcher.
            if self.assignment.is_clause_satisfied(cls) {
                return true;
            }

            let mut free = cls
                .iter()
                .copied()
                .filter(|&l| self.assignment.is_lit_unassigned(l));

            match (free.next(), free.next()) {
                (None, _) => {
                    conflict = true;
                    true
                }
                (Some(unit), None) => {
                    units.push(unit);
                    true
                }
                (Some(first), Some(second)) => {
                    // `-lit` is assigned, so at most one of the two free
                    // literals can be the other watcher.
                    let new_watcher = if self.clause_db.is_watcher(cls_idx, first) {
                        second
                    } else {
                        first
                    };

                    self.clause_db.replace_watcher(cls_idx, -lit, new_watcher);
                    self.watches[new_watcher].push(Watch { clause: cls_idx });
                    last_free = Some(new_watcher);
                    false
                }
            }
        });

        // No migration ever targets `-lit`, its watch list is still empty.
        debug_assert!(self.watches[-lit].is_empty());
        self.watches[-lit] = lit_watches;

        if conflict {
            debug!("asserting {lit} emptied a clause");
            SetResult::Conflict
        } else {
            SetResult::Propagated { units, last_free }
        }
    }

    /// Drain `seed` and everything it implies through the watch index.
    ///
    /// On conflict the trail is rolled back before returning, so every
    /// variable asserted by this run is free again.
    pub(crate) fn propagate(&mut self, seed: Vec<Lit>) -> Propagation {
        let mut queue: VecDeque<Lit> = seed.into();
        let mut trail: Vec<Lit> = Vec::new();
        let mut last_free = None;

        while let Some(lit) = queue.pop_front() {
            if self.assignment.is_lit_satisfied(lit) {
                // Duplicate unit, already asserted on this branch.
                continue;
            }
            if self.assignment.is_lit_unsatisfied(lit) {
                // Both polarities made it into the queue.
                self.stats.conflicts += 1;
                self.undo_trail(&trail);
                return Propagation::Conflict;
            }

            trail.push(lit);
            match self.set_literal(lit) {
                SetResult::Conflict => {
                    self.stats.conflicts += 1;
                    self.undo_trail(&trail);
                    return Propagation::Conflict;
                }
                SetResult::Propagated { units, last_free: free } => {
                    for unit in units {
                        if queue.contains(&-unit) {
                            // Both polarities are pending.
                            debug!("complementary units {unit} and {}", -unit);
                            self.stats.conflicts += 1;
                            self.undo_trail(&trail);
                            return Propagation::Conflict;
                        }
                        queue.push_back(unit);
                    }
                    if free.is_some() {
                        last_free = free;
                    }
                }
            }
        }

        Propagation::Done { trail, last_free }
    }

    /// Roll the assignment back. Watch lists are never restored; an
    /// unassigned literal is always a legal watcher.
    pub(crate) fn undo_trail(&mut self, trail: &[Lit]) {
        for &lit in trail {
            self.assignment.unassign_lit(lit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_rolls_back_the_whole_trail() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([-1, 2]);
        solver.add_clause([-1, -2]);
        solver.initialise();

        let seed = solver.initial_units.clone();
        assert_eq!(solver.propagate(seed), Propagation::Conflict);

        assert!(solver.assignment.is_lit_unassigned(Lit::new(1)));
        assert!(solver.assignment.is_lit_unassigned(Lit::new(2)));
        assert!(solver.watch_invariant_holds());
    }

    #[test]
    fn migration_reports_the_last_free_watcher() {
        let mut solver = Solver::new();
        solver.add_clause([-1, 2, 3]);
        solver.add_clause([1, -2, -3]);
        solver.initialise();
        assert!(solver.initial_units.is_empty());

        match solver.set_literal(Lit::new(1)) {
            SetResult::Propagated { units, last_free } => {
                assert!(units.is_empty());
                assert_eq!(last_free, Some(Lit::new(3)));
            }
            SetResult::Conflict => panic!("no conflict expected"),
        }
        assert!(solver.watch_invariant_holds());
    }

    #[test]
    fn unit_clauses_stay_in_their_watch_list() {
        let mut solver = Solver::new();
        solver.add_clause([-1, 2]);
        solver.initialise();

        match solver.set_literal(Lit::new(1)) {
            SetResult::Propagated { units, last_free } => {
                assert_eq!(units, vec![Lit::new(2)]);
                assert_eq!(last_free, None);
            }
            SetResult::Conflict => panic!("no conflict expected"),
        }
        assert!(solver.watch_invariant_holds());
    }
}

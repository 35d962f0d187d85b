use tracing::debug;

use super::{
    propagate::{Propagation, SetResult},
    Lit, Solver,
};

impl Solver {
    /// Recursive DPLL branch.
    ///
    /// Propagates the seed units, then splits on the next free variable
    /// until the assignment is total or both polarities are exhausted.
    /// Returns whether a satisfying assignment was reached; on failure
    /// everything this invocation asserted has been undone.
    pub(crate) fn search(&mut self, seed: Vec<Lit>, mut hint: Option<Lit>) -> bool {
        let trail = if seed.is_empty() {
            // Nothing to propagate, the hint from the parent branch stays
            // live.
            Vec::new()
        } else {
            match self.propagate(seed) {
                Propagation::Conflict => return false,
                Propagation::Done { trail, last_free } => {
                    hint = last_free;
                    trail
                }
            }
        };

        if self.assignment.assigned_vars() == self.order.var_count() {
            return true;
        }

        // The free-watcher hint may have been assigned by later
        // propagation; an incomplete assignment always leaves the order
        // with a fallback.
        let branch = hint
            .filter(|&lit| self.assignment.is_lit_unassigned(lit))
            .or_else(|| self.order.next_unassigned(&self.assignment))
            .expect("incomplete assignment with no free variable in the order");

        // The retained polarity first, then its complement.
        for lit in [branch, -branch] {
            self.stats.decisions += 1;
            debug!("branching on {lit}");

            match self.set_literal(lit) {
                SetResult::Conflict => {
                    self.stats.conflicts += 1;
                    self.assignment.unassign_lit(lit);
                }
                SetResult::Propagated { units, last_free } => {
                    if self.search(units, last_free) {
                        return true;
                    }
                    self.assignment.unassign_lit(lit);
                }
            }
        }

        debug!("both polarities of {branch} failed, unwinding");
        self.undo_trail(&trail);
        false
    }
}

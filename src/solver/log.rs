use tracing::{debug, instrument};

use super::{assignment::Assignment, Lit, Solver};

const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const END: &str = "\u{1b}[0m";

impl Solver {
    #[instrument(skip_all)]
    pub(crate) fn log_state(&self) {
        #[cfg(debug_assertions)]
        for cls in self.clause_db.iter() {
            let cls_str = self.assignment.fmt_clause(cls);
            debug!("{cls_str}");
        }
    }
}

impl Assignment {
    pub(crate) fn fmt_lit(&self, lit: Lit) -> String {
        match self.get(lit) {
            Some(true) => format!("{GREEN}{lit}{END}"),
            Some(false) => format!("{RED}{lit}{END}"),
            None => format!("{lit}"),
        }
    }

    pub(crate) fn fmt_clause(&self, clause: &[Lit]) -> String {
        let lits: Vec<String> = clause.iter().map(|&lit| self.fmt_lit(lit)).collect();
        lits.join(", ")
    }
}

//! A DPLL satisfiability solver for CNF formulas, built around
//! two-watched-literal unit propagation, pure-literal seeding and a
//! frequency-ordered branching heuristic.

pub mod dimacs;
mod solver;

pub use solver::{Lit, Model, Proof, Result, Solver, Stats, Var};

/// Clauses are stored contiguously in one arena and addressed by index.
/// Clause contents never change after insertion; the only mutable piece
/// of a clause is its pair of watched literals.
use std::ops::Range;

use super::Lit;

pub type Clause<'db> = &'db [Lit];

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ClauseIdx(u32);

#[derive(Debug, Clone)]
struct ClauseMeta {
    range: Range<u32>,

    /// The two literals currently watching the clause, designated by
    /// value. `None` for clauses that are never watched: unit clauses and
    /// content-duplicates skipped at watch installation.
    watched: Option<[Lit; 2]>,
}

#[derive(Clone, Default)]
pub struct ClauseDB {
    clause_data: Vec<Lit>,
    clause_meta: Vec<ClauseMeta>,
}

impl ClauseDB {
    pub fn insert_clause(&mut self, cls: Clause) -> ClauseIdx {
        debug_assert!(!cls.is_empty(), "Insertion of empty clause.");
        debug_assert!(u32::try_from(self.clause_data.len() + cls.len()).is_ok());

        let start = self.clause_data.len() as u32;
        self.clause_data.extend_from_slice(cls);
        let end = self.clause_data.len() as u32;

        let idx = ClauseIdx(self.clause_meta.len() as u32);
        self.clause_meta.push(ClauseMeta {
            range: start..end,
            watched: None,
        });
        idx
    }

    pub fn get(&self, idx: ClauseIdx) -> Clause {
        let range = &self.clause_meta[idx.0 as usize].range;
        &self.clause_data[range.start as usize..range.end as usize]
    }

    /// All clause indices. The iterator borrows nothing, so the database
    /// may be mutated while walking it.
    pub fn indices(&self) -> impl Iterator<Item = ClauseIdx> {
        (0..self.clause_meta.len() as u32).map(ClauseIdx)
    }

    pub fn iter(&self) -> impl Iterator<Item = Clause<'_>> {
        self.clause_meta
            .iter()
            .map(|meta| &self.clause_data[meta.range.start as usize..meta.range.end as usize])
    }

    #[allow(unused)]
    pub fn watchers(&self, idx: ClauseIdx) -> Option<[Lit; 2]> {
        self.clause_meta[idx.0 as usize].watched
    }

    pub fn is_watcher(&self, idx: ClauseIdx, lit: Lit) -> bool {
        match self.clause_meta[idx.0 as usize].watched {
            Some(pair) => pair[0] == lit || pair[1] == lit,
            None => false,
        }
    }

    pub fn install_watchers(&mut self, idx: ClauseIdx, pair: [Lit; 2]) {
        let meta = &mut self.clause_meta[idx.0 as usize];
        debug_assert!(meta.watched.is_none());
        meta.watched = Some(pair);
    }

    /// Swap one watcher of the clause for another, keeping the second in
    /// place. The caller moves the clause between the watch lists.
    pub fn replace_watcher(&mut self, idx: ClauseIdx, old: Lit, new: Lit) {
        let watched = self.clause_meta[idx.0 as usize]
            .watched
            .as_mut()
            .expect("unwatched clause turned up in a watch list");

        if watched[0] == old {
            watched[0] = new;
        } else {
            debug_assert!(watched[1] == old);
            watched[1] = new;
        }
    }
}

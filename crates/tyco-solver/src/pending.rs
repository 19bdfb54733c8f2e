//! The pending-checks stack that breaks cycles in recursive structural
//! checks (spec §4.3.2 rule 1, §5, §9).
//!
//! Every entry point that performs a structural comparison pushes the
//! `(from, to)` pair it is deciding before recursing, and pops it on every
//! exit path, including error paths. Omitting the pop on an error path is
//! the single most damaging bug this module's callers can introduce: it
//! causes unrelated later checks to falsely report a cycle.

use rustc_hash::FxHashSet;
use std::cell::RefCell;
use tyco_common::limits::MAX_PENDING_CHECKS;
use tyco_model::TypeId;

/// A `(from, to)` pair currently being decided.
pub type PendingPair = (TypeId, TypeId);

/// Tracks in-flight structural checks for one assignability (or equality)
/// call tree. Not `Sync`: one instance belongs to one single-threaded
/// compilation (spec §5).
#[derive(Default)]
pub struct PendingChecks {
    seen: RefCell<FxHashSet<PendingPair>>,
}

/// RAII guard returned by `PendingChecks::enter`. Pops its pair on drop,
/// so every exit path — return, `?`, panic unwinding — releases it.
pub struct PendingGuard<'a> {
    checks: &'a PendingChecks,
    pair: PendingPair,
    /// `None` if this guard's pair was already pending when entered: in
    /// that case there is nothing to pop, since some enclosing guard owns
    /// the insertion.
    owns_entry: bool,
}

impl PendingChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Already` if `(from, to)` is already being checked (the
    /// caller should treat this as success per rule §4.3.2 #1 and must
    /// not recurse further), or `Entered(guard)` if this call now owns
    /// the pair and should proceed with the structural comparison.
    pub fn enter(&self, from: TypeId, to: TypeId) -> PendingOutcome<'_> {
        let pair = (from, to);
        let mut seen = self.seen.borrow_mut();
        if seen.contains(&pair) {
            tracing::trace!(?pair, "pending check already in flight, treating as success");
            return PendingOutcome::AlreadyPending;
        }
        assert!(
            seen.len() < MAX_PENDING_CHECKS,
            "pending-checks stack exceeded {MAX_PENDING_CHECKS} entries; \
             likely a declaration whose structural depth grows without bound"
        );
        seen.insert(pair);
        tracing::trace!(?pair, depth = seen.len(), "entered pending check");
        PendingOutcome::Entered(PendingGuard {
            checks: self,
            pair,
            owns_entry: true,
        })
    }

    pub fn depth(&self) -> usize {
        self.seen.borrow().len()
    }
}

pub enum PendingOutcome<'a> {
    AlreadyPending,
    Entered(PendingGuard<'a>),
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.owns_entry {
            self.checks.seen.borrow_mut().remove(&self.pair);
            tracing::trace!(pair = ?self.pair, "released pending check");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_owns_the_pair() {
        let checks = PendingChecks::new();
        match checks.enter(TypeId::U32, TypeId::I64) {
            PendingOutcome::Entered(_guard) => {}
            PendingOutcome::AlreadyPending => panic!("first entry should not be pending"),
        }
    }

    #[test]
    fn reentry_while_pending_reports_already_pending() {
        let checks = PendingChecks::new();
        let _guard = match checks.enter(TypeId::U32, TypeId::I64) {
            PendingOutcome::Entered(g) => g,
            PendingOutcome::AlreadyPending => unreachable!(),
        };
        match checks.enter(TypeId::U32, TypeId::I64) {
            PendingOutcome::AlreadyPending => {}
            PendingOutcome::Entered(_) => panic!("should have detected the cycle"),
        }
    }

    #[test]
    fn pair_is_released_on_drop() {
        let checks = PendingChecks::new();
        {
            let _guard = match checks.enter(TypeId::U32, TypeId::I64) {
                PendingOutcome::Entered(g) => g,
                PendingOutcome::AlreadyPending => unreachable!(),
            };
            assert_eq!(checks.depth(), 1);
        }
        assert_eq!(checks.depth(), 0);
        match checks.enter(TypeId::U32, TypeId::I64) {
            PendingOutcome::Entered(_) => {}
            PendingOutcome::AlreadyPending => panic!("pair should have been released"),
        }
    }

    #[test]
    fn distinct_pairs_do_not_collide() {
        let checks = PendingChecks::new();
        let _a = match checks.enter(TypeId::U32, TypeId::I64) {
            PendingOutcome::Entered(g) => g,
            PendingOutcome::AlreadyPending => unreachable!(),
        };
        match checks.enter(TypeId::I64, TypeId::U32) {
            PendingOutcome::Entered(_) => {}
            PendingOutcome::AlreadyPending => panic!("reversed pair is a distinct entry"),
        }
    }
}

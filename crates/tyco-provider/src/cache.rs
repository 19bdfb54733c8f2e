//! Per-node cache state machine (spec §4.5, §5): `absent → Unset(computing)
//! → Computed(T) → Invalidated`, plus reverse-dependency tracking so
//! invalidating one node can transitively invalidate everything that used
//! its type while being computed.

use rustc_hash::{FxHashMap, FxHashSet};
use tyco_common::node::NodeId;
use tyco_model::id::TypeId;

/// One node's cached inference state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    /// Inference is in flight; a re-entrant lookup observes this and the
    /// enclosing assignability check treats it as success (rule §4.3.2 #4).
    Computing,
    Computed(TypeId),
    Invalidated,
}

/// The provider's per-node cache. Node identity (`NodeId`) is the only key;
/// there is no separate symbol layer in this core (that lives in the
/// out-of-scope binder).
#[derive(Default)]
pub struct NodeCache {
    entries: FxHashMap<NodeId, CacheState>,
    /// `dependents[n]` is the set of nodes whose last computation read
    /// `n`'s type. Populated by `record_dependency` while a computation is
    /// in flight; consulted by `invalidate` to cascade.
    dependents: FxHashMap<NodeId, FxHashSet<NodeId>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<CacheState> {
        self.entries.get(&node).copied()
    }

    pub fn begin_computing(&mut self, node: NodeId) {
        self.entries.insert(node, CacheState::Computing);
    }

    pub fn finish(&mut self, node: NodeId, ty: TypeId) {
        self.entries.insert(node, CacheState::Computed(ty));
    }

    /// Records that computing `dependent` read `dependency`'s cached type,
    /// so invalidating `dependency` later also invalidates `dependent`.
    pub fn record_dependency(&mut self, dependent: NodeId, dependency: NodeId) {
        self.dependents.entry(dependency).or_default().insert(dependent);
    }

    /// Marks `node` invalidated and transitively invalidates every node
    /// that depended on it while it was cached. Returns the count of nodes
    /// moved to `Invalidated` (including `node` itself, if it was cached).
    pub fn invalidate(&mut self, node: NodeId) -> usize {
        let mut stack = vec![node];
        let mut touched = 0;
        while let Some(current) = stack.pop() {
            let was_cached = matches!(
                self.entries.insert(current, CacheState::Invalidated),
                Some(CacheState::Computed(_)) | Some(CacheState::Computing)
            );
            if was_cached {
                touched += 1;
                tracing::debug!(node = %current, "invalidated cached type");
            }
            if let Some(dependents) = self.dependents.remove(&current) {
                stack.extend(dependents);
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_has_no_cache_state() {
        let cache = NodeCache::new();
        assert_eq!(cache.get(NodeId(1)), None);
    }

    #[test]
    fn computed_round_trips() {
        let mut cache = NodeCache::new();
        cache.begin_computing(NodeId(1));
        assert_eq!(cache.get(NodeId(1)), Some(CacheState::Computing));
        cache.finish(NodeId(1), TypeId::U32);
        assert_eq!(cache.get(NodeId(1)), Some(CacheState::Computed(TypeId::U32)));
    }

    #[test]
    fn invalidate_marks_node_invalidated() {
        let mut cache = NodeCache::new();
        cache.begin_computing(NodeId(1));
        cache.finish(NodeId(1), TypeId::U32);
        assert_eq!(cache.invalidate(NodeId(1)), 1);
        assert_eq!(cache.get(NodeId(1)), Some(CacheState::Invalidated));
    }

    #[test]
    fn invalidate_cascades_through_recorded_dependencies() {
        let mut cache = NodeCache::new();
        cache.begin_computing(NodeId(1));
        cache.finish(NodeId(1), TypeId::U32);
        cache.begin_computing(NodeId(2));
        cache.record_dependency(NodeId(2), NodeId(1));
        cache.finish(NodeId(2), TypeId::STRING);

        let touched = cache.invalidate(NodeId(1));
        assert_eq!(touched, 2);
        assert_eq!(cache.get(NodeId(2)), Some(CacheState::Invalidated));
    }

    #[test]
    fn invalidating_an_uncached_node_touches_nothing() {
        let mut cache = NodeCache::new();
        assert_eq!(cache.invalidate(NodeId(42)), 0);
    }
}

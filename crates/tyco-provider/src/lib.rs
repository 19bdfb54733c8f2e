//! Maps host AST nodes to inferred types, memoizing per node and resolving
//! `Reference` types to their declared (generically substituted) bodies.
//!
//! This crate is the one place that depends on both `tyco-model` (the type
//! representation) and `tyco-solver` (the structural decision procedures):
//! it supplies the `ResolveReference` closure every `tyco-solver` entry
//! point needs, by routing through its own `resolve_reference`, and never
//! the other way around.
//! - `host` - the three external collaborators (`AstProducer`, `ScopeProvider`, `Workspace`)
//! - `cache` - the per-node cache state machine and reverse-dependency invalidation
//! - `provider` - `TypeProvider`: `typeOf`, `resolveReference`, `invalidate`

pub mod cache;
pub mod host;
pub mod provider;

pub use cache::{CacheState, NodeCache};
pub use host::{AstProducer, AttributeNode, HostError, MethodNode, NodeShape, ParamNode, ScopeProvider, Workspace};
pub use provider::TypeProvider;

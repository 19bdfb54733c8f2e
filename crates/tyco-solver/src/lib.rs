//! Type utilities: the structural decision procedures consulted during
//! checking and linking, operating purely on `TypeId`/`TypeData` values
//! handed to it by `tyco-model`.
//!
//! This crate never depends on `tyco-provider`: every operation that needs
//! to resolve a `Reference` to its declared body takes a `ResolveReference`
//! closure from its caller rather than reaching for a resolver of its own.
//! Submodules:
//! - `pending` - the recursion-guard stack shared by every structural check
//! - `numeric` - numeric promotion table
//! - `equality` - `areEqual`
//! - `assignability` - `isAssignable`, the central subtyping relation
//! - `substitution` - generic substitution (`substitute`)
//! - `simplify` - `Union`/`Join` flattening and the `asStructType`/`asInterfaceType` views
//! - `lub` - structural least-upper-bound by category
//! - `common_type` - `getCommonType`, the ordered rules for heterogeneous expressions
//! - `narrow` - control-flow narrowing
//! - `castability` - `canCast` for the three cast forms
//! - `class_methods` - class + implementation method merging
//! - `generics` - call-site generic argument inference
//! - `constraint` - generic constraint validation

pub mod assignability;
pub mod castability;
pub mod class_methods;
pub mod common_type;
pub mod constraint;
pub mod equality;
pub mod generics;
pub mod lub;
pub mod narrow;
pub mod numeric;
pub mod pending;
pub mod simplify;
pub mod substitution;

pub use assignability::{is_assignable, ResolveReference};
pub use castability::{can_cast, CastForm};
pub use class_methods::effective_methods;
pub use common_type::get_common_type;
pub use constraint::validate_constraint;
pub use equality::are_equal;
pub use generics::infer_generics;
pub use lub::lub;
pub use narrow::narrow;
pub use pending::{PendingChecks, PendingGuard, PendingOutcome};
pub use simplify::{as_interface_type, as_struct_type, simplify};
pub use substitution::{substitute, Substituted, Substitution};

//! Validation and link-time overload disambiguation (spec §4.4): the only
//! crate that depends on both `tyco-provider` (C2) and `tyco-solver` (C3),
//! and the one that turns their decisions into host-facing diagnostics and
//! resolved call-site bindings.
//!
//! - `uniqueness` - per-scope overload-uniqueness validation (module,
//!   namespace, class, interface): rejects duplicate signatures and
//!   generic overload groups.
//! - `disambiguate` - the linker's overload disambiguator: given N
//!   name-matched candidates and a call site's argument types, picks the
//!   one candidate whose parameters admit them.

pub mod disambiguate;
pub mod uniqueness;

pub use disambiguate::{resolve_overload, OverloadResolution};
pub use uniqueness::{check_class_overloads, check_overload_uniqueness, OverloadCandidate, OverloadScope};

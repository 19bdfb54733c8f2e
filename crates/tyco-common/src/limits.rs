//! Centralized recursion and iteration limits for the type system.
//!
//! The structural algorithms in C3 (assignability, substitution, LUB) walk
//! mutually recursive type graphs. Two independent mechanisms keep them
//! terminating:
//!
//! - The pending-checks stack (spec §4.3.2 rule 1, §5) breaks cycles that
//!   are *structurally* sound (e.g. `Array<Container<T>>` where both refer
//!   back to each other).
//! - The depth limits below catch the remaining case: a buggy or
//!   adversarial declaration whose expansion genuinely grows without
//!   bound (runaway generic instantiation). These are a backstop, not the
//!   primary cycle-breaking mechanism.

/// Maximum depth for a single `substitute` call chain before it is treated
/// as a runaway instantiation and short-circuited to an `Error` type.
///
/// Ordinary recursive declarations (`TreeNode<T> = { children: TreeNode<T>[]? }`)
/// never approach this: the pending-checks stack resolves them in O(1)
/// stack frames per distinct `(decl, args)` pair. This limit exists for
/// declarations that generate a genuinely unbounded number of distinct
/// instantiations (e.g. `Wrap<T> = Wrap<Wrap<T>>`, which has no fixed
/// point).
pub const MAX_SUBSTITUTION_DEPTH: u32 = 256;

/// Maximum number of simultaneously pending assignability checks (spec §5).
///
/// This bounds the pending-checks stack itself, guarding against programs
/// whose type graph has so much incidental depth that the stack would
/// otherwise grow unbounded before any cycle is found.
pub const MAX_PENDING_CHECKS: usize = 4096;

/// Maximum number of members considered when simplifying a `Union` or
/// `Join`. Beyond this, `simplify` stops de-duplicating and returns the
/// flattened-but-undeduplicated list; callers still get a structurally
/// valid type, just a possibly redundant one.
pub const MAX_SIMPLIFY_MEMBERS: usize = 2048;

/// Maximum recursion depth for `getCommonType` / `LUB` over heterogeneous
/// arrays, match arms, and return-type inference sites.
pub const MAX_LUB_DEPTH: u32 = 128;

//! Foundational types shared across the tyco type-system crates.
//!
//! This crate provides the ambient pieces every layer of the core needs,
//! but that belong to none of them in particular:
//! - Stable AST node identity (`NodeId`) — the cache key the type provider
//!   relies on.
//! - String interning (`Atom`, `AtomInterner`) for generic parameter and
//!   field names.
//! - The `{success, message}` decision record used by every C3/C4 query
//!   (`Outcome`).
//! - Diagnostic codes and categories for the validator (`DiagnosticCode`,
//!   `Diagnostic`).
//! - Centralized recursion/iteration limits (`limits`).

pub mod atom;
pub mod diagnostics;
pub mod limits;
pub mod node;
pub mod outcome;

pub use atom::{Atom, AtomInterner};
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCode};
pub use node::NodeId;
pub use outcome::Outcome;

//! Link-time overload disambiguation (spec §4.4, second half).
//!
//! Invoked once name resolution (the host's `ScopeProvider`) has already
//! narrowed a reference site down to every declaration sharing its simple
//! name; this module picks the one the call-site argument list actually
//! admits.

use tyco_model::id::TypeId;
use tyco_provider::host::AstProducer;
use tyco_provider::provider::TypeProvider;

/// The outcome of resolving a multi-candidate reference against a call
/// site's argument types (spec §4.4 "Overload disambiguation (linker
/// side)").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverloadResolution {
    /// No candidates were supplied; there was nothing to disambiguate.
    NoCandidates,
    /// Exactly one candidate admits `args`.
    Unique(usize),
    /// More than one candidate admits `args`; the reference is genuinely
    /// ambiguous and must be reported to the host.
    Ambiguous(Vec<usize>),
    /// No candidate admits `args`. Per spec, fall back to the first
    /// candidate and let the subsequent type-checking phase produce a
    /// precise error against it, rather than refusing to link at all.
    FallbackToFirst(usize),
}

impl OverloadResolution {
    /// The candidate index to actually bind the reference to, where one
    /// can be chosen unambiguously (`Ambiguous` and `NoCandidates` have
    /// none).
    pub fn chosen(&self) -> Option<usize> {
        match self {
            OverloadResolution::Unique(index) | OverloadResolution::FallbackToFirst(index) => Some(*index),
            OverloadResolution::Ambiguous(_) | OverloadResolution::NoCandidates => None,
        }
    }
}

/// Resolves a call-site reference against `candidates` (function-type
/// descriptions, one per overload), using the type provider's
/// assignability-based filter (spec §4.2's overload-candidate filtering,
/// shared verbatim with member-call inference).
pub fn resolve_overload<A: AstProducer>(
    provider: &TypeProvider<'_, A>,
    args: &[TypeId],
    candidates: &[TypeId],
) -> OverloadResolution {
    if candidates.is_empty() {
        return OverloadResolution::NoCandidates;
    }
    let matches = provider.filter_overload_candidates(args, candidates);
    match matches.len() {
        0 => OverloadResolution::FallbackToFirst(0),
        1 => OverloadResolution::Unique(matches[0]),
        _ => OverloadResolution::Ambiguous(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyco_common::atom::Atom;
    use tyco_common::node::NodeId;
    use tyco_model::id::TypeId;
    use tyco_model::interner::TypeInterner;
    use tyco_model::shapes::{FnKind, Param};
    use tyco_provider::host::{HostError, NodeShape};

    struct EmptyAst;
    impl AstProducer for EmptyAst {
        fn describe(&self, node: NodeId) -> Result<NodeShape, HostError> {
            Err(HostError::NodeNotFound(node))
        }
    }

    fn atom(interner: &TypeInterner, s: &str) -> Atom {
        interner.intern_name(s)
    }

    #[test]
    fn no_candidates_reports_nothing_to_disambiguate() {
        let interner = TypeInterner::new();
        let ast = EmptyAst;
        let provider = TypeProvider::new(&interner, &ast);
        assert_eq!(resolve_overload(&provider, &[], &[]), OverloadResolution::NoCandidates);
    }

    #[test]
    fn single_admissible_candidate_is_unique() {
        let interner = TypeInterner::new();
        let x = atom(&interner, "x");
        let fn_u32 = interner.function(
            vec![Param { name: x, ty: TypeId::U32, is_mut: false }],
            TypeId::VOID,
            FnKind::Plain,
            vec![],
        );
        let fn_string = interner.function(
            vec![Param { name: x, ty: TypeId::STRING, is_mut: false }],
            TypeId::VOID,
            FnKind::Plain,
            vec![],
        );
        let ast = EmptyAst;
        let provider = TypeProvider::new(&interner, &ast);
        let resolution = resolve_overload(&provider, &[TypeId::U32], &[fn_u32, fn_string]);
        assert_eq!(resolution, OverloadResolution::Unique(0));
        assert_eq!(resolution.chosen(), Some(0));
    }

    #[test]
    fn every_overload_admitting_any_matches_is_ambiguous() {
        let interner = TypeInterner::new();
        let x = atom(&interner, "x");
        // Both overloads accept `any`.
        let fn_a = interner.function(
            vec![Param { name: x, ty: TypeId::ANY, is_mut: false }],
            TypeId::VOID,
            FnKind::Plain,
            vec![],
        );
        let fn_b = interner.function(
            vec![Param { name: x, ty: TypeId::ANY, is_mut: false }],
            TypeId::BOOL,
            FnKind::Plain,
            vec![],
        );
        let ast = EmptyAst;
        let provider = TypeProvider::new(&interner, &ast);
        let resolution = resolve_overload(&provider, &[TypeId::U32], &[fn_a, fn_b]);
        assert_eq!(resolution, OverloadResolution::Ambiguous(vec![0, 1]));
        assert_eq!(resolution.chosen(), None);
    }

    #[test]
    fn no_admissible_candidate_falls_back_to_the_first() {
        let interner = TypeInterner::new();
        let x = atom(&interner, "x");
        let fn_u32 = interner.function(
            vec![Param { name: x, ty: TypeId::U32, is_mut: false }],
            TypeId::VOID,
            FnKind::Plain,
            vec![],
        );
        let fn_bool = interner.function(
            vec![Param { name: x, ty: TypeId::BOOL, is_mut: false }],
            TypeId::VOID,
            FnKind::Plain,
            vec![],
        );
        let ast = EmptyAst;
        let provider = TypeProvider::new(&interner, &ast);
        let resolution = resolve_overload(&provider, &[TypeId::STRING], &[fn_u32, fn_bool]);
        assert_eq!(resolution, OverloadResolution::FallbackToFirst(0));
        assert_eq!(resolution.chosen(), Some(0));
    }
}

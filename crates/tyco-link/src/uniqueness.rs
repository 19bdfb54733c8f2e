//! Overload-uniqueness validation (spec §4.4, first half).
//!
//! Operates purely on `Method` shapes handed to it by the caller: a free
//! function scope (module/namespace) converts its declarations to
//! candidates itself; a class scope goes through `check_class_overloads`,
//! which first merges inherited implementation methods via
//! `tyco_solver::class_methods::effective_methods` so shadowed methods
//! never reach the duplicate check at all.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use tyco_common::diagnostics::{Diagnostic, DiagnosticCode};
use tyco_common::node::NodeId;
use tyco_model::display::display;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{ClassShape, Method};
use tyco_solver::assignability::ResolveReference;
use tyco_solver::class_methods::effective_methods;

use tyco_common::atom::Atom;

/// One callable considered by the uniqueness checker, stripped down to
/// exactly the fields that are part of its signature (spec §4.4: "return
/// type is not part of the signature").
#[derive(Clone, Debug)]
pub struct OverloadCandidate {
    pub node: NodeId,
    pub names: SmallVec<[Atom; 1]>,
    pub generic_parameter_count: usize,
    pub parameter_types: Vec<TypeId>,
}

impl From<&Method> for OverloadCandidate {
    fn from(method: &Method) -> Self {
        OverloadCandidate {
            node: method.node,
            names: method.names.clone(),
            generic_parameter_count: method.generic_parameters.len(),
            parameter_types: method.parameters.iter().map(|p| p.ty).collect(),
        }
    }
}

/// Which scope is being validated, selecting the pair of diagnostic codes
/// spec §6.3 names for it ("duplicate function overload" /
/// "generic function cannot be overloaded" vs their class-method
/// counterparts).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverloadScope {
    Function,
    ClassMethod,
}

impl OverloadScope {
    fn duplicate_code(self) -> DiagnosticCode {
        match self {
            OverloadScope::Function => DiagnosticCode::DuplicateFunctionOverload,
            OverloadScope::ClassMethod => DiagnosticCode::DuplicateClassMethodOverload,
        }
    }

    fn generic_code(self) -> DiagnosticCode {
        match self {
            OverloadScope::Function => DiagnosticCode::GenericFunctionCannotBeOverloaded,
            OverloadScope::ClassMethod => DiagnosticCode::GenericClassMethodCannotBeOverloaded,
        }
    }
}

/// A parameter type's signature key: the deterministic `display` string of
/// its structural form (spec §4.4: "pairwise-serialized parameter types").
/// Reusing `display` rather than a bespoke serializer keeps this
/// comparison and diagnostic messages built from the exact same
/// deterministic text (spec §6.3's golden-file-testing requirement).
fn signature_key(interner: &TypeInterner, candidate: &OverloadCandidate) -> String {
    let mut key = String::new();
    key.push_str(&candidate.generic_parameter_count.to_string());
    for &ty in &candidate.parameter_types {
        key.push('|');
        key.push_str(&display(interner, ty));
    }
    key
}

/// Within one scope, group callables by each of their bound names
/// (spec §4.4: "a method exposes multiple names via operator binding") and
/// report every duplicate or illegally-overloaded generic group.
///
/// A single offending pair can surface under more than one shared alias
/// (e.g. two `[]`/`at` overloads collide under both names); diagnostics are
/// deduplicated by `(code, node)` so each offending declaration is
/// reported once.
pub fn check_overload_uniqueness(
    interner: &TypeInterner,
    candidates: &[OverloadCandidate],
    scope: OverloadScope,
) -> Vec<Diagnostic> {
    let mut groups: FxHashMap<Atom, Vec<usize>> = FxHashMap::default();
    for (index, candidate) in candidates.iter().enumerate() {
        for &name in &candidate.names {
            groups.entry(name).or_default().push(index);
        }
    }

    let mut seen: FxHashMap<(DiagnosticCode, NodeId), ()> = FxHashMap::default();
    let mut diagnostics = Vec::new();
    let mut report = |code: DiagnosticCode, node: NodeId, message: String| {
        if seen.insert((code, node), ()).is_none() {
            diagnostics.push(Diagnostic::new(code, node, message));
        }
    };

    let mut group_names: Vec<&Atom> = groups.keys().collect();
    group_names.sort_by_key(|a| a.id());
    for name in group_names {
        let members = &groups[name];
        if members.len() <= 1 {
            continue;
        }
        let name_str = interner.resolve_name(*name);

        let has_generic_member = members.iter().any(|&i| candidates[i].generic_parameter_count > 0);
        if has_generic_member {
            for &index in members {
                report(
                    scope.generic_code(),
                    candidates[index].node,
                    format!("'{name_str}' cannot be overloaded: a generic overload requires a unique name"),
                );
            }
            // A generic member makes the whole name group illegal; the
            // duplicate-signature check below would otherwise pile on a
            // second, redundant diagnostic for the same pair.
            continue;
        }

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let a = members[i];
                let b = members[j];
                if signature_key(interner, &candidates[a]) == signature_key(interner, &candidates[b]) {
                    let message = format!(
                        "'{name_str}' is declared with the same parameter types more than once"
                    );
                    report(scope.duplicate_code(), candidates[a].node, message.clone());
                    report(scope.duplicate_code(), candidates[b].node, message);
                }
            }
        }
    }

    diagnostics.sort_by_key(|d| (d.node.0, d.code as u32));
    diagnostics
}

/// Validates one class's method set: own methods merged with inherited,
/// non-shadowed implementation methods (spec §4.4's override-shadowing
/// carve-out is already applied by `effective_methods`). Every reported
/// diagnostic is attached to the class's own declaration node, never to an
/// implementation's node, per spec §4.4 ("report duplicates on the class
/// method, not on the impl").
pub fn check_class_overloads(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    class: &ClassShape,
) -> Vec<Diagnostic> {
    let methods = effective_methods(interner, resolve, class);
    let candidates: Vec<OverloadCandidate> = methods.iter().map(OverloadCandidate::from).collect();
    let mut seen: FxHashMap<(DiagnosticCode, String), ()> = FxHashMap::default();
    check_overload_uniqueness(interner, &candidates, OverloadScope::ClassMethod)
        .into_iter()
        // Re-attaching every diagnostic to the class's declaration node
        // (rather than the member's own node, which may belong to an
        // implementation) can make two previously-distinct reports about
        // the same offending pair collapse onto the same (code, node);
        // drop the resulting duplicate rather than reporting it twice.
        .filter(|d| seen.insert((d.code, d.message.clone()), ()).is_none())
        .map(|d| Diagnostic::new(d.code, class.declaration, d.message))
        .collect()
}

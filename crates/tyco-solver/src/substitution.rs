//! Generic substitution (spec §4.3.3).

use rustc_hash::FxHashMap;
use std::rc::Rc;

use tyco_common::atom::Atom;
use tyco_common::limits::MAX_SUBSTITUTION_DEPTH;
use tyco_common::node::NodeId;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{Attribute, FunctionShape, Method, Param, StructField, VariantArm};

use crate::assignability::ResolveReference;
use crate::pending::{PendingChecks, PendingOutcome};

/// A generic-name-to-concrete-type mapping (`σ` in the spec).
pub type Substitution = FxHashMap<Atom, TypeId>;

/// The result of a substitution pass: the rebuilt type, plus any
/// diagnostic-quality messages collected along the way (double-nullable
/// and nullable-primitive substitutions, reference instantiation errors).
#[derive(Clone, Debug)]
pub struct Substituted {
    pub ty: TypeId,
    pub errors: Vec<String>,
}

impl Substituted {
    fn unchanged(ty: TypeId) -> Self {
        Substituted { ty, errors: Vec::new() }
    }
}

pub fn substitute(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    ty: TypeId,
    sigma: &Substitution,
) -> Substituted {
    substitute_depth(interner, pending, resolve, ty, sigma, 0)
}

fn substitute_depth(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    ty: TypeId,
    sigma: &Substitution,
    depth: u32,
) -> Substituted {
    if sigma.is_empty() {
        return Substituted::unchanged(ty);
    }
    if depth >= MAX_SUBSTITUTION_DEPTH {
        let err = interner.error(
            format!("substitution exceeded {MAX_SUBSTITUTION_DEPTH} levels of recursion"),
            None,
            NodeId::NONE,
        );
        return Substituted {
            ty: err,
            errors: vec!["substitution depth limit reached".to_string()],
        };
    }
    let recurse = |t: TypeId| substitute_depth(interner, pending, resolve, t, sigma, depth + 1);

    match interner.get(ty) {
        TypeData::Generic(g) => substitute_generic(interner, &g.name, ty, sigma),

        TypeData::Array(elem) => {
            let s = recurse(elem);
            Substituted { ty: interner.array(s.ty), errors: s.errors }
        }

        TypeData::Nullable(base) => {
            let s = recurse(base);
            Substituted { ty: interner.nullable(s.ty), errors: s.errors }
        }

        TypeData::Union(members) => {
            let (types, errors) = substitute_list(&recurse, &members);
            Substituted { ty: interner.union(types), errors }
        }

        TypeData::Join(members) => {
            let (types, errors) = substitute_list(&recurse, &members);
            Substituted { ty: interner.join(types), errors }
        }

        TypeData::Tuple(members) => {
            let (types, errors) = substitute_list(&recurse, &members);
            Substituted { ty: interner.tuple(types), errors }
        }

        TypeData::Struct(shape) => {
            let mut errors = Vec::new();
            let fields = shape
                .fields
                .iter()
                .map(|f| {
                    let s = recurse(f.ty);
                    errors.extend(prefix(&s.errors, &format!("field '{}'", interner.resolve_name(f.name))));
                    StructField { name: f.name, ty: s.ty, node: f.node }
                })
                .collect();
            Substituted { ty: interner.struct_type(fields, shape.is_anonymous), errors }
        }

        TypeData::Interface(shape) => {
            let mut errors = Vec::new();
            let methods = substitute_methods(interner, &recurse, &shape.methods, &mut errors);
            let (super_types, super_errors) = substitute_list(&recurse, &shape.super_types);
            errors.extend(super_errors);
            Substituted { ty: interner.interface(methods, super_types), errors }
        }

        TypeData::Class(shape) => {
            let mut errors = Vec::new();
            let attributes = substitute_attributes(interner, &recurse, &shape.attributes, &mut errors);
            let methods = substitute_methods(interner, &recurse, &shape.methods, &mut errors);
            let (super_types, super_errors) = substitute_list(&recurse, &shape.super_types);
            errors.extend(super_errors);
            let (implementations, impl_errors) = substitute_list(&recurse, &shape.implementations);
            errors.extend(impl_errors);
            Substituted {
                ty: interner.class(shape.declaration, attributes, methods, super_types, implementations),
                errors,
            }
        }

        TypeData::Implementation(shape) => {
            let mut errors = Vec::new();
            let attributes = substitute_attributes(interner, &recurse, &shape.attributes, &mut errors);
            let methods = substitute_methods(interner, &recurse, &shape.methods, &mut errors);
            let target_type = shape.target_type.map(|t| {
                let s = recurse(t);
                errors.extend(s.errors);
                s.ty
            });
            Substituted { ty: interner.implementation(attributes, methods, target_type), errors }
        }

        TypeData::Function(shape) => substitute_function(interner, &recurse, &shape, sigma),

        TypeData::Variant(shape) => {
            let mut errors = Vec::new();
            let constructors = shape
                .constructors
                .iter()
                .map(|c| VariantArm {
                    name: c.name,
                    parameters: c
                        .parameters
                        .iter()
                        .map(|p| {
                            let s = recurse(p.ty);
                            errors.extend(prefix(
                                &s.errors,
                                &format!(
                                    "constructor '{}' parameter '{}'",
                                    interner.resolve_name(c.name),
                                    interner.resolve_name(p.name)
                                ),
                            ));
                            StructField { name: p.name, ty: s.ty, node: p.node }
                        })
                        .collect(),
                })
                .collect();
            Substituted { ty: interner.variant(constructors), errors }
        }

        TypeData::VariantConstructor(shape) => {
            let (generic_args, errors) = substitute_list(&recurse, &shape.generic_args);
            Substituted {
                ty: interner.variant_constructor(
                    shape.base_variant,
                    shape.constructor_name,
                    shape.parent_constructor,
                    generic_args,
                    shape.variant_declaration,
                ),
                errors,
            }
        }

        TypeData::Reference(shape) => {
            substitute_reference(interner, pending, resolve, &recurse, &shape.declaration, &shape.generic_args, ty)
        }

        TypeData::Coroutine(shape) => {
            let mut errors = Vec::new();
            let parameters = substitute_params(&recurse, &shape.parameters, &mut errors);
            let s = recurse(shape.yield_type);
            errors.extend(s.errors);
            Substituted { ty: interner.coroutine(parameters, s.ty), errors }
        }

        TypeData::ReturnType(inner) => {
            let s = recurse(inner);
            Substituted { ty: interner.return_type(s.ty), errors: s.errors }
        }

        TypeData::TypeGuard(shape) => {
            let s = recurse(shape.guarded_type);
            Substituted {
                ty: interner.type_guard(shape.parameter_name, shape.parameter_index, s.ty),
                errors: s.errors,
            }
        }

        // Primitives, carrier/literal kinds, meta wrappers, enum/namespace/ffi/
        // prototype: nothing to substitute inside.
        _ => Substituted::unchanged(ty),
    }
}

fn substitute_generic(interner: &TypeInterner, name: &Atom, original: TypeId, sigma: &Substitution) -> Substituted {
    let Some(&replacement) = sigma.get(name) else {
        return Substituted::unchanged(original);
    };
    if let TypeData::Nullable(base) = interner.get(replacement) {
        if matches!(interner.get(base), TypeData::Nullable(_)) {
            let err = interner.error(
                format!(
                    "generic '{}' substituted with a nullable of a nullable",
                    interner.resolve_name(*name)
                ),
                Some(replacement),
                NodeId::NONE,
            );
            return Substituted {
                ty: err,
                errors: vec![format!(
                    "generic '{}' resolves to a doubly-nullable type",
                    interner.resolve_name(*name)
                )],
            };
        }
        let no_resolve = |_id: TypeId| None::<TypeId>;
        if interner.is_basic(base, &no_resolve) {
            return Substituted {
                ty: replacement,
                errors: vec![format!(
                    "generic '{}' resolves to a nullable primitive",
                    interner.resolve_name(*name)
                )],
            };
        }
    }
    Substituted::unchanged(replacement)
}

fn substitute_list(
    recurse: &dyn Fn(TypeId) -> Substituted,
    items: &[TypeId],
) -> (Vec<TypeId>, Vec<String>) {
    let mut types = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for &item in items {
        let s = recurse(item);
        types.push(s.ty);
        errors.extend(s.errors);
    }
    (types, errors)
}

fn substitute_params(
    recurse: &dyn Fn(TypeId) -> Substituted,
    params: &[Param],
    errors: &mut Vec<String>,
) -> Vec<Param> {
    params
        .iter()
        .map(|p| {
            let s = recurse(p.ty);
            errors.extend(s.errors);
            Param { name: p.name, ty: s.ty, is_mut: p.is_mut }
        })
        .collect()
}

fn substitute_attributes(
    interner: &TypeInterner,
    recurse: &dyn Fn(TypeId) -> Substituted,
    attributes: &[Attribute],
    errors: &mut Vec<String>,
) -> Vec<Attribute> {
    attributes
        .iter()
        .map(|a| {
            let s = recurse(a.ty);
            errors.extend(prefix(&s.errors, &format!("attribute '{}'", interner.resolve_name(a.name))));
            Attribute {
                name: a.name,
                ty: s.ty,
                is_static: a.is_static,
                is_const: a.is_const,
                is_local: a.is_local,
            }
        })
        .collect()
}

fn substitute_methods(
    interner: &TypeInterner,
    recurse: &dyn Fn(TypeId) -> Substituted,
    methods: &[Method],
    errors: &mut Vec<String>,
) -> Vec<Method> {
    methods
        .iter()
        .map(|m| {
            let mut own_errors = Vec::new();
            let parameters = substitute_params(recurse, &m.parameters, &mut own_errors);
            let return_s = recurse(m.return_type);
            own_errors.extend(return_s.errors);
            let name = m
                .names
                .first()
                .map(|n| interner.resolve_name(*n).to_string())
                .unwrap_or_default();
            errors.extend(prefix(&own_errors, &format!("method '{name}'")));
            Method {
                names: m.names.clone(),
                generic_parameters: m.generic_parameters.clone(),
                parameters,
                return_type: return_s.ty,
                is_static: m.is_static,
                is_override: m.is_override,
                is_local: m.is_local,
                node: m.node,
            }
        })
        .collect()
}

fn substitute_function(
    interner: &TypeInterner,
    recurse: &dyn Fn(TypeId) -> Substituted,
    shape: &Rc<FunctionShape>,
    sigma: &Substitution,
) -> Substituted {
    let mut errors = Vec::new();
    let parameters = substitute_params(recurse, &shape.parameters, &mut errors);
    let return_s = recurse(shape.return_type);
    errors.extend(return_s.errors);
    // A function's own generic parameters it binds are removed once sigma
    // has a concrete type for them; unbound ones remain open.
    let generic_parameters = shape
        .generic_parameters
        .iter()
        .filter(|&&g| match interner.get(g) {
            TypeData::Generic(gs) => !sigma.contains_key(&gs.name),
            _ => true,
        })
        .copied()
        .collect();
    Substituted {
        ty: interner.function(parameters, return_s.ty, shape.fn_type.clone(), generic_parameters),
        errors,
    }
}

fn substitute_reference(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    recurse: &dyn Fn(TypeId) -> Substituted,
    declaration: &NodeId,
    generic_args: &[TypeId],
    original: TypeId,
) -> Substituted {
    let (args, mut errors) = substitute_list(recurse, generic_args);
    let new_reference = interner.reference(*declaration, args);

    // Keyed on the *original* (pre-substitution) reference node rather than
    // the freshly built one: a recursive declaration's stored body shares
    // that node across every re-entrant substitution of it, so this is
    // what actually repeats when `TreeNode<T>` resolves through itself.
    match pending.enter(original, original) {
        PendingOutcome::AlreadyPending => Substituted { ty: new_reference, errors },
        PendingOutcome::Entered(_guard) => {
            let resolved = resolve(new_reference);
            if resolved != new_reference {
                if let TypeData::Error(e) = interner.get(resolved) {
                    errors.push(format!(
                        "instantiating reference to declaration {} failed: {}",
                        declaration, e.message
                    ));
                }
            }
            Substituted { ty: new_reference, errors }
        }
    }
}

fn prefix(errors: &[String], context: &str) -> Vec<String> {
    errors.iter().map(|e| format!("{context}: {e}")).collect()
}

//! The central assignability (subtyping) algorithm (spec §4.3.2).

use tyco_common::outcome::Outcome;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{ClassShape, FnKind, InterfaceShape, Method};

use crate::equality::are_equal;
use crate::numeric::numeric_promotable;
use crate::pending::{PendingChecks, PendingOutcome};

/// A one-step reference resolver: given a `Reference`-kind `TypeId`,
/// return its resolved structural body. Injected rather than called
/// directly so this crate never depends on the type provider (see
/// the C2/C3 layering note in the workspace design notes).
pub type ResolveReference<'a> = &'a dyn Fn(TypeId) -> TypeId;

/// `assignable(from, to)`, checked in the order spec §4.3.2 lists.
pub fn is_assignable(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    from: TypeId,
    to: TypeId,
) -> Outcome {
    // 1. Cycle break.
    let _guard = match pending.enter(from, to) {
        PendingOutcome::AlreadyPending => return Outcome::ok(),
        PendingOutcome::Entered(guard) => guard,
    };

    // 2. Reflexive.
    if are_equal(interner, from, to).is_ok() {
        return Outcome::ok();
    }

    let from_data = interner.get(from);
    let to_data = interner.get(to);

    // 3. Top/bottom.
    if matches!(to_data, TypeData::Any) || matches!(from_data, TypeData::Any) {
        return Outcome::ok();
    }
    if matches!(from_data, TypeData::Never) {
        return Outcome::ok();
    }
    if matches!(to_data, TypeData::Never) {
        return Outcome::fail("nothing but `never` is assignable to `never`");
    }

    // 4. Error / Unset propagate as success.
    if from_data.is_error() || from_data.is_unset() || to_data.is_error() || to_data.is_unset() {
        return Outcome::ok();
    }

    // 5. Constraint passthrough.
    if let TypeData::Generic(g) = &from_data {
        if let Some(constraint) = g.constraint {
            return is_assignable(interner, pending, resolve, constraint, to)
                .with_context("generic constraint");
        }
    }

    // 6. Numeric promotion, string literal/enum lattice.
    if numeric_promotable(from, to) {
        return Outcome::ok();
    }
    if let Some(r) = enum_integer_rule(&from_data, &to_data) {
        return r;
    }
    if let Some(r) = string_lattice_rule(&from_data, &to_data) {
        return r;
    }

    // 7. Null / Nullable.
    if matches!(from_data, TypeData::Null) {
        if let TypeData::Nullable(_) = to_data {
            return Outcome::ok();
        }
    }
    if let (TypeData::Nullable(base_from), TypeData::Nullable(base_to)) = (&from_data, &to_data) {
        return is_assignable(interner, pending, resolve, *base_from, *base_to)
            .with_context("nullable base type");
    }
    if let TypeData::Nullable(base_to) = &to_data {
        if !matches!(from_data, TypeData::Nullable(_)) {
            return is_assignable(interner, pending, resolve, from, *base_to)
                .with_context("nullable target");
        }
    }

    // 8. Array.
    if let (TypeData::Array(a), TypeData::Array(b)) = (&from_data, &to_data) {
        return is_assignable(interner, pending, resolve, *a, *b).with_context("array element");
    }

    // 9. Tuple.
    if let (TypeData::Tuple(a), TypeData::Tuple(b)) = (&from_data, &to_data) {
        if a.len() != b.len() {
            return Outcome::fail("tuple arity mismatch");
        }
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            let r = is_assignable(interner, pending, resolve, *x, *y);
            if !r.is_ok() {
                return r.with_context(format!("tuple element {i}"));
            }
        }
        return Outcome::ok();
    }

    // 10. Struct width+depth subtyping.
    if let Some(target_struct) = crate::simplify::as_struct_type(interner, resolve, to) {
        if let Some(source_struct) = crate::simplify::as_struct_type(interner, resolve, from) {
            for field in &target_struct.fields {
                match source_struct.field(field.name) {
                    None => {
                        return Outcome::fail(format!(
                            "missing field '{}'",
                            interner.resolve_name(field.name)
                        ));
                    }
                    Some(source_field) => {
                        let r = is_assignable(interner, pending, resolve, source_field.ty, field.ty);
                        if !r.is_ok() {
                            return r.with_context(format!(
                                "field '{}'",
                                interner.resolve_name(field.name)
                            ));
                        }
                    }
                }
            }
            return Outcome::ok();
        }
    }

    // 11. Function: contravariant parameters (type + mutability), covariant return.
    if let (TypeData::Function(a), TypeData::Function(b)) = (&from_data, &to_data) {
        let same_fn_type = matches!(
            (&a.fn_type, &b.fn_type),
            (FnKind::Plain, FnKind::Plain) | (FnKind::Coroutine, FnKind::Coroutine)
        );
        if !same_fn_type {
            return Outcome::fail("plain/coroutine mismatch");
        }
        if a.parameters.len() != b.parameters.len() {
            return Outcome::fail("parameter count mismatch");
        }
        for (i, (pa, pb)) in a.parameters.iter().zip(b.parameters.iter()).enumerate() {
            if pa.is_mut && !pb.is_mut {
                return Outcome::fail(format!(
                    "parameter {i} requires mutability the target does not provide"
                ));
            }
            let r = is_assignable(interner, pending, resolve, pb.ty, pa.ty);
            if !r.is_ok() {
                return r.with_context(format!("parameter {i} (contravariant)"));
            }
        }
        return is_assignable(interner, pending, resolve, a.return_type, b.return_type)
            .with_context("return type (covariant)");
    }

    // 12. Type guards.
    if matches!(from_data, TypeData::TypeGuard(_)) && matches!(to_data, TypeData::Bool) {
        return Outcome::ok();
    }
    if matches!(from_data, TypeData::Bool) && matches!(to_data, TypeData::TypeGuard(_)) {
        return Outcome::ok();
    }
    if let (TypeData::TypeGuard(a), TypeData::TypeGuard(b)) = (&from_data, &to_data) {
        if a.parameter_index != b.parameter_index {
            return Outcome::fail("type guard parameter index mismatch");
        }
        return is_assignable(interner, pending, resolve, a.guarded_type, b.guarded_type)
            .with_context("guarded type");
    }

    // 13. Unions.
    if let TypeData::Union(members) = &from_data {
        for (i, m) in members.iter().enumerate() {
            let r = is_assignable(interner, pending, resolve, *m, to);
            if !r.is_ok() {
                return r.with_context(format!("union member {i}"));
            }
        }
        return Outcome::ok();
    }
    if let TypeData::Union(members) = &to_data {
        for m in members.iter() {
            if is_assignable(interner, pending, resolve, from, *m).is_ok() {
                return Outcome::ok();
            }
        }
        return Outcome::fail("assignable to no member of the target union");
    }

    // 14. Joins.
    if let TypeData::Join(members) = &from_data {
        for m in members.iter() {
            if is_assignable(interner, pending, resolve, *m, to).is_ok() {
                return Outcome::ok();
            }
        }
        return Outcome::fail("no member of the source join is assignable to the target");
    }
    if let TypeData::Join(members) = &to_data {
        for (i, m) in members.iter().enumerate() {
            let r = is_assignable(interner, pending, resolve, from, *m);
            if !r.is_ok() {
                return r.with_context(format!("join member {i}"));
            }
        }
        return Outcome::ok();
    }

    // 15. Class / interface.
    if let (TypeData::Class(a), TypeData::Class(b)) = (&from_data, &to_data) {
        return Outcome::from(a.declaration == b.declaration)
            .with_context("classes are only assignable to themselves");
    }
    if let TypeData::Class(class) = &from_data {
        if matches!(to_data, TypeData::Reference(_)) {
            let resolved = resolve(to);
            if resolved != to {
                return is_assignable(interner, pending, resolve, from, resolved);
            }
        }
        if let TypeData::Interface(iface) = &to_data {
            return class_implements_interface(interner, pending, resolve, class, iface);
        }
    }
    if let (TypeData::Interface(a), TypeData::Interface(b)) = (&from_data, &to_data) {
        let target_methods = interface_closure(interner, resolve, b);
        for tm in &target_methods {
            if !has_matching_method(interner, pending, resolve, &interface_closure(interner, resolve, a), tm) {
                return Outcome::fail(format!(
                    "missing method matching '{}'",
                    tm.names
                        .iter()
                        .map(|n| interner.resolve_name(*n).to_string())
                        .collect::<Vec<_>>()
                        .join("/")
                ));
            }
        }
        return Outcome::ok();
    }

    // 16. Variants.
    if let Some(r) = variant_rule(interner, pending, resolve, &from_data, &to_data) {
        return r;
    }

    Outcome::fail(format!(
        "no assignability rule connects {:?} to {:?}",
        from_data.kind(),
        to_data.kind()
    ))
}

fn enum_integer_rule(from_data: &TypeData, to_data: &TypeData) -> Option<Outcome> {
    if matches!(from_data, TypeData::Enum(_)) && to_data.kind().is_integer() {
        return Some(Outcome::ok());
    }
    if from_data.kind().is_integer() && matches!(to_data, TypeData::Enum(_)) {
        return Some(Outcome::ok());
    }
    None
}

fn string_lattice_rule(from_data: &TypeData, to_data: &TypeData) -> Option<Outcome> {
    match (from_data, to_data) {
        (TypeData::StringLiteral(v), TypeData::StringEnum(values)) => {
            Some(Outcome::from(values.contains(v)).with_context("literal not in target enum"))
        }
        (TypeData::StringLiteral(_), TypeData::String) => Some(Outcome::ok()),
        (TypeData::StringEnum(_), TypeData::String) => Some(Outcome::ok()),
        (TypeData::StringEnum(a), TypeData::StringEnum(b)) => {
            Some(Outcome::from(a.iter().all(|v| b.contains(v))).with_context("not a subset"))
        }
        (TypeData::StringEnum(a), TypeData::StringLiteral(v)) if a.len() == 1 => {
            Some(Outcome::from(&a[0] == v).with_context("single-value enum does not match literal"))
        }
        _ => None,
    }
}

fn class_implements_interface(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    class: &ClassShape,
    iface: &InterfaceShape,
) -> Outcome {
    let class_methods = crate::class_methods::effective_methods(interner, resolve, class);
    let target_methods = interface_closure(interner, resolve, iface);
    for tm in &target_methods {
        if !has_matching_method(interner, pending, resolve, &class_methods, tm) {
            return Outcome::fail(format!(
                "no public method matches '{}'",
                tm.names
                    .iter()
                    .map(|n| interner.resolve_name(*n).to_string())
                    .collect::<Vec<_>>()
                    .join("/")
            ));
        }
    }
    Outcome::ok()
}

/// Collects an interface's methods plus those of its transitive
/// super-interfaces.
pub fn interface_closure(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    iface: &InterfaceShape,
) -> Vec<Method> {
    let mut out = iface.methods.clone();
    for super_type in &iface.super_types {
        let resolved = match interner.get(*super_type) {
            TypeData::Reference(_) => resolve(*super_type),
            _ => *super_type,
        };
        if let TypeData::Interface(super_iface) = interner.get(resolved) {
            out.extend(interface_closure(interner, resolve, &super_iface));
        }
    }
    out
}

fn has_matching_method(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    candidates: &[Method],
    target: &Method,
) -> bool {
    candidates.iter().any(|cm| {
        if cm.is_local {
            return false;
        }
        if !cm.names.iter().any(|n| target.names.contains(n)) {
            return false;
        }
        if cm.parameters.len() != target.parameters.len() {
            return false;
        }
        for (cp, tp) in cm.parameters.iter().zip(target.parameters.iter()) {
            if cp.is_mut != tp.is_mut {
                return false;
            }
            if !is_assignable(interner, pending, resolve, cp.ty, tp.ty).is_ok() {
                return false;
            }
        }
        is_assignable(interner, pending, resolve, cm.return_type, target.return_type).is_ok()
    })
}

fn variant_rule(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    from_data: &TypeData,
    to_data: &TypeData,
) -> Option<Outcome> {
    match (from_data, to_data) {
        (TypeData::VariantConstructor(vc), TypeData::Variant(target_variant)) => {
            let ctor = target_variant.constructor(vc.constructor_name)?;
            let base = interner.get(vc.base_variant);
            let TypeData::Variant(base_variant) = base else {
                return Some(Outcome::fail("VariantConstructor.base_variant is not resolved"));
            };
            let base_ctor = base_variant.constructor(vc.constructor_name)?;
            if base_ctor.parameters.len() != ctor.parameters.len() {
                return Some(Outcome::fail("constructor arity mismatch"));
            }
            for (bp, tp) in base_ctor.parameters.iter().zip(ctor.parameters.iter()) {
                if matches!(interner.get(bp.ty), TypeData::Never) {
                    continue;
                }
                let r = is_assignable(interner, pending, resolve, bp.ty, tp.ty);
                if !r.is_ok() {
                    return Some(r.with_context(format!(
                        "constructor '{}' parameter '{}'",
                        interner.resolve_name(vc.constructor_name),
                        interner.resolve_name(tp.name)
                    )));
                }
            }
            Some(Outcome::ok())
        }
        (TypeData::VariantConstructor(a), TypeData::VariantConstructor(b)) => {
            if a.constructor_name != b.constructor_name {
                return Some(Outcome::fail("different constructor names"));
            }
            if a.generic_args.len() != b.generic_args.len() {
                return Some(Outcome::fail("generic argument count mismatch"));
            }
            for (x, y) in a.generic_args.iter().zip(b.generic_args.iter()) {
                if matches!(interner.get(*x), TypeData::Never) {
                    continue;
                }
                let r = is_assignable(interner, pending, resolve, *x, *y);
                if !r.is_ok() {
                    return Some(r.with_context("generic argument"));
                }
            }
            Some(Outcome::ok())
        }
        (TypeData::Variant(a), TypeData::Variant(b)) => {
            for ctor in &a.constructors {
                let Some(target_ctor) = b.constructor(ctor.name) else {
                    return Some(Outcome::fail(format!(
                        "target variant lacks constructor '{}'",
                        interner.resolve_name(ctor.name)
                    )));
                };
                if ctor.parameters.len() != target_ctor.parameters.len() {
                    return Some(Outcome::fail("constructor arity mismatch"));
                }
                for (cp, tp) in ctor.parameters.iter().zip(target_ctor.parameters.iter()) {
                    if cp.name != tp.name {
                        return Some(Outcome::fail("constructor parameter name mismatch"));
                    }
                    let r = is_assignable(interner, pending, resolve, cp.ty, tp.ty);
                    if !r.is_ok() {
                        return Some(r.with_context("constructor parameter type"));
                    }
                }
            }
            Some(Outcome::ok())
        }
        (TypeData::Reference(a), TypeData::Reference(b)) => {
            if a.declaration != b.declaration {
                return Some(Outcome::fail("different declarations"));
            }
            if a.generic_args.len() != b.generic_args.len() {
                return Some(Outcome::fail("generic argument count mismatch"));
            }
            for (x, y) in a.generic_args.iter().zip(b.generic_args.iter()) {
                if matches!(interner.get(*x), TypeData::Never) {
                    continue;
                }
                let r = is_assignable(interner, pending, resolve, *x, *y);
                if !r.is_ok() {
                    return Some(r.with_context("generic argument"));
                }
            }
            Some(Outcome::ok())
        }
        _ => None,
    }
}

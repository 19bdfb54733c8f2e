//! Common-type inference / LUB entry point for heterogeneous expressions
//! (spec §4.3.5): array literals, match arms, and multi-`return` sites all
//! funnel through `get_common_type`.
//!
//! The ordered rules below are more specific than the structural `lub`
//! (`lub.rs`) and are tried first; `lub` is reached for only once none of
//! them apply (rule 13).

use tyco_common::limits::MAX_LUB_DEPTH;
use tyco_common::node::NodeId;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;

use crate::assignability::ResolveReference;
use crate::equality::are_equal;
use crate::lub::lub;

/// Computes the common type (join) of `types` per the ordered rules of
/// spec §4.3.5.
pub fn get_common_type(interner: &TypeInterner, resolve: ResolveReference<'_>, types: &[TypeId]) -> TypeId {
    get_common_type_depth(interner, resolve, types, 0)
}

fn get_common_type_depth(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    types: &[TypeId],
    depth: u32,
) -> TypeId {
    if depth >= MAX_LUB_DEPTH {
        return interner.error(
            format!("common-type inference exceeded {MAX_LUB_DEPTH} levels of recursion"),
            None,
            NodeId::NONE,
        );
    }
    let recurse = |ts: &[TypeId]| get_common_type_depth(interner, resolve, ts, depth + 1);

    // 1. Drop Never; empty -> Never; singleton short-circuits.
    let non_never: Vec<TypeId> = types
        .iter()
        .copied()
        .filter(|&t| !matches!(interner.get(t), TypeData::Never))
        .collect();
    if non_never.is_empty() {
        return TypeId::NEVER;
    }
    if non_never.len() == 1 {
        return non_never[0];
    }
    let types = &non_never[..];

    // 2. Type guards.
    let guard_count = types.iter().filter(|&&t| matches!(interner.get(t), TypeData::TypeGuard(_))).count();
    if guard_count > 0 {
        if guard_count != types.len() {
            return TypeId::BOOL;
        }
        let guards: Vec<_> = types
            .iter()
            .map(|&t| match interner.get(t) {
                TypeData::TypeGuard(g) => g,
                _ => unreachable!(),
            })
            .collect();
        let first_index = guards[0].parameter_index;
        if guards.iter().any(|g| g.parameter_index != first_index) {
            return TypeId::BOOL;
        }
        let guarded: Vec<TypeId> = guards.iter().map(|g| g.guarded_type).collect();
        let unified = recurse(&guarded);
        return interner.type_guard(guards[0].parameter_name, first_index, unified);
    }

    // 3. Null + non-null.
    let (nulls, non_nulls): (Vec<TypeId>, Vec<TypeId>) =
        types.iter().partition(|&&t| matches!(interner.get(t), TypeData::Null));
    if !nulls.is_empty() {
        if non_nulls.is_empty() {
            return TypeId::NULL;
        }
        let common = recurse(&non_nulls);
        if matches!(interner.get(common), TypeData::Error(_)) {
            return common;
        }
        if matches!(interner.get(common), TypeData::Nullable(_)) {
            return common;
        }
        let basic_resolve = |id: TypeId| {
            let r = resolve(id);
            (r != id).then_some(r)
        };
        if interner.is_basic(common, &basic_resolve) {
            return interner.error(
                "cannot infer common type: nullable of a basic primitive in expression position",
                None,
                NodeId::NONE,
            );
        }
        return interner.nullable(common);
    }

    // 4. Arrays.
    if types.iter().all(|&t| matches!(interner.get(t), TypeData::Array(_))) {
        let elems: Vec<TypeId> = types
            .iter()
            .map(|&t| match interner.get(t) {
                TypeData::Array(e) => e,
                _ => unreachable!(),
            })
            .collect();
        return interner.array(recurse(&elems));
    }

    // 5. Tuples.
    if let Some(r) = tuple_rule(interner, resolve, types, &recurse) {
        return r;
    }

    // 6. Functions.
    if let Some(r) = function_rule(interner, resolve, types, &recurse) {
        return r;
    }

    // 7. Nullability-only differences.
    if let Some(r) = nullability_only_rule(interner, resolve, types) {
        return r;
    }

    // 8. String literals / string / string enum.
    if let Some(r) = string_family_rule(interner, types) {
        return r;
    }

    // 9. Structs via asStructType.
    if types.iter().all(|&t| crate::simplify::as_struct_type(interner, resolve, t).is_some()) {
        return lub(interner, resolve, types);
    }

    // 10. Same-declaration references.
    if let Some(r) = reference_unify_rule(interner, resolve, types, &recurse) {
        return r;
    }

    // 11 & 12. VariantConstructor / Reference of the same base variant.
    if let Some(r) = variant_constructor_unify_rule(interner, resolve, types, &recurse) {
        return r;
    }

    // 13. LUB by category.
    let result = lub(interner, resolve, types);
    if !matches!(interner.get(result), TypeData::Error(_)) {
        return result;
    }

    // 14. No rule matched.
    interner.error(
        format!(
            "cannot infer common type: no rule unifies {} heterogeneous member(s)",
            types.len()
        ),
        None,
        NodeId::NONE,
    )
}

fn tuple_rule(
    interner: &TypeInterner,
    _resolve: ResolveReference<'_>,
    types: &[TypeId],
    recurse: &dyn Fn(&[TypeId]) -> TypeId,
) -> Option<TypeId> {
    let arities: Vec<usize> = types
        .iter()
        .map(|&t| match interner.get(t) {
            TypeData::Tuple(elems) => Some(elems.len()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    let first = *arities.first()?;
    if arities.iter().any(|&a| a != first) {
        return None;
    }
    let mut result = Vec::with_capacity(first);
    for i in 0..first {
        let column: Vec<TypeId> = types
            .iter()
            .map(|&t| match interner.get(t) {
                TypeData::Tuple(elems) => elems[i],
                _ => unreachable!(),
            })
            .collect();
        result.push(recurse(&column));
    }
    Some(interner.tuple(result))
}

fn function_rule(
    interner: &TypeInterner,
    _resolve: ResolveReference<'_>,
    types: &[TypeId],
    recurse: &dyn Fn(&[TypeId]) -> TypeId,
) -> Option<TypeId> {
    let shapes: Vec<_> = types
        .iter()
        .map(|&t| match interner.get(t) {
            TypeData::Function(f) => Some(f),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    let first = shapes.first()?;
    let arity = first.parameters.len();
    if shapes.iter().any(|f| f.parameters.len() != arity) {
        return None;
    }
    let mut parameters = Vec::with_capacity(arity);
    for i in 0..arity {
        let column: Vec<TypeId> = shapes.iter().map(|f| f.parameters[i].ty).collect();
        let unified = recurse(&column);
        parameters.push(tyco_model::shapes::Param {
            name: first.parameters[i].name,
            ty: unified,
            is_mut: first.parameters[i].is_mut,
        });
    }
    let returns: Vec<TypeId> = shapes.iter().map(|f| f.return_type).collect();
    let return_type = recurse(&returns);
    Some(interner.function(parameters, return_type, first.fn_type.clone(), vec![]))
}

fn nullability_only_rule(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    types: &[TypeId],
) -> Option<TypeId> {
    let any_nullable = types.iter().any(|&t| matches!(interner.get(t), TypeData::Nullable(_)));
    if !any_nullable {
        return None;
    }
    let bases: Vec<TypeId> = types
        .iter()
        .map(|&t| match interner.get(t) {
            TypeData::Nullable(b) => b,
            _ => t,
        })
        .collect();
    let first = bases[0];
    if bases.iter().all(|&b| are_equal(interner, b, first).is_ok()) {
        let basic_resolve = |id: TypeId| {
            let r = resolve(id);
            (r != id).then_some(r)
        };
        if interner.is_basic(first, &basic_resolve) {
            return Some(interner.error(
                "cannot infer common type: nullable of a basic primitive in expression position",
                None,
                NodeId::NONE,
            ));
        }
        return Some(interner.nullable(first));
    }
    None
}

fn string_family_rule(interner: &TypeInterner, types: &[TypeId]) -> Option<TypeId> {
    let all_string_family = types.iter().all(|&t| {
        matches!(
            interner.get(t),
            TypeData::StringLiteral(_) | TypeData::StringEnum(_) | TypeData::String
        )
    });
    if !all_string_family {
        return None;
    }
    if types.iter().any(|&t| matches!(interner.get(t), TypeData::String)) {
        return Some(TypeId::STRING);
    }
    let mut values = Vec::new();
    for &t in types {
        match interner.get(t) {
            TypeData::StringLiteral(v) => values.push(v),
            TypeData::StringEnum(vs) => values.extend(vs.iter().copied()),
            _ => unreachable!(),
        }
    }
    Some(interner.string_enum(values))
}

fn reference_unify_rule(
    interner: &TypeInterner,
    _resolve: ResolveReference<'_>,
    types: &[TypeId],
    recurse: &dyn Fn(&[TypeId]) -> TypeId,
) -> Option<TypeId> {
    let refs: Vec<_> = types
        .iter()
        .map(|&t| match interner.get(t) {
            TypeData::Reference(r) => Some(r),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    let first = refs.first()?;
    let declaration = first.declaration;
    if refs.iter().any(|r| r.declaration != declaration) {
        return None;
    }
    let arity = first.generic_args.len();
    let rows: Vec<Vec<TypeId>> = refs.iter().map(|r| r.generic_args.clone()).collect();
    let unified_args = unify_generic_columns(interner, &rows, arity, recurse)?;
    Some(interner.reference(declaration, unified_args))
}

fn variant_constructor_unify_rule(
    interner: &TypeInterner,
    _resolve: ResolveReference<'_>,
    types: &[TypeId],
    recurse: &dyn Fn(&[TypeId]) -> TypeId,
) -> Option<TypeId> {
    // Lift every member to (declaration, args): a VariantConstructor lifts
    // to its declared variant's declaration node; a Reference already is one.
    struct Lifted {
        declaration: NodeId,
        args: Vec<TypeId>,
    }
    let mut lifted = Vec::with_capacity(types.len());
    let mut any_variant_constructor = false;
    for &t in types {
        match interner.get(t) {
            TypeData::VariantConstructor(vc) => {
                any_variant_constructor = true;
                lifted.push(Lifted {
                    declaration: vc.variant_declaration?,
                    args: vc.generic_args.clone(),
                });
            }
            TypeData::Reference(r) => lifted.push(Lifted {
                declaration: r.declaration,
                args: r.generic_args.clone(),
            }),
            _ => return None,
        }
    }
    if !any_variant_constructor {
        // Pure same-declaration References are already handled by rule 10.
        return None;
    }
    let declaration = lifted.first()?.declaration;
    if lifted.iter().any(|l| l.declaration != declaration) {
        return None;
    }
    let arity = lifted.first()?.args.len();
    let columns: Vec<Vec<TypeId>> = lifted.into_iter().map(|l| l.args).collect();
    let unified_args = unify_generic_columns(interner, &columns, arity, recurse)?;
    Some(interner.reference(declaration, unified_args))
}

/// Unifies generic-argument columns position-wise: `Never` in any row is
/// filled by a concrete type from another row; multiple distinct concrete
/// types at a slot are unified recursively (spec §4.3.5 rule 10).
fn unify_generic_columns(
    interner: &TypeInterner,
    rows: &[Vec<TypeId>],
    arity: usize,
    recurse: &dyn Fn(&[TypeId]) -> TypeId,
) -> Option<Vec<TypeId>> {
    if rows.iter().any(|r| r.len() != arity) {
        return None;
    }
    let mut result = Vec::with_capacity(arity);
    for i in 0..arity {
        let column: Vec<TypeId> = rows.iter().map(|r| r[i]).collect();
        let concrete: Vec<TypeId> = column
            .iter()
            .copied()
            .filter(|&t| !matches!(interner.get(t), TypeData::Never))
            .collect();
        if concrete.is_empty() {
            result.push(TypeId::NEVER);
            continue;
        }
        let mut distinct: Vec<TypeId> = Vec::new();
        for &c in &concrete {
            if !distinct.iter().any(|&d| are_equal(interner, d, c).is_ok()) {
                distinct.push(c);
            }
        }
        if distinct.len() == 1 {
            result.push(distinct[0]);
        } else {
            result.push(recurse(&concrete));
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyco_common::node::NodeId;

    fn no_resolve(id: TypeId) -> TypeId {
        id
    }

    #[test]
    fn never_is_dropped_and_empty_collapses_to_never() {
        let interner = TypeInterner::new();
        assert_eq!(get_common_type(&interner, &no_resolve, &[]), TypeId::NEVER);
        assert_eq!(
            get_common_type(&interner, &no_resolve, &[TypeId::NEVER, TypeId::NEVER]),
            TypeId::NEVER
        );
    }

    #[test]
    fn singleton_short_circuits() {
        let interner = TypeInterner::new();
        assert_eq!(
            get_common_type(&interner, &no_resolve, &[TypeId::NEVER, TypeId::U32]),
            TypeId::U32
        );
    }

    #[test]
    fn null_and_non_null_wraps_in_nullable() {
        let interner = TypeInterner::new();
        let result = get_common_type(&interner, &no_resolve, &[TypeId::NULL, TypeId::STRING]);
        assert!(matches!(interner.get(result), TypeData::Nullable(b) if b == TypeId::STRING));
    }

    #[test]
    fn nullable_of_basic_in_expression_position_is_an_error() {
        let interner = TypeInterner::new();
        let result = get_common_type(&interner, &no_resolve, &[TypeId::NULL, TypeId::U32]);
        assert!(matches!(interner.get(result), TypeData::Error(_)));
    }

    #[test]
    fn arrays_unify_element_type() {
        let interner = TypeInterner::new();
        let a = interner.array(TypeId::U32);
        let b = interner.array(TypeId::U32);
        let result = get_common_type(&interner, &no_resolve, &[a, b]);
        assert!(matches!(interner.get(result), TypeData::Array(e) if e == TypeId::U32));
    }

    #[test]
    fn string_literals_merge_into_string_enum() {
        let interner = TypeInterner::new();
        let a = interner.string_literal("ok");
        let b = interner.string_literal("err");
        let result = get_common_type(&interner, &no_resolve, &[a, b]);
        match interner.get(result) {
            TypeData::StringEnum(vs) => assert_eq!(vs.len(), 2),
            other => panic!("expected StringEnum, got {other:?}"),
        }
    }

    #[test]
    fn string_with_literal_widens_to_string() {
        let interner = TypeInterner::new();
        let a = interner.string_literal("ok");
        let result = get_common_type(&interner, &no_resolve, &[a, TypeId::STRING]);
        assert_eq!(result, TypeId::STRING);
    }

    #[test]
    fn same_declaration_references_unify_generic_args_filling_never() {
        let interner = TypeInterner::new();
        let decl = NodeId(1);
        let a = interner.reference(decl, vec![TypeId::NEVER]);
        let b = interner.reference(decl, vec![TypeId::I32]);
        let result = get_common_type(&interner, &no_resolve, &[a, b]);
        match interner.get(result) {
            TypeData::Reference(r) => assert_eq!(r.generic_args, vec![TypeId::I32]),
            other => panic!("expected Reference, got {other:?}"),
        }
    }

    #[test]
    fn variant_lub_with_never_unifies_ok_err_slots() {
        // Result<T, E> = Ok(T) | Err(E); [Ok(i32), Err(str)] both carry one
        // slot already concrete and the other defaulted to Never by
        // inference, so the common type fills both slots: Result<i32, string>.
        let interner = TypeInterner::new();
        let variant_decl = NodeId(1);
        let t = interner.intern_name("T");
        let e = interner.intern_name("E");
        let ok_name = interner.intern_name("Ok");
        let err_name = interner.intern_name("Err");
        let generic_t = interner.generic(t, None, NodeId::NONE);
        let generic_e = interner.generic(e, None, NodeId::NONE);
        let variant = interner.variant(vec![
            tyco_model::shapes::VariantArm {
                name: ok_name,
                parameters: vec![tyco_model::shapes::StructField {
                    name: interner.intern_name("0"),
                    ty: generic_t,
                    node: NodeId::NONE,
                }],
            },
            tyco_model::shapes::VariantArm {
                name: err_name,
                parameters: vec![tyco_model::shapes::StructField {
                    name: interner.intern_name("0"),
                    ty: generic_e,
                    node: NodeId::NONE,
                }],
            },
        ]);
        let ok_ctor = interner.variant_constructor(
            variant,
            ok_name,
            None,
            vec![TypeId::I32, TypeId::NEVER],
            Some(variant_decl),
        );
        let err_ctor = interner.variant_constructor(
            variant,
            err_name,
            None,
            vec![TypeId::NEVER, TypeId::STRING],
            Some(variant_decl),
        );
        let result = get_common_type(&interner, &no_resolve, &[ok_ctor, err_ctor]);
        match interner.get(result) {
            TypeData::Reference(r) => {
                assert_eq!(r.declaration, variant_decl);
                assert_eq!(r.generic_args, vec![TypeId::I32, TypeId::STRING]);
            }
            other => panic!("expected Reference(Result, [i32, string]), got {other:?}"),
        }
    }
}

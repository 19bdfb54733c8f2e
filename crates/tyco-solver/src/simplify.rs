//! Union/Join flattening and the `asStructType` / `asInterfaceType`
//! structural views used by assignability and common-type inference
//! (spec §4.3.4).

use std::rc::Rc;

use tyco_common::node::NodeId;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{InterfaceShape, StructField, StructShape};

use crate::assignability::ResolveReference;
use crate::equality::are_equal;

/// Flattens and de-duplicates `Union`/`Join`; merges an all-struct or
/// all-interface `Join` into one structural description. Anything else
/// is returned unchanged.
pub fn simplify(interner: &TypeInterner, resolve: ResolveReference<'_>, ty: TypeId) -> TypeId {
    match interner.get(ty) {
        TypeData::Union(members) => simplify_union(interner, resolve, &members),
        TypeData::Join(members) => simplify_join(interner, resolve, &members),
        _ => ty,
    }
}

fn simplify_union(interner: &TypeInterner, resolve: ResolveReference<'_>, members: &[TypeId]) -> TypeId {
    let mut flat = Vec::new();
    flatten_union(interner, resolve, members, &mut flat);
    let deduped = dedup_by_equality(interner, flat);
    if deduped.len() == 1 {
        return deduped[0];
    }
    interner.union(deduped)
}

fn flatten_union(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    members: &[TypeId],
    out: &mut Vec<TypeId>,
) {
    for &member in members {
        assert!(
            out.len() < tyco_common::limits::MAX_SIMPLIFY_MEMBERS,
            "union simplification exceeded {} members",
            tyco_common::limits::MAX_SIMPLIFY_MEMBERS
        );
        match interner.get(member) {
            TypeData::Union(inner) => flatten_union(interner, resolve, &inner, out),
            _ => out.push(member),
        }
    }
}

fn simplify_join(interner: &TypeInterner, resolve: ResolveReference<'_>, members: &[TypeId]) -> TypeId {
    let mut flat = Vec::new();
    flatten_join(interner, resolve, members, &mut flat);

    if !flat.is_empty() && flat.iter().all(|&t| as_struct_type(interner, resolve, t).is_some()) {
        return merge_structs(interner, resolve, &flat);
    }
    if !flat.is_empty() && flat.iter().all(|&t| matches!(interner.get(t), TypeData::Interface(_))) {
        return merge_interfaces(interner, &flat);
    }

    let deduped = dedup_by_equality(interner, flat);
    if deduped.len() == 1 {
        return deduped[0];
    }
    interner.join(deduped)
}

fn flatten_join(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    members: &[TypeId],
    out: &mut Vec<TypeId>,
) {
    for &member in members {
        assert!(
            out.len() < tyco_common::limits::MAX_SIMPLIFY_MEMBERS,
            "join simplification exceeded {} members",
            tyco_common::limits::MAX_SIMPLIFY_MEMBERS
        );
        let resolved = match interner.get(member) {
            TypeData::Reference(_) => resolve(member),
            _ => member,
        };
        match interner.get(resolved) {
            TypeData::Join(inner) => flatten_join(interner, resolve, &inner, out),
            _ => out.push(resolved),
        }
    }
}

fn dedup_by_equality(interner: &TypeInterner, items: Vec<TypeId>) -> Vec<TypeId> {
    let mut unique: Vec<TypeId> = Vec::new();
    for item in items {
        if !unique.iter().any(|&u| are_equal(interner, u, item).is_ok()) {
            unique.push(item);
        }
    }
    unique
}

fn merge_structs(interner: &TypeInterner, resolve: ResolveReference<'_>, members: &[TypeId]) -> TypeId {
    let mut fields = Vec::new();
    for &member in members {
        let Some(shape) = as_struct_type(interner, resolve, member) else {
            unreachable!("caller already verified every member is a struct");
        };
        for field in &shape.fields {
            if let Some(existing) = fields.iter().find(|f: &&StructField| f.name == field.name) {
                if !are_equal(interner, existing.ty, field.ty).is_ok() {
                    return interner.error(
                        format!(
                            "conflicting types for field '{}' in join simplification",
                            interner.resolve_name(field.name)
                        ),
                        None,
                        NodeId::NONE,
                    );
                }
            } else {
                fields.push(field.clone());
            }
        }
    }
    interner.struct_type(fields, true)
}

fn merge_interfaces(interner: &TypeInterner, members: &[TypeId]) -> TypeId {
    let mut methods = Vec::new();
    let mut super_types = Vec::new();
    for &member in members {
        if let TypeData::Interface(shape) = interner.get(member) {
            methods.extend(shape.methods.iter().cloned());
            super_types.extend(shape.super_types.iter().cloned());
        }
    }
    interner.interface(methods, super_types)
}

/// Resolved structural view of `ty` as a struct, if `ty` is directly a
/// `Struct`, a reference to one, or a join that simplifies to one.
pub fn as_struct_type(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    ty: TypeId,
) -> Option<Rc<StructShape>> {
    let resolved = match interner.get(ty) {
        TypeData::Reference(_) => {
            let r = resolve(ty);
            if r == ty {
                return None;
            }
            r
        }
        _ => ty,
    };
    match interner.get(simplify(interner, resolve, resolved)) {
        TypeData::Struct(s) => Some(s),
        _ => None,
    }
}

/// Resolved structural view of `ty` as an interface, if `ty` is directly
/// an `Interface`, a reference to one, or a join that simplifies to one.
pub fn as_interface_type(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    ty: TypeId,
) -> Option<Rc<InterfaceShape>> {
    let resolved = match interner.get(ty) {
        TypeData::Reference(_) => {
            let r = resolve(ty);
            if r == ty {
                return None;
            }
            r
        }
        _ => ty,
    };
    match interner.get(simplify(interner, resolve, resolved)) {
        TypeData::Interface(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyco_model::shapes::{Param, StructField};

    fn no_resolve(id: TypeId) -> TypeId {
        id
    }

    #[test]
    fn nested_unions_flatten_and_dedupe() {
        let interner = TypeInterner::new();
        let inner = interner.union(vec![TypeId::U32, TypeId::BOOL]);
        let outer = interner.union(vec![inner, TypeId::U32, TypeId::STRING]);
        let simplified = simplify(&interner, &no_resolve, outer);
        match interner.get(simplified) {
            TypeData::Union(members) => assert_eq!(members.len(), 3),
            other => panic!("expected Union, got {other:?}"),
        }
    }

    #[test]
    fn union_of_one_after_dedup_collapses() {
        let interner = TypeInterner::new();
        let u = interner.union(vec![TypeId::U32, TypeId::U32]);
        let simplified = simplify(&interner, &no_resolve, u);
        assert_eq!(simplified, TypeId::U32);
    }

    #[test]
    fn join_of_structs_merges_fields() {
        let interner = TypeInterner::new();
        let x = interner.intern_name("x");
        let y = interner.intern_name("y");
        let a = interner.struct_type(
            vec![StructField { name: x, ty: TypeId::U32, node: NodeId::NONE }],
            false,
        );
        let b = interner.struct_type(
            vec![StructField { name: y, ty: TypeId::BOOL, node: NodeId::NONE }],
            false,
        );
        let joined = interner.join(vec![a, b]);
        let simplified = simplify(&interner, &no_resolve, joined);
        match interner.get(simplified) {
            TypeData::Struct(shape) => assert_eq!(shape.fields.len(), 2),
            other => panic!("expected Struct, got {other:?}"),
        }
    }

    #[test]
    fn join_of_structs_with_conflicting_field_type_is_an_error() {
        let interner = TypeInterner::new();
        let x = interner.intern_name("x");
        let a = interner.struct_type(
            vec![StructField { name: x, ty: TypeId::U32, node: NodeId::NONE }],
            false,
        );
        let b = interner.struct_type(
            vec![StructField { name: x, ty: TypeId::STRING, node: NodeId::NONE }],
            false,
        );
        let joined = interner.join(vec![a, b]);
        let simplified = simplify(&interner, &no_resolve, joined);
        assert!(matches!(interner.get(simplified), TypeData::Error(_)));
    }

    #[test]
    fn as_struct_type_sees_through_join() {
        let interner = TypeInterner::new();
        let x = interner.intern_name("x");
        let a = interner.struct_type(
            vec![StructField { name: x, ty: TypeId::U32, node: NodeId::NONE }],
            false,
        );
        let joined = interner.join(vec![a]);
        assert!(as_struct_type(&interner, &no_resolve, joined).is_some());
    }

    #[test]
    fn join_of_interfaces_merges_methods() {
        let interner = TypeInterner::new();
        let greet = interner.intern_name("greet");
        let wave = interner.intern_name("wave");
        let method = |name| tyco_model::shapes::Method {
            names: smallvec::smallvec![name],
            generic_parameters: vec![],
            parameters: Vec::<Param>::new(),
            return_type: TypeId::VOID,
            is_static: false,
            is_override: false,
            is_local: false,
            node: NodeId::NONE,
        };
        let a = interner.interface(vec![method(greet)], vec![]);
        let b = interner.interface(vec![method(wave)], vec![]);
        let joined = interner.join(vec![a, b]);
        let simplified = simplify(&interner, &no_resolve, joined);
        match interner.get(simplified) {
            TypeData::Interface(shape) => assert_eq!(shape.methods.len(), 2),
            other => panic!("expected Interface, got {other:?}"),
        }
    }
}

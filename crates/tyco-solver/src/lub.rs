//! Structural Least Upper Bound, grouped by category (spec §4.3.6).
//!
//! Used directly for a homogeneous list of structs/interfaces/string-enums,
//! and as the fallback `getCommonType` reaches for once none of its more
//! specific ordered rules apply.

use tyco_common::node::NodeId;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;

use crate::assignability::ResolveReference;
use crate::equality::are_equal;
use crate::simplify::simplify;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Category {
    Struct,
    Class,
    Interface,
    Variant,
    StringEnum,
    StringLike,
    Primitive,
    Array,
    Function,
    Other,
}

fn categorize(data: &TypeData) -> Category {
    match data {
        TypeData::Struct(_) => Category::Struct,
        TypeData::Class(_) => Category::Class,
        TypeData::Interface(_) => Category::Interface,
        TypeData::Variant(_) | TypeData::VariantConstructor(_) => Category::Variant,
        TypeData::StringEnum(_) | TypeData::StringLiteral(_) => Category::StringEnum,
        TypeData::String => Category::StringLike,
        TypeData::Array(_) => Category::Array,
        TypeData::Function(_) => Category::Function,
        d if d.kind().is_numeric() || matches!(d, TypeData::Bool | TypeData::Null | TypeData::Void) => {
            Category::Primitive
        }
        _ => Category::Other,
    }
}

/// Resolves `ty` to the structural form LUB operates on: references are
/// resolved to their body, `Nullable` unwraps to its base, joins simplify.
fn resolve_structural(interner: &TypeInterner, resolve: ResolveReference<'_>, ty: TypeId) -> TypeId {
    match interner.get(ty) {
        TypeData::Reference(_) => {
            let resolved = resolve(ty);
            if resolved == ty {
                ty
            } else {
                resolve_structural(interner, resolve, resolved)
            }
        }
        TypeData::Nullable(base) => resolve_structural(interner, resolve, base),
        TypeData::Join(_) => simplify(interner, resolve, ty),
        _ => ty,
    }
}

/// Computes the structural LUB of `types`, or an `Error` type if none of
/// the single-category or string-enum/string mixed rules apply.
pub fn lub(interner: &TypeInterner, resolve: ResolveReference<'_>, types: &[TypeId]) -> TypeId {
    if types.is_empty() {
        return TypeId::NEVER;
    }
    if types.len() == 1 {
        return types[0];
    }

    let resolved: Vec<TypeId> = types
        .iter()
        .map(|&t| resolve_structural(interner, resolve, t))
        .collect();
    let categories: Vec<Category> = resolved.iter().map(|&t| categorize(&interner.get(t))).collect();

    let all_string_like = categories
        .iter()
        .all(|c| matches!(c, Category::StringEnum | Category::StringLike));
    if all_string_like {
        if categories.iter().any(|c| matches!(c, Category::StringLike)) {
            return TypeId::STRING;
        }
    }

    let first = categories[0];
    if categories.iter().all(|&c| c == first) {
        let result = match first {
            Category::Struct => lub_structs(interner, resolve, &resolved),
            Category::Interface => lub_interfaces(interner, resolve, &resolved),
            Category::StringEnum => lub_string_enums(interner, &resolved),
            Category::Class => interner.error(
                "classes have no structural common supertype",
                None,
                NodeId::NONE,
            ),
            _ => {
                return interner.error(
                    "no structural least upper bound rule applies to this category",
                    None,
                    NodeId::NONE,
                );
            }
        };
        return preserve_naming(interner, resolve, types, result);
    }

    interner.error(
        "cannot compute a structural least upper bound across mixed categories",
        None,
        NodeId::NONE,
    )
}

fn lub_structs(interner: &TypeInterner, resolve: ResolveReference<'_>, structs: &[TypeId]) -> TypeId {
    let shapes: Vec<_> = structs
        .iter()
        .filter_map(|&t| match interner.get(t) {
            TypeData::Struct(s) => Some(s),
            _ => None,
        })
        .collect();
    let Some(first) = shapes.first() else {
        return interner.error("empty struct set in LUB", None, NodeId::NONE);
    };
    let mut fields = Vec::new();
    for field in &first.fields {
        if shapes.iter().all(|s| s.field(field.name).is_some()) {
            let types: Vec<TypeId> = shapes.iter().map(|s| s.field(field.name).unwrap().ty).collect();
            let field_lub = lub(interner, resolve, &types);
            if matches!(interner.get(field_lub), TypeData::Error(_)) {
                return field_lub;
            }
            fields.push(tyco_model::shapes::StructField {
                name: field.name,
                ty: field_lub,
                node: NodeId::NONE,
            });
        }
    }
    if fields.is_empty() {
        return interner.error("struct LUB has an empty field intersection", None, NodeId::NONE);
    }
    interner.struct_type(fields, true)
}

fn lub_interfaces(interner: &TypeInterner, resolve: ResolveReference<'_>, ifaces: &[TypeId]) -> TypeId {
    let shapes: Vec<_> = ifaces
        .iter()
        .filter_map(|&t| match interner.get(t) {
            TypeData::Interface(s) => Some(s),
            _ => None,
        })
        .collect();
    let Some(first) = shapes.first() else {
        return interner.error("empty interface set in LUB", None, NodeId::NONE);
    };
    let mut methods = Vec::new();
    'outer: for method in &first.methods {
        let mut matches_all = Vec::with_capacity(shapes.len());
        for shape in &shapes {
            let Some(other) = shape
                .methods
                .iter()
                .find(|m| m.names.iter().any(|n| method.names.contains(n)))
            else {
                continue 'outer;
            };
            if other.parameters.len() != method.parameters.len() {
                continue 'outer;
            }
            for (p, q) in method.parameters.iter().zip(other.parameters.iter()) {
                if !are_equal(interner, p.ty, q.ty).is_ok() || p.is_mut != q.is_mut {
                    continue 'outer;
                }
            }
            matches_all.push(other.return_type);
        }
        let return_types = matches_all;
        let return_lub = lub(interner, resolve, &return_types);
        let mut merged = method.clone();
        merged.return_type = return_lub;
        methods.push(merged);
    }
    interner.interface(methods, vec![])
}

fn lub_string_enums(interner: &TypeInterner, enums: &[TypeId]) -> TypeId {
    let mut values = Vec::new();
    for &t in enums {
        if let TypeData::StringEnum(v) = interner.get(t) {
            values.extend(v.iter().copied());
        }
    }
    interner.string_enum(values)
}

/// If any original type is a `Reference` that resolves to a structure
/// equal to `result`, prefer returning that reference (spec §4.3.6 step 5
/// and §4.3.5's "reference preservation" note).
fn preserve_naming(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    originals: &[TypeId],
    result: TypeId,
) -> TypeId {
    if matches!(interner.get(result), TypeData::Error(_)) {
        return result;
    }
    for &original in originals {
        if matches!(interner.get(original), TypeData::Reference(_)) {
            let resolved = resolve(original);
            if resolved != original && are_equal(interner, resolved, result).is_ok() {
                return original;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyco_common::node::NodeId;
    use tyco_model::shapes::StructField;

    fn no_resolve(id: TypeId) -> TypeId {
        id
    }

    #[test]
    fn struct_lub_keeps_only_common_fields() {
        let interner = TypeInterner::new();
        let x = interner.intern_name("x");
        let y = interner.intern_name("y");
        let z = interner.intern_name("z");
        let a = interner.struct_type(
            vec![
                StructField { name: x, ty: TypeId::U32, node: NodeId::NONE },
                StructField { name: y, ty: TypeId::U32, node: NodeId::NONE },
                StructField { name: z, ty: TypeId::U32, node: NodeId::NONE },
            ],
            false,
        );
        let b = interner.struct_type(
            vec![
                StructField { name: x, ty: TypeId::U32, node: NodeId::NONE },
                StructField { name: y, ty: TypeId::U32, node: NodeId::NONE },
            ],
            false,
        );
        let result = lub(&interner, &no_resolve, &[a, b]);
        match interner.get(result) {
            TypeData::Struct(shape) => assert_eq!(shape.fields.len(), 2),
            other => panic!("expected Struct, got {other:?}"),
        }
    }

    #[test]
    fn struct_lub_with_no_common_fields_is_an_error() {
        let interner = TypeInterner::new();
        let x = interner.intern_name("x");
        let y = interner.intern_name("y");
        let a = interner.struct_type(
            vec![StructField { name: x, ty: TypeId::U32, node: NodeId::NONE }],
            false,
        );
        let b = interner.struct_type(
            vec![StructField { name: y, ty: TypeId::U32, node: NodeId::NONE }],
            false,
        );
        let result = lub(&interner, &no_resolve, &[a, b]);
        assert!(matches!(interner.get(result), TypeData::Error(_)));
    }

    #[test]
    fn class_lub_is_an_error() {
        let interner = TypeInterner::new();
        let a = interner.class(NodeId(1), vec![], vec![], vec![], vec![]);
        let b = interner.class(NodeId(2), vec![], vec![], vec![], vec![]);
        let result = lub(&interner, &no_resolve, &[a, b]);
        assert!(matches!(interner.get(result), TypeData::Error(_)));
    }

    #[test]
    fn string_enum_and_string_widen_to_string() {
        let interner = TypeInterner::new();
        let v = interner.intern_name("ok");
        let e = interner.string_enum(vec![v]);
        let result = lub(&interner, &no_resolve, &[e, TypeId::STRING]);
        assert_eq!(result, TypeId::STRING);
    }
}

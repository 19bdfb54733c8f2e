//! Structural equality (spec §4.3.1).

use tyco_common::outcome::Outcome;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::FnKind;

/// Decides whether `a` and `b` are the same type.
///
/// `Union`, `Join` and `Tuple` have no defined equality (spec §4.3.1):
/// they are only ever compared through assignability and simplification,
/// so this always reports failure for them, even `are_equal(u, u)`.
pub fn are_equal(interner: &TypeInterner, a: TypeId, b: TypeId) -> Outcome {
    let da = interner.get(a);
    let db = interner.get(b);
    if da.kind() != db.kind() {
        return Outcome::fail(format!(
            "kind mismatch: {:?} vs {:?}",
            da.kind(),
            db.kind()
        ));
    }
    match (da, db) {
        (TypeData::Union(_), TypeData::Union(_))
        | (TypeData::Join(_), TypeData::Join(_))
        | (TypeData::Tuple(_), TypeData::Tuple(_)) => {
            Outcome::fail("equality is not defined for Union/Join/Tuple")
        }

        (TypeData::StringLiteral(x), TypeData::StringLiteral(y)) => {
            Outcome::from(x == y).with_context("string literal value mismatch")
        }

        (TypeData::StringEnum(x), TypeData::StringEnum(y)) => {
            Outcome::from(x == y).with_context("string enum value set mismatch")
        }

        (TypeData::Array(x), TypeData::Array(y)) => {
            are_equal(interner, x, y).with_context("array element type")
        }

        (TypeData::Nullable(x), TypeData::Nullable(y)) => {
            are_equal(interner, x, y).with_context("nullable base type")
        }

        (TypeData::Struct(x), TypeData::Struct(y)) => {
            if x.fields.len() != y.fields.len() {
                return Outcome::fail("struct field count mismatch");
            }
            for field in &x.fields {
                match y.field(field.name) {
                    None => {
                        return Outcome::fail(format!(
                            "field '{}' missing on right-hand struct",
                            interner.resolve_name(field.name)
                        ));
                    }
                    Some(other) => {
                        let inner = are_equal(interner, field.ty, other.ty);
                        if !inner.is_ok() {
                            return inner.with_context(format!(
                                "field '{}'",
                                interner.resolve_name(field.name)
                            ));
                        }
                    }
                }
            }
            Outcome::ok()
        }

        (TypeData::Function(x), TypeData::Function(y)) => {
            let same_fn_type = matches!(
                (&x.fn_type, &y.fn_type),
                (FnKind::Plain, FnKind::Plain) | (FnKind::Coroutine, FnKind::Coroutine)
            );
            if !same_fn_type {
                return Outcome::fail("plain/coroutine mismatch");
            }
            if x.parameters.len() != y.parameters.len() {
                return Outcome::fail("parameter count mismatch");
            }
            for (px, py) in x.parameters.iter().zip(y.parameters.iter()) {
                if px.is_mut != py.is_mut {
                    return Outcome::fail("parameter mutability mismatch");
                }
                let inner = are_equal(interner, px.ty, py.ty);
                if !inner.is_ok() {
                    return inner.with_context("parameter type");
                }
            }
            are_equal(interner, x.return_type, y.return_type).with_context("return type")
        }

        (TypeData::Reference(x), TypeData::Reference(y)) => {
            if x.declaration != y.declaration {
                return Outcome::fail("different declarations");
            }
            if x.generic_args.len() != y.generic_args.len() {
                return Outcome::fail("generic argument count mismatch");
            }
            for (ax, ay) in x.generic_args.iter().zip(y.generic_args.iter()) {
                let inner = are_equal(interner, *ax, *ay);
                if !inner.is_ok() {
                    return inner.with_context("generic argument");
                }
            }
            Outcome::ok()
        }

        (TypeData::Generic(x), TypeData::Generic(y)) => {
            Outcome::from(x.name == y.name).with_context("generic parameter name mismatch")
        }

        (TypeData::Variant(x), TypeData::Variant(y)) => {
            if x.constructors.len() != y.constructors.len() {
                return Outcome::fail("constructor count mismatch");
            }
            for ctor in &x.constructors {
                match y.constructor(ctor.name) {
                    None => {
                        return Outcome::fail(format!(
                            "constructor '{}' missing",
                            interner.resolve_name(ctor.name)
                        ));
                    }
                    Some(other) => {
                        if ctor.parameters.len() != other.parameters.len() {
                            return Outcome::fail(format!(
                                "constructor '{}' arity mismatch",
                                interner.resolve_name(ctor.name)
                            ));
                        }
                        for (p, q) in ctor.parameters.iter().zip(other.parameters.iter()) {
                            if p.name != q.name {
                                return Outcome::fail("constructor parameter name mismatch");
                            }
                            let inner = are_equal(interner, p.ty, q.ty);
                            if !inner.is_ok() {
                                return inner.with_context("constructor parameter type");
                            }
                        }
                    }
                }
            }
            Outcome::ok()
        }

        (TypeData::TypeGuard(x), TypeData::TypeGuard(y)) => {
            if x.parameter_index != y.parameter_index {
                return Outcome::fail("type guard parameter index mismatch");
            }
            are_equal(interner, x.guarded_type, y.guarded_type).with_context("guarded type")
        }

        // Every remaining same-kind pair is a primitive singleton (or a
        // kind not given a structural equality rule by the spec, e.g.
        // VariantConstructor, Class, Interface, which are only compared
        // through assignability): equal by kind alone, already checked.
        _ => Outcome::ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyco_common::node::NodeId;
    use tyco_model::shapes::{Param, StructField};

    #[test]
    fn primitives_equal_by_kind() {
        let interner = TypeInterner::new();
        assert!(are_equal(&interner, TypeId::U32, TypeId::U32).is_ok());
        assert!(!are_equal(&interner, TypeId::U32, TypeId::I32).is_ok());
    }

    #[test]
    fn union_equality_is_always_undefined() {
        let interner = TypeInterner::new();
        let u = interner.union(vec![TypeId::U32]);
        assert!(!are_equal(&interner, u, u).is_ok());
    }

    #[test]
    fn struct_equality_is_order_independent() {
        let interner = TypeInterner::new();
        let x = interner.intern_name("x");
        let y = interner.intern_name("y");
        let a = interner.struct_type(
            vec![
                StructField { name: x, ty: TypeId::U32, node: NodeId::NONE },
                StructField { name: y, ty: TypeId::F64, node: NodeId::NONE },
            ],
            false,
        );
        let b = interner.struct_type(
            vec![
                StructField { name: y, ty: TypeId::F64, node: NodeId::NONE },
                StructField { name: x, ty: TypeId::U32, node: NodeId::NONE },
            ],
            false,
        );
        assert!(are_equal(&interner, a, b).is_ok());
    }

    #[test]
    fn function_equality_checks_mutability() {
        let interner = TypeInterner::new();
        let name = interner.intern_name("x");
        let plain = |is_mut: bool, interner: &TypeInterner| {
            interner.function(
                vec![Param { name, ty: TypeId::U32, is_mut }],
                TypeId::VOID,
                tyco_model::shapes::FnKind::Plain,
                vec![],
            )
        };
        let immutable = plain(false, &interner);
        let mutable = plain(true, &interner);
        assert!(are_equal(&interner, immutable, immutable).is_ok());
        assert!(!are_equal(&interner, immutable, mutable).is_ok());
    }

    #[test]
    fn reference_equality_requires_same_declaration() {
        let interner = TypeInterner::new();
        let a = interner.reference(NodeId(1), vec![TypeId::U32]);
        let b = interner.reference(NodeId(1), vec![TypeId::U32]);
        let c = interner.reference(NodeId(2), vec![TypeId::U32]);
        assert!(are_equal(&interner, a, b).is_ok());
        assert!(!are_equal(&interner, a, c).is_ok());
    }
}

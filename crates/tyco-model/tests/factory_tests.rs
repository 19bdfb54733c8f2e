//! Exercises the factory surface the way a consumer outside this crate
//! would: one call per kind, checking the shape that comes back rather
//! than internal arena layout.

use tyco_common::node::NodeId;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{Attribute, FnKind, Param, StructField};

#[test]
fn array_wraps_element() {
    let interner = TypeInterner::new();
    let arr = interner.array(TypeId::U32);
    assert!(matches!(interner.get(arr), TypeData::Array(e) if e == TypeId::U32));
}

#[test]
fn struct_preserves_field_order() {
    let interner = TypeInterner::new();
    let x = interner.intern_name("x");
    let y = interner.intern_name("y");
    let s = interner.struct_type(
        vec![
            StructField {
                name: x,
                ty: TypeId::U32,
                node: NodeId::NONE,
            },
            StructField {
                name: y,
                ty: TypeId::F64,
                node: NodeId::NONE,
            },
        ],
        false,
    );
    match interner.get(s) {
        TypeData::Struct(shape) => {
            assert_eq!(shape.fields.len(), 2);
            assert_eq!(shape.fields[0].name, x);
            assert_eq!(shape.fields[1].ty, TypeId::F64);
        }
        other => panic!("expected Struct, got {other:?}"),
    }
}

#[test]
fn function_records_generic_parameters_and_coroutine_kind() {
    let interner = TypeInterner::new();
    let t_name = interner.intern_name("T");
    let t = interner.generic(t_name, None, NodeId::NONE);
    let f = interner.function(
        vec![Param {
            name: interner.intern_name("x"),
            ty: t,
            is_mut: false,
        }],
        t,
        FnKind::Coroutine,
        vec![t],
    );
    match interner.get(f) {
        TypeData::Function(shape) => {
            assert!(shape.is_generic());
            assert_eq!(shape.parameters.len(), 1);
            assert!(matches!(shape.fn_type, FnKind::Coroutine));
        }
        other => panic!("expected Function, got {other:?}"),
    }
}

#[test]
fn class_references_its_implementations() {
    let interner = TypeInterner::new();
    let implementation = interner.implementation(vec![], vec![], None);
    let class = interner.class(
        NodeId(42),
        vec![Attribute {
            name: interner.intern_name("field"),
            ty: TypeId::I32,
            is_static: false,
            is_const: false,
            is_local: false,
        }],
        vec![],
        vec![],
        vec![implementation],
    );
    match interner.get(class) {
        TypeData::Class(shape) => {
            assert_eq!(shape.implementations, vec![implementation]);
            assert_eq!(shape.attributes.len(), 1);
        }
        other => panic!("expected Class, got {other:?}"),
    }
}

#[test]
fn string_enum_values_are_sorted_and_deduped() {
    let interner = TypeInterner::new();
    let a = interner.intern_name("a");
    let b = interner.intern_name("b");
    let e1 = interner.string_enum(vec![b, a, a]);
    let e2 = interner.string_enum(vec![a, b]);
    match (interner.get(e1), interner.get(e2)) {
        (TypeData::StringEnum(v1), TypeData::StringEnum(v2)) => {
            assert_eq!(v1.len(), 2);
            assert_eq!(*v1, *v2);
        }
        _ => panic!("expected StringEnum"),
    }
}

#[test]
fn error_type_carries_message_and_cause() {
    let interner = TypeInterner::new();
    let error = interner.error("double nullable", Some(TypeId::U32), NodeId(3));
    match interner.get(error) {
        TypeData::Error(shape) => {
            assert_eq!(shape.message, "double nullable");
            assert_eq!(shape.cause, Some(TypeId::U32));
        }
        other => panic!("expected Error, got {other:?}"),
    }
}

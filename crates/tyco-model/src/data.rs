//! The closed set of type descriptions (spec §3.1).
//!
//! Every variant's `kind()` is fixed at construction (invariant I1); the
//! `TypeInterner` in `interner.rs` is the only place that builds these.
//! Large nominal shapes are `Rc`-wrapped so that substitution and
//! simplification can share unchanged subtrees cheaply instead of deep
//! cloning them.

use std::rc::Rc;

use serde::Serialize;
use tyco_common::atom::Atom;
use tyco_common::node::NodeId;

use crate::id::TypeId;
use crate::kind::TypeKind;
use crate::shapes::*;

#[derive(Clone, Debug, Serialize)]
pub enum TypeData {
    // Primitive numerics, carrying their width explicitly so the
    // numeric-promotion table doesn't need a side table keyed by kind.
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,

    Bool,
    Void,
    String,
    Null,
    Never,
    Any,
    Unset,
    Error(Rc<ErrorShape>),

    StringLiteral(Atom),
    StringEnum(Rc<Vec<Atom>>),

    Array(TypeId),
    Nullable(TypeId),
    Union(Rc<Vec<TypeId>>),
    Join(Rc<Vec<TypeId>>),
    Tuple(Rc<Vec<TypeId>>),

    Struct(Rc<StructShape>),

    Interface(Rc<InterfaceShape>),
    Class(Rc<ClassShape>),
    Implementation(Rc<ImplementationShape>),
    Variant(Rc<VariantShape>),
    VariantConstructor(Rc<VariantConstructorShape>),
    Enum(Rc<EnumShape>),

    MetaClass(TypeId),
    MetaVariant(TypeId, Rc<Vec<TypeId>>),
    MetaVariantConstructor(TypeId, Rc<Vec<TypeId>>),
    MetaEnum(TypeId),

    Function(Rc<FunctionShape>),
    Coroutine(Rc<CoroutineShape>),

    Generic(Rc<GenericShape>),
    Reference(Rc<ReferenceShape>),

    Prototype(Rc<PrototypeShape>),

    Namespace(Rc<NamespaceShape>),
    Ffi(Rc<FfiShape>),
    ReturnType(TypeId),
    TypeGuard(Rc<TypeGuardShape>),
}

impl TypeData {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeData::U8 => TypeKind::U8,
            TypeData::U16 => TypeKind::U16,
            TypeData::U32 => TypeKind::U32,
            TypeData::U64 => TypeKind::U64,
            TypeData::I8 => TypeKind::I8,
            TypeData::I16 => TypeKind::I16,
            TypeData::I32 => TypeKind::I32,
            TypeData::I64 => TypeKind::I64,
            TypeData::F32 => TypeKind::F32,
            TypeData::F64 => TypeKind::F64,
            TypeData::Bool => TypeKind::Bool,
            TypeData::Void => TypeKind::Void,
            TypeData::String => TypeKind::String,
            TypeData::Null => TypeKind::Null,
            TypeData::Never => TypeKind::Never,
            TypeData::Any => TypeKind::Any,
            TypeData::Unset => TypeKind::Unset,
            TypeData::Error(_) => TypeKind::Error,
            TypeData::StringLiteral(_) => TypeKind::StringLiteral,
            TypeData::StringEnum(_) => TypeKind::StringEnum,
            TypeData::Array(_) => TypeKind::Array,
            TypeData::Nullable(_) => TypeKind::Nullable,
            TypeData::Union(_) => TypeKind::Union,
            TypeData::Join(_) => TypeKind::Join,
            TypeData::Tuple(_) => TypeKind::Tuple,
            TypeData::Struct(_) => TypeKind::Struct,
            TypeData::Interface(_) => TypeKind::Interface,
            TypeData::Class(_) => TypeKind::Class,
            TypeData::Implementation(_) => TypeKind::Implementation,
            TypeData::Variant(_) => TypeKind::Variant,
            TypeData::VariantConstructor(_) => TypeKind::VariantConstructor,
            TypeData::Enum(_) => TypeKind::Enum,
            TypeData::MetaClass(_) => TypeKind::MetaClass,
            TypeData::MetaVariant(_, _) => TypeKind::MetaVariant,
            TypeData::MetaVariantConstructor(_, _) => TypeKind::MetaVariantConstructor,
            TypeData::MetaEnum(_) => TypeKind::MetaEnum,
            TypeData::Function(_) => TypeKind::Function,
            TypeData::Coroutine(_) => TypeKind::Coroutine,
            TypeData::Generic(_) => TypeKind::Generic,
            TypeData::Reference(_) => TypeKind::Reference,
            TypeData::Prototype(_) => TypeKind::Prototype,
            TypeData::Namespace(_) => TypeKind::Namespace,
            TypeData::Ffi(_) => TypeKind::Ffi,
            TypeData::ReturnType(_) => TypeKind::ReturnType,
            TypeData::TypeGuard(_) => TypeKind::TypeGuard,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeData::Error(_))
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, TypeData::Unset)
    }

    /// The originating AST node, where this kind carries one directly.
    /// Most kinds don't: node back-references for ordinary inferred types
    /// live in the type provider's per-node cache entry, not here (only
    /// `Error`, declarations and similar carry their own).
    pub fn node(&self) -> Option<NodeId> {
        match self {
            TypeData::Error(e) => Some(e.node),
            TypeData::Generic(g) => Some(g.declaration),
            TypeData::Namespace(n) => Some(n.declaration),
            _ => None,
        }
    }
}

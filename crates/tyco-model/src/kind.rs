//! The `kind` discriminator shared by every type description (invariant I1:
//! `kind` is immutable after construction).

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    // Primitive numerics
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
    // Other primitives
    Bool,
    Void,
    String,
    Null,
    Never,
    Any,
    Unset,
    Error,
    // Literal / refinement
    StringLiteral,
    StringEnum,
    // Composite
    Array,
    Nullable,
    Union,
    Join,
    Tuple,
    // Structural
    Struct,
    // Nominal-structural hybrids
    Interface,
    Class,
    Implementation,
    Variant,
    VariantConstructor,
    Enum,
    // Meta wrappers
    MetaClass,
    MetaVariant,
    MetaVariantConstructor,
    MetaEnum,
    // Functional
    Function,
    Coroutine,
    // Generics
    Generic,
    Reference,
    // Prototype
    Prototype,
    // Auxiliary
    Namespace,
    Ffi,
    ReturnType,
    TypeGuard,
}

impl TypeKind {
    /// Primitive numeric kinds, used by the numeric-promotion table in
    /// assignability and by `isBasic`.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeKind::U8
                | TypeKind::U16
                | TypeKind::U32
                | TypeKind::U64
                | TypeKind::I8
                | TypeKind::I16
                | TypeKind::I32
                | TypeKind::I64
                | TypeKind::F32
                | TypeKind::F64
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeKind::U8
                | TypeKind::U16
                | TypeKind::U32
                | TypeKind::U64
                | TypeKind::I8
                | TypeKind::I16
                | TypeKind::I32
                | TypeKind::I64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeKind::F32 | TypeKind::F64)
    }
}

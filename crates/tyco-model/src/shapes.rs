//! Shape structs carried by the composite and nominal `TypeData` variants.
//!
//! Kept separate from the enum that owns them so each can carry its own
//! constructor and accessors without cluttering `data.rs`.

use crate::id::TypeId;
use serde::Serialize;
use smallvec::SmallVec;
use tyco_common::atom::Atom;
use tyco_common::node::NodeId;

/// A function or method parameter.
#[derive(Clone, Debug, Serialize)]
pub struct Param {
    pub name: Atom,
    pub ty: TypeId,
    pub is_mut: bool,
}

/// One field of a `Struct` (spec: `{name, type, node}`).
#[derive(Clone, Debug, Serialize)]
pub struct StructField {
    pub name: Atom,
    pub ty: TypeId,
    pub node: NodeId,
}

/// A method binding. `names` is a sequence because one method may bind
/// several operator spellings (e.g. `+` and `cat`, `[]` and `at`); overload
/// resolution must treat this as a name *set*, not a single name.
#[derive(Clone, Debug, Serialize)]
pub struct Method {
    pub names: SmallVec<[Atom; 1]>,
    pub generic_parameters: Vec<TypeId>,
    pub parameters: Vec<Param>,
    pub return_type: TypeId,
    pub is_static: bool,
    pub is_override: bool,
    pub is_local: bool,
    pub node: NodeId,
}

impl Method {
    /// True if `name` is one of this method's bound spellings.
    pub fn binds_name(&self, name: Atom) -> bool {
        self.names.contains(&name)
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }
}

/// A class or implementation attribute (field).
#[derive(Clone, Debug, Serialize)]
pub struct Attribute {
    pub name: Atom,
    pub ty: TypeId,
    pub is_static: bool,
    pub is_const: bool,
    pub is_local: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct StructShape {
    pub fields: Vec<StructField>,
    pub is_anonymous: bool,
}

impl StructShape {
    pub fn field(&self, name: Atom) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceShape {
    pub methods: Vec<Method>,
    pub super_types: Vec<TypeId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassShape {
    /// Identifies the declaration nominally; `Class <: Class` (spec
    /// §4.3.2 rule 15) compares this rather than structure.
    pub declaration: NodeId,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub super_types: Vec<TypeId>,
    pub implementations: Vec<TypeId>,
}

/// A mixin-like unit attached to a class (spec 3.1: `Implementation`).
#[derive(Clone, Debug, Serialize)]
pub struct ImplementationShape {
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub target_type: Option<TypeId>,
}

/// One arm declared inside a `Variant` (not yet instantiated with generic
/// arguments; see `VariantConstructorShape` for the instantiated form).
#[derive(Clone, Debug, Serialize)]
pub struct VariantArm {
    pub name: Atom,
    pub parameters: Vec<StructField>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariantShape {
    pub constructors: Vec<VariantArm>,
}

impl VariantShape {
    pub fn constructor(&self, name: Atom) -> Option<&VariantArm> {
        self.constructors.iter().find(|c| c.name == name)
    }
}

/// One instantiated arm of a variant (invariant I2: `base_variant` is the
/// *resolved* `Variant`, never a `Reference`).
#[derive(Clone, Debug, Serialize)]
pub struct VariantConstructorShape {
    pub base_variant: TypeId,
    pub constructor_name: Atom,
    pub parent_constructor: Option<TypeId>,
    pub generic_args: Vec<TypeId>,
    pub variant_declaration: Option<NodeId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumCase {
    pub name: Atom,
    pub value: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumShape {
    pub cases: Vec<EnumCase>,
    /// The integer kind backing this enum's representation, if one was
    /// declared explicitly (otherwise the provider defaults it).
    pub encoding: Option<TypeId>,
}

#[derive(Clone, Debug, Serialize)]
pub enum FnKind {
    Plain,
    Coroutine,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionShape {
    pub parameters: Vec<Param>,
    pub return_type: TypeId,
    pub fn_type: FnKind,
    pub generic_parameters: Vec<TypeId>,
}

impl FunctionShape {
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }
}

/// A coroutine *instance* produced by calling a `Function` whose `fn_type`
/// is `Coroutine`. Always displayed as `coroutine<fn(...) -> Y>`.
#[derive(Clone, Debug, Serialize)]
pub struct CoroutineShape {
    pub parameters: Vec<Param>,
    pub yield_type: TypeId,
}

#[derive(Clone, Debug, Serialize)]
pub struct GenericShape {
    pub name: Atom,
    pub constraint: Option<TypeId>,
    pub declaration: NodeId,
}

/// A named alias for a declaration body, not yet resolved (spec invariant
/// I6). Equality and assignability for `Reference` compare `declaration`
/// by identity, never by resolving both sides structurally first.
#[derive(Clone, Debug, Serialize)]
pub struct ReferenceShape {
    pub declaration: NodeId,
    pub generic_args: Vec<TypeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PrototypeTarget {
    Array,
    Coroutine,
    String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PrototypeShape {
    pub target: PrototypeTarget,
    pub methods: Vec<Method>,
    pub properties: Vec<Attribute>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NamespaceShape {
    pub name: Atom,
    pub declaration: NodeId,
}

#[derive(Clone, Debug, Serialize)]
pub struct FfiShape {
    pub name: Atom,
    pub dynlib: Atom,
    pub methods: Vec<Method>,
    pub is_local: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeGuardShape {
    pub parameter_name: Atom,
    pub parameter_index: u32,
    pub guarded_type: TypeId,
}

/// A carrier value produced when something nonsensical happens during
/// substitution or resolution (spec §7 kind 2). All subsequent operations
/// on an `Error` propagate success to silence downstream cascades.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorShape {
    pub message: String,
    pub cause: Option<TypeId>,
    pub node: NodeId,
}

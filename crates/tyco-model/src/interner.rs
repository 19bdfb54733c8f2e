//! The type factory (spec §4.1): the sole constructors for every `TypeData`
//! kind, plus the primitive name parser and the `isBasic` predicate.
//!
//! All invariants from spec §3.3 that can be enforced without reference
//! resolution are enforced here, centrally, rather than at each call site.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tyco_common::atom::{Atom, AtomInterner};
use tyco_common::node::NodeId;

use crate::data::TypeData;
use crate::id::TypeId;
use crate::shapes::*;

struct Inner {
    arena: Vec<TypeData>,
    string_literal_cache: FxHashMap<Atom, TypeId>,
}

/// Owns the arena of interned types and the atom table backing their
/// names. One instance per compilation (spec §5: nothing here is shared
/// across compilations).
pub struct TypeInterner {
    inner: RefCell<Inner>,
    atoms: AtomInterner,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let arena = vec![
            TypeData::U8,
            TypeData::U16,
            TypeData::U32,
            TypeData::U64,
            TypeData::I8,
            TypeData::I16,
            TypeData::I32,
            TypeData::I64,
            TypeData::F32,
            TypeData::F64,
            TypeData::Bool,
            TypeData::Void,
            TypeData::String,
            TypeData::Null,
            TypeData::Never,
            TypeData::Any,
            TypeData::Unset,
        ];
        debug_assert_eq!(arena.len(), crate::id::WELL_KNOWN_COUNT as usize);
        TypeInterner {
            inner: RefCell::new(Inner {
                arena,
                string_literal_cache: FxHashMap::default(),
            }),
            atoms: AtomInterner::new(),
        }
    }

    fn push(&self, data: TypeData) -> TypeId {
        let mut inner = self.inner.borrow_mut();
        let id = TypeId(inner.arena.len() as u32);
        inner.arena.push(data);
        id
    }

    /// Fetches the description for `id`. Panics on `TypeId::NONE` or an id
    /// from a different interner, both of which are caller bugs.
    pub fn get(&self, id: TypeId) -> TypeData {
        assert!(!id.is_none(), "attempted to look up TypeId::NONE");
        self.inner.borrow().arena[id.0 as usize].clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn atoms(&self) -> &AtomInterner {
        &self.atoms
    }

    pub fn intern_name(&self, name: &str) -> Atom {
        self.atoms.intern(name)
    }

    pub fn resolve_name(&self, atom: Atom) -> Rc<str> {
        Rc::from(&*self.atoms.resolve(atom))
    }

    // -- primitives --------------------------------------------------

    /// Parses one of the canonical numeric spellings
    /// (`u8…u64, i8…i64, f32, f64`) plus the other named primitives
    /// (`bool, void, string, null, never, any`). This is both the
    /// `from-string` constructor of spec §4.1(a) and the primitive-AST-node
    /// lifter of §4.1(b): the host hands us the spelling it parsed, we hand
    /// back the corresponding singleton.
    pub fn from_name(&self, name: &str) -> Option<TypeId> {
        Some(match name {
            "u8" => TypeId::U8,
            "u16" => TypeId::U16,
            "u32" => TypeId::U32,
            "u64" => TypeId::U64,
            "i8" => TypeId::I8,
            "i16" => TypeId::I16,
            "i32" => TypeId::I32,
            "i64" => TypeId::I64,
            "f32" => TypeId::F32,
            "f64" => TypeId::F64,
            "bool" => TypeId::BOOL,
            "void" => TypeId::VOID,
            "string" => TypeId::STRING,
            "null" => TypeId::NULL,
            "never" => TypeId::NEVER,
            "any" => TypeId::ANY,
            _ => return None,
        })
    }

    // -- carrier / literal --------------------------------------------

    pub fn error(&self, message: impl Into<String>, cause: Option<TypeId>, node: NodeId) -> TypeId {
        self.push(TypeData::Error(Rc::new(ErrorShape {
            message: message.into(),
            cause,
            node,
        })))
    }

    pub fn string_literal(&self, value: &str) -> TypeId {
        let atom = self.atoms.intern(value);
        if let Some(existing) = self.inner.borrow().string_literal_cache.get(&atom) {
            return *existing;
        }
        let id = self.push(TypeData::StringLiteral(atom));
        self.inner.borrow_mut().string_literal_cache.insert(atom, id);
        id
    }

    pub fn string_enum(&self, values: impl IntoIterator<Item = Atom>) -> TypeId {
        let mut values: Vec<Atom> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        self.push(TypeData::StringEnum(Rc::new(values)))
    }

    // -- composite ------------------------------------------------------

    pub fn array(&self, element: TypeId) -> TypeId {
        self.push(TypeData::Array(element))
    }

    /// Enforces invariant I4's "forbidden" half structurally: wrapping an
    /// already-nullable type returns it unchanged rather than nesting.
    /// The "legal during inference, rejected on explicit annotation" half
    /// is a validation-time concern and lives with the validator, not here.
    pub fn nullable(&self, base: TypeId) -> TypeId {
        if matches!(self.get(base), TypeData::Nullable(_)) {
            return base;
        }
        self.push(TypeData::Nullable(base))
    }

    pub fn union(&self, types: Vec<TypeId>) -> TypeId {
        self.push(TypeData::Union(Rc::new(types)))
    }

    pub fn join(&self, types: Vec<TypeId>) -> TypeId {
        self.push(TypeData::Join(Rc::new(types)))
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        self.push(TypeData::Tuple(Rc::new(elements)))
    }

    // -- structural -------------------------------------------------------

    pub fn struct_type(&self, fields: Vec<StructField>, is_anonymous: bool) -> TypeId {
        self.push(TypeData::Struct(Rc::new(StructShape {
            fields,
            is_anonymous,
        })))
    }

    // -- nominal-structural hybrids ---------------------------------------

    pub fn interface(&self, methods: Vec<Method>, super_types: Vec<TypeId>) -> TypeId {
        self.push(TypeData::Interface(Rc::new(InterfaceShape {
            methods,
            super_types,
        })))
    }

    pub fn class(
        &self,
        declaration: NodeId,
        attributes: Vec<Attribute>,
        methods: Vec<Method>,
        super_types: Vec<TypeId>,
        implementations: Vec<TypeId>,
    ) -> TypeId {
        self.push(TypeData::Class(Rc::new(ClassShape {
            declaration,
            attributes,
            methods,
            super_types,
            implementations,
        })))
    }

    pub fn implementation(
        &self,
        attributes: Vec<Attribute>,
        methods: Vec<Method>,
        target_type: Option<TypeId>,
    ) -> TypeId {
        self.push(TypeData::Implementation(Rc::new(ImplementationShape {
            attributes,
            methods,
            target_type,
        })))
    }

    pub fn variant(&self, constructors: Vec<VariantArm>) -> TypeId {
        self.push(TypeData::Variant(Rc::new(VariantShape { constructors })))
    }

    pub fn variant_constructor(
        &self,
        base_variant: TypeId,
        constructor_name: Atom,
        parent_constructor: Option<TypeId>,
        generic_args: Vec<TypeId>,
        variant_declaration: Option<NodeId>,
    ) -> TypeId {
        debug_assert!(
            matches!(self.get(base_variant), TypeData::Variant(_)),
            "VariantConstructor.base_variant must be a resolved Variant (invariant I2)"
        );
        self.push(TypeData::VariantConstructor(Rc::new(
            VariantConstructorShape {
                base_variant,
                constructor_name,
                parent_constructor,
                generic_args,
                variant_declaration,
            },
        )))
    }

    pub fn enum_type(&self, cases: Vec<EnumCase>, encoding: Option<TypeId>) -> TypeId {
        self.push(TypeData::Enum(Rc::new(EnumShape { cases, encoding })))
    }

    // -- meta wrappers ------------------------------------------------------

    pub fn meta_class(&self, base_class: TypeId) -> TypeId {
        self.push(TypeData::MetaClass(base_class))
    }

    pub fn meta_variant(&self, base_variant: TypeId, generic_args: Vec<TypeId>) -> TypeId {
        self.push(TypeData::MetaVariant(base_variant, Rc::new(generic_args)))
    }

    pub fn meta_variant_constructor(
        &self,
        base_variant_constructor: TypeId,
        generic_args: Vec<TypeId>,
    ) -> TypeId {
        self.push(TypeData::MetaVariantConstructor(
            base_variant_constructor,
            Rc::new(generic_args),
        ))
    }

    pub fn meta_enum(&self, base_enum: TypeId) -> TypeId {
        self.push(TypeData::MetaEnum(base_enum))
    }

    // -- functional -----------------------------------------------------

    pub fn function(
        &self,
        parameters: Vec<Param>,
        return_type: TypeId,
        fn_type: FnKind,
        generic_parameters: Vec<TypeId>,
    ) -> TypeId {
        self.push(TypeData::Function(Rc::new(FunctionShape {
            parameters,
            return_type,
            fn_type,
            generic_parameters,
        })))
    }

    pub fn coroutine(&self, parameters: Vec<Param>, yield_type: TypeId) -> TypeId {
        self.push(TypeData::Coroutine(Rc::new(CoroutineShape {
            parameters,
            yield_type,
        })))
    }

    // -- generics -------------------------------------------------------

    pub fn generic(&self, name: Atom, constraint: Option<TypeId>, declaration: NodeId) -> TypeId {
        self.push(TypeData::Generic(Rc::new(GenericShape {
            name,
            constraint,
            declaration,
        })))
    }

    pub fn reference(&self, declaration: NodeId, generic_args: Vec<TypeId>) -> TypeId {
        self.push(TypeData::Reference(Rc::new(ReferenceShape {
            declaration,
            generic_args,
        })))
    }

    // -- prototype --------------------------------------------------------

    pub fn prototype(
        &self,
        target: PrototypeTarget,
        methods: Vec<Method>,
        properties: Vec<Attribute>,
    ) -> TypeId {
        self.push(TypeData::Prototype(Rc::new(PrototypeShape {
            target,
            methods,
            properties,
        })))
    }

    // -- auxiliary --------------------------------------------------------

    pub fn namespace(&self, name: Atom, declaration: NodeId) -> TypeId {
        self.push(TypeData::Namespace(Rc::new(NamespaceShape {
            name,
            declaration,
        })))
    }

    pub fn ffi(&self, name: Atom, dynlib: Atom, methods: Vec<Method>, is_local: bool) -> TypeId {
        self.push(TypeData::Ffi(Rc::new(FfiShape {
            name,
            dynlib,
            methods,
            is_local,
        })))
    }

    pub fn return_type(&self, inner: TypeId) -> TypeId {
        self.push(TypeData::ReturnType(inner))
    }

    pub fn type_guard(
        &self,
        parameter_name: Atom,
        parameter_index: u32,
        guarded_type: TypeId,
    ) -> TypeId {
        self.push(TypeData::TypeGuard(Rc::new(TypeGuardShape {
            parameter_name,
            parameter_index,
            guarded_type,
        })))
    }

    /// Recognises the numeric/bool/null primitives, transitively through
    /// `Reference` (resolving once via the type provider) but excluding
    /// `String` (spec §4.1(c)).
    ///
    /// `resolve_reference` is injected rather than called directly so this
    /// crate never depends on the type provider; the provider is the one
    /// calling `is_basic`, not the other way around.
    pub fn is_basic(&self, ty: TypeId, resolve_reference: &dyn Fn(TypeId) -> Option<TypeId>) -> bool {
        match self.get(ty) {
            TypeData::U8
            | TypeData::U16
            | TypeData::U32
            | TypeData::U64
            | TypeData::I8
            | TypeData::I16
            | TypeData::I32
            | TypeData::I64
            | TypeData::F32
            | TypeData::F64
            | TypeData::Bool
            | TypeData::Null => true,
            TypeData::Reference(_) => match resolve_reference(ty) {
                Some(resolved) if resolved != ty => self.is_basic(resolved, resolve_reference),
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::PrototypeTarget;

    #[test]
    fn well_known_primitives_are_preregistered() {
        let interner = TypeInterner::new();
        assert!(matches!(interner.get(TypeId::STRING), TypeData::String));
        assert!(matches!(interner.get(TypeId::NEVER), TypeData::Never));
        assert!(matches!(interner.get(TypeId::U32), TypeData::U32));
    }

    #[test]
    fn from_name_round_trips_canonical_spellings() {
        let interner = TypeInterner::new();
        assert_eq!(interner.from_name("u32"), Some(TypeId::U32));
        assert_eq!(interner.from_name("f64"), Some(TypeId::F64));
        assert_eq!(interner.from_name("string"), Some(TypeId::STRING));
        assert_eq!(interner.from_name("not-a-primitive"), None);
    }

    #[test]
    fn string_literal_dedups() {
        let interner = TypeInterner::new();
        let a = interner.string_literal("ok");
        let b = interner.string_literal("ok");
        let c = interner.string_literal("err");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn nullable_of_nullable_collapses() {
        let interner = TypeInterner::new();
        let once = interner.nullable(TypeId::U32);
        let twice = interner.nullable(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn variant_constructor_requires_resolved_variant() {
        let interner = TypeInterner::new();
        let variant = interner.variant(vec![]);
        let name = interner.intern_name("Ok");
        let vc = interner.variant_constructor(variant, name, None, vec![], None);
        assert!(matches!(interner.get(vc), TypeData::VariantConstructor(_)));
    }

    #[test]
    fn is_basic_recognises_numerics_and_bool_but_not_string() {
        let interner = TypeInterner::new();
        let no_resolve = |_: TypeId| None;
        assert!(interner.is_basic(TypeId::U32, &no_resolve));
        assert!(interner.is_basic(TypeId::BOOL, &no_resolve));
        assert!(interner.is_basic(TypeId::NULL, &no_resolve));
        assert!(!interner.is_basic(TypeId::STRING, &no_resolve));
        assert!(!interner.is_basic(TypeId::ANY, &no_resolve));
    }

    #[test]
    fn is_basic_resolves_through_reference() {
        let interner = TypeInterner::new();
        let declaration = NodeId(7);
        let reference = interner.reference(declaration, vec![]);
        let resolve = |id: TypeId| if id == reference { Some(TypeId::I64) } else { None };
        assert!(interner.is_basic(reference, &resolve));
    }

    #[test]
    fn prototype_factory_tags_target() {
        let interner = TypeInterner::new();
        let proto = interner.prototype(PrototypeTarget::Array, vec![], vec![]);
        match interner.get(proto) {
            TypeData::Prototype(p) => assert_eq!(p.target, PrototypeTarget::Array),
            other => panic!("expected Prototype, got {other:?}"),
        }
    }
}

//! The type provider itself (spec §4.2): `typeOf`, `resolveReference`,
//! `invalidate`, and the overload-candidate filter shared with the linker
//! (C4).

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tyco_common::node::NodeId;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{Attribute, FnKind, Method, Param, StructField, VariantArm};
use tyco_solver::pending::PendingChecks;
use tyco_solver::substitution::Substitution;

use crate::cache::{CacheState, NodeCache};
use crate::host::{AstProducer, AttributeNode, HostError, MethodNode, NodeShape, ParamNode};

/// Owns the per-node cache and the reference-resolution memo table for one
/// compilation. Borrows the interner and the AST producer rather than
/// owning them, matching the "pass it explicitly rather than making it
/// ambient" guidance (spec §9).
pub struct TypeProvider<'a, A: AstProducer> {
    interner: &'a TypeInterner,
    ast: &'a A,
    cache: RefCell<NodeCache>,
    reference_cache: RefCell<FxHashMap<(NodeId, Vec<TypeId>), TypeId>>,
    pending: PendingChecks,
}

impl<'a, A: AstProducer> TypeProvider<'a, A> {
    pub fn new(interner: &'a TypeInterner, ast: &'a A) -> Self {
        TypeProvider {
            interner,
            ast,
            cache: RefCell::new(NodeCache::new()),
            reference_cache: RefCell::new(FxHashMap::default()),
            pending: PendingChecks::new(),
        }
    }

    /// A one-step resolver suitable for handing to `tyco-solver` entry
    /// points that take a `ResolveReference` closure (spec §10.6).
    pub fn resolver(&self) -> impl Fn(TypeId) -> TypeId + '_ {
        move |id| self.resolve_reference(id)
    }

    /// The interner backing this provider, for callers (the linker) that
    /// need to inspect `TypeData` directly rather than through `typeOf`.
    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    /// The raw node shape, undigested by caching. The linker's
    /// declaration-well-formedness checks (e.g. nullable-primitive
    /// annotations) walk shapes the provider itself never needs to revisit.
    pub fn describe(&self, node: NodeId) -> Result<NodeShape, HostError> {
        self.ast.describe(node)
    }

    /// Maps an AST node to its inferred type, memoized per node.
    pub fn type_of(&self, node: NodeId) -> Result<TypeId, HostError> {
        if let Some(state) = self.cache.borrow().get(node) {
            match state {
                CacheState::Computed(ty) => return Ok(ty),
                // A re-entrant call into a node still being computed: the
                // caller's enclosing assignability check treats this as
                // success (rule §4.3.2 #4), so `Unset` stands in here.
                CacheState::Computing | CacheState::Invalidated => return Ok(TypeId::UNSET),
            }
        }

        self.cache.borrow_mut().begin_computing(node);
        let shape = self.ast.describe(node)?;
        let ty = self.build(node, &shape)?;
        self.cache.borrow_mut().finish(node, ty);
        Ok(ty)
    }

    fn child(&self, parent: NodeId, child: NodeId) -> Result<TypeId, HostError> {
        self.cache.borrow_mut().record_dependency(parent, child);
        self.type_of(child)
    }

    fn build(&self, node: NodeId, shape: &NodeShape) -> Result<TypeId, HostError> {
        let interner = self.interner;
        Ok(match shape {
            NodeShape::Primitive(name) => interner.from_name(&interner.resolve_name(*name)).unwrap_or_else(|| {
                interner.error(format!("unknown primitive spelling '{}'", interner.resolve_name(*name)), None, node)
            }),
            NodeShape::StringLiteral(value) => interner.string_literal(&interner.resolve_name(*value)),
            NodeShape::Array(elem) => interner.array(self.child(node, *elem)?),
            NodeShape::Nullable(base) => interner.nullable(self.child(node, *base)?),
            NodeShape::Tuple(elems) => {
                let elems = elems.iter().map(|&e| self.child(node, e)).collect::<Result<_, _>>()?;
                interner.tuple(elems)
            }
            NodeShape::Union(members) => {
                let members = members.iter().map(|&m| self.child(node, m)).collect::<Result<_, _>>()?;
                interner.union(members)
            }
            NodeShape::Join(members) => {
                let members = members.iter().map(|&m| self.child(node, m)).collect::<Result<_, _>>()?;
                interner.join(members)
            }
            NodeShape::Struct { fields, is_anonymous } => {
                let fields = self.struct_fields(node, fields)?;
                interner.struct_type(fields, *is_anonymous)
            }
            NodeShape::FunctionType { parameters, return_type, is_coroutine, generic_parameters } => {
                let parameters = self.params(node, parameters)?;
                let return_type = self.child(node, *return_type)?;
                let generic_parameters =
                    generic_parameters.iter().map(|&g| self.child(node, g)).collect::<Result<_, _>>()?;
                let fn_type = if *is_coroutine { FnKind::Coroutine } else { FnKind::Plain };
                interner.function(parameters, return_type, fn_type, generic_parameters)
            }
            NodeShape::Interface { methods, super_types } => {
                let methods = self.methods(node, methods)?;
                let super_types = super_types.iter().map(|&s| self.child(node, s)).collect::<Result<_, _>>()?;
                interner.interface(methods, super_types)
            }
            NodeShape::Class { attributes, methods, super_types, implementations } => {
                let attributes = self.attributes(node, attributes)?;
                let methods = self.methods(node, methods)?;
                let super_types = super_types.iter().map(|&s| self.child(node, s)).collect::<Result<_, _>>()?;
                let implementations =
                    implementations.iter().map(|&i| self.child(node, i)).collect::<Result<_, _>>()?;
                interner.class(node, attributes, methods, super_types, implementations)
            }
            NodeShape::Implementation { attributes, methods, target_type } => {
                let attributes = self.attributes(node, attributes)?;
                let methods = self.methods(node, methods)?;
                let target_type = target_type.map(|t| self.child(node, t)).transpose()?;
                interner.implementation(attributes, methods, target_type)
            }
            NodeShape::Variant { constructors } => {
                let mut arms = Vec::with_capacity(constructors.len());
                for (name, params) in constructors {
                    let parameters = self.struct_fields(node, params)?;
                    arms.push(VariantArm { name: *name, parameters });
                }
                interner.variant(arms)
            }
            NodeShape::Enum { cases, encoding } => {
                let cases = cases
                    .iter()
                    .map(|(name, value)| tyco_model::shapes::EnumCase { name: *name, value: *value })
                    .collect();
                let encoding = encoding.map(|e| self.child(node, e)).transpose()?;
                interner.enum_type(cases, encoding)
            }
            NodeShape::GenericParam { name, constraint } => {
                let constraint = constraint.map(|c| self.child(node, c)).transpose()?;
                interner.generic(*name, constraint, node)
            }
            NodeShape::Reference { declaration, generic_args } => {
                let generic_args = generic_args.iter().map(|&a| self.child(node, a)).collect::<Result<_, _>>()?;
                interner.reference(*declaration, generic_args)
            }
            NodeShape::TypeAlias { body, .. } => self.child(node, *body)?,
        })
    }

    fn struct_fields(&self, parent: NodeId, fields: &[(tyco_common::atom::Atom, NodeId)]) -> Result<Vec<StructField>, HostError> {
        fields
            .iter()
            .map(|&(name, type_node)| {
                Ok(StructField { name, ty: self.child(parent, type_node)?, node: type_node })
            })
            .collect()
    }

    fn params(&self, parent: NodeId, params: &[ParamNode]) -> Result<Vec<Param>, HostError> {
        params
            .iter()
            .map(|p| Ok(Param { name: p.name, ty: self.child(parent, p.type_node)?, is_mut: p.is_mut }))
            .collect()
    }

    fn attributes(&self, parent: NodeId, attrs: &[AttributeNode]) -> Result<Vec<Attribute>, HostError> {
        attrs
            .iter()
            .map(|a| {
                Ok(Attribute {
                    name: a.name,
                    ty: self.child(parent, a.type_node)?,
                    is_static: a.is_static,
                    is_const: a.is_const,
                    is_local: a.is_local,
                })
            })
            .collect()
    }

    fn methods(&self, parent: NodeId, methods: &[MethodNode]) -> Result<Vec<Method>, HostError> {
        methods
            .iter()
            .map(|m| {
                let generic_parameters =
                    m.generic_parameters.iter().map(|&g| self.child(parent, g)).collect::<Result<_, _>>()?;
                let parameters = self.params(parent, &m.parameters)?;
                let return_type = self.child(parent, m.return_type)?;
                Ok(Method {
                    names: m.names.iter().copied().collect(),
                    generic_parameters,
                    parameters,
                    return_type,
                    is_static: m.is_static,
                    is_override: m.is_override,
                    is_local: m.is_local,
                    node: parent,
                })
            })
            .collect()
    }

    /// Resolves `Reference(decl, args)` to `decl`'s structural body with
    /// `args` substituted for its generic parameters (spec §4.2). Returns
    /// `ty` unchanged if it is not a `Reference`.
    pub fn resolve_reference(&self, ty: TypeId) -> TypeId {
        let TypeData::Reference(reference) = self.interner.get(ty) else {
            return ty;
        };
        let key = (reference.declaration, reference.generic_args.clone());
        if let Some(&cached) = self.reference_cache.borrow().get(&key) {
            return cached;
        }

        let shape = match self.ast.describe(reference.declaration) {
            Ok(shape) => shape,
            Err(err) => {
                return self.interner.error(format!("could not resolve reference: {err}"), None, reference.declaration);
            }
        };
        let generic_names: Vec<_> = match &shape {
            NodeShape::TypeAlias { generic_parameters, .. } => generic_parameters
                .iter()
                .filter_map(|&g| match self.ast.describe(g) {
                    Ok(NodeShape::GenericParam { name, .. }) => Some(name),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        // Must go through `type_of`'s per-node cache rather than a fresh
        // `build`: a recursive declaration's body embeds a `Reference` back
        // to itself, and `substitute_reference`'s cycle guard keys on that
        // embedded reference's `TypeId` identity (§5). A fresh `build` would
        // allocate a new arena slot for it on every re-entry, so the guard
        // would never see the same pair twice and would recurse forever.
        // Memoizing the body here is what makes that identity stable.
        let body = match self.type_of(reference.declaration) {
            Ok(ty) => ty,
            Err(err) => {
                return self.interner.error(format!("could not build reference body: {err}"), None, reference.declaration);
            }
        };

        let mut sigma: Substitution = rustc_hash::FxHashMap::default();
        for (name, &arg) in generic_names.into_iter().zip(reference.generic_args.iter()) {
            sigma.insert(name, arg);
        }

        let resolve = |id: TypeId| self.resolve_reference(id);
        let substituted = tyco_solver::substitution::substitute(self.interner, &self.pending, &resolve, body, &sigma);
        if !substituted.errors.is_empty() {
            tracing::debug!(errors = ?substituted.errors, "reference resolution produced non-fatal substitution errors");
        }

        self.reference_cache.borrow_mut().insert(key, substituted.ty);
        substituted.ty
    }

    /// Invalidates `node`'s cached type and cascades to every node whose
    /// last computation read it (spec §5). Does not clear the
    /// reference-resolution memo; a reference keyed on a declaration whose
    /// own type-expression nodes were invalidated will simply recompute a
    /// fresh body on next lookup since `type_of` misses the per-node cache.
    pub fn invalidate(&self, node: NodeId) -> usize {
        self.cache.borrow_mut().invalidate(node)
    }

    /// Given the inferred argument types and a set of candidate function
    /// types, returns the indices of candidates whose parameters admit the
    /// arguments under assignability (with generics inferred first when the
    /// candidate is itself generic). Shared verbatim by the linker's
    /// overload disambiguator (spec §4.2, §4.4).
    pub fn filter_overload_candidates(&self, args: &[TypeId], candidates: &[TypeId]) -> Vec<usize> {
        let resolve = |id: TypeId| self.resolve_reference(id);
        let mut matches = Vec::new();
        for (index, &candidate) in candidates.iter().enumerate() {
            let TypeData::Function(shape) = self.interner.get(candidate) else {
                continue;
            };
            if shape.parameters.len() != args.len() {
                continue;
            }
            let parameter_types: Vec<TypeId> = shape.parameters.iter().map(|p| p.ty).collect();
            let sigma = if shape.is_generic() {
                let generic_names: Vec<_> = shape
                    .generic_parameters
                    .iter()
                    .filter_map(|&g| match self.interner.get(g) {
                        TypeData::Generic(gs) => Some(gs.name),
                        _ => None,
                    })
                    .collect();
                Some(tyco_solver::generics::infer_generics(self.interner, &generic_names, &parameter_types, args))
            } else {
                None
            };

            let pending = PendingChecks::new();
            let all_assignable = parameter_types.iter().zip(args.iter()).all(|(&param, &arg)| {
                let effective_param = match &sigma {
                    Some(sigma) => {
                        tyco_solver::substitution::substitute(self.interner, &pending, &resolve, param, sigma).ty
                    }
                    None => param,
                };
                tyco_solver::assignability::is_assignable(self.interner, &pending, &resolve, arg, effective_param)
                    .is_ok()
            });
            if all_assignable {
                matches.push(index);
            }
        }
        matches
    }
}

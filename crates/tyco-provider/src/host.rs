//! The three external collaborators consulted by the type provider (spec
//! §6.1): the AST producer, the scope provider, and the workspace. Modelled
//! as plain traits with the minimum method set the core actually calls —
//! no parser, binder, or workspace crate lives here.

use std::fmt;

use tyco_common::atom::Atom;
use tyco_common::node::NodeId;

/// A genuine operational failure crossing the host boundary: a missing
/// node, an unreadable workspace file. Never used for a structural
/// verdict — those are `Outcome` (tyco-common), not `Result`.
#[derive(Clone, Debug)]
pub enum HostError {
    NodeNotFound(NodeId),
    PrototypeUnavailable(&'static str),
    ScopeLookupFailed(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NodeNotFound(node) => write!(f, "host could not resolve node {node}"),
            HostError::PrototypeUnavailable(which) => {
                write!(f, "workspace could not supply the {which} prototype declaration")
            }
            HostError::ScopeLookupFailed(name) => {
                write!(f, "scope provider failed looking up candidates for '{name}'")
            }
        }
    }
}

impl std::error::Error for HostError {}

/// One function or method parameter as described by the host's AST, prior
/// to type inference (the parameter's type is itself a `NodeId` to be
/// resolved through `typeOf`).
#[derive(Clone, Debug)]
pub struct ParamNode {
    pub name: Atom,
    pub type_node: NodeId,
    pub is_mut: bool,
}

/// One method binding as described by the host's AST.
#[derive(Clone, Debug)]
pub struct MethodNode {
    pub names: Vec<Atom>,
    pub generic_parameters: Vec<NodeId>,
    pub parameters: Vec<ParamNode>,
    pub return_type: NodeId,
    pub is_static: bool,
    pub is_override: bool,
    pub is_local: bool,
}

/// One class/implementation attribute as described by the host's AST.
#[derive(Clone, Debug)]
pub struct AttributeNode {
    pub name: Atom,
    pub type_node: NodeId,
    pub is_static: bool,
    pub is_const: bool,
    pub is_local: bool,
}

/// The shape the AST producer hands back for a single node: every closed
/// kind of §3.1 that can appear as surface syntax (type annotations and
/// declarations). Kinds produced only by inference or substitution
/// (`Error`, `Unset`, `MetaClass` and friends, `Coroutine` instances,
/// `TypeGuard`, `ReturnType`, `Prototype`) never come from the host and
/// have no variant here.
#[derive(Clone, Debug)]
pub enum NodeShape {
    Primitive(Atom),
    StringLiteral(Atom),
    Array(NodeId),
    Nullable(NodeId),
    Tuple(Vec<NodeId>),
    Union(Vec<NodeId>),
    Join(Vec<NodeId>),
    Struct { fields: Vec<(Atom, NodeId)>, is_anonymous: bool },
    FunctionType {
        parameters: Vec<ParamNode>,
        return_type: NodeId,
        is_coroutine: bool,
        generic_parameters: Vec<NodeId>,
    },
    Interface { methods: Vec<MethodNode>, super_types: Vec<NodeId> },
    Class {
        attributes: Vec<AttributeNode>,
        methods: Vec<MethodNode>,
        super_types: Vec<NodeId>,
        implementations: Vec<NodeId>,
    },
    Implementation {
        attributes: Vec<AttributeNode>,
        methods: Vec<MethodNode>,
        target_type: Option<NodeId>,
    },
    Variant { constructors: Vec<(Atom, Vec<(Atom, NodeId)>)> },
    Enum { cases: Vec<(Atom, Option<i64>)>, encoding: Option<NodeId> },
    GenericParam { name: Atom, constraint: Option<NodeId> },
    Reference { declaration: NodeId, generic_args: Vec<NodeId> },
    /// A named alias: `declaration`'s own generic parameter nodes, plus the
    /// node describing its body. `resolveReference` substitutes through
    /// `generic_parameters` named by their `GenericParam` shapes.
    TypeAlias { generic_parameters: Vec<NodeId>, body: NodeId },
}

/// Supplies the type-relevant shape of any reachable node, stably
/// identified so the provider's cache key is well-defined (spec §6.1).
pub trait AstProducer {
    fn describe(&self, node: NodeId) -> Result<NodeShape, HostError>;
}

/// Given a reference site and a simple name, returns candidate
/// declarations with that name — the overload disambiguator (C4) takes it
/// from there.
pub trait ScopeProvider {
    fn candidates(&self, reference_site: NodeId, name: &str) -> Result<Vec<NodeId>, HostError>;
}

/// Supplies the three built-in prototype declarations by their root node.
/// The core consumes their AST (via `AstProducer::describe`), never their
/// text.
pub trait Workspace {
    fn array_prototype(&self) -> Result<NodeId, HostError>;
    fn coroutine_prototype(&self) -> Result<NodeId, HostError>;
    fn string_prototype(&self) -> Result<NodeId, HostError>;
}

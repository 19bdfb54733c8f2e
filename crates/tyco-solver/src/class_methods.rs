//! Merges a class's own methods with those inherited from its
//! `implementations` (spec §4.3.2 rule 15, §4.4).
//!
//! Shared by assignability (does the class satisfy an interface?) and by
//! the link-time overload-uniqueness validator, so the shadowing rule only
//! lives in one place.

use tyco_model::data::TypeData;
use tyco_model::interner::TypeInterner;
use tyco_model::shapes::{ClassShape, Method};

use crate::assignability::ResolveReference;

/// The class's own methods plus every implementation method not shadowed
/// by an `override` method of the same name declared directly on the
/// class.
pub fn effective_methods(
    interner: &TypeInterner,
    resolve: ResolveReference<'_>,
    class: &ClassShape,
) -> Vec<Method> {
    let mut out = class.methods.clone();
    for impl_id in &class.implementations {
        let impl_ty = match interner.get(*impl_id) {
            TypeData::Reference(_) => resolve(*impl_id),
            _ => *impl_id,
        };
        if let TypeData::Implementation(impl_shape) = interner.get(impl_ty) {
            for method in &impl_shape.methods {
                let shadowed = class.methods.iter().any(|own| {
                    own.is_override && own.names.iter().any(|n| method.names.contains(n))
                });
                if !shadowed {
                    out.push(method.clone());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyco_common::node::NodeId;
    use tyco_model::id::TypeId;
    use tyco_model::shapes::Param;
    use smallvec::smallvec;

    fn method(interner: &TypeInterner, name: &str, is_override: bool) -> Method {
        Method {
            names: smallvec![interner.intern_name(name)],
            generic_parameters: vec![],
            parameters: vec![],
            return_type: TypeId::VOID,
            is_static: false,
            is_override,
            is_local: false,
            node: NodeId::NONE,
        }
    }

    #[test]
    fn implementation_methods_are_included_when_not_shadowed() {
        let interner = TypeInterner::new();
        let greet = method(&interner, "greet", false);
        let implementation = interner.implementation(vec![], vec![greet], None);
        let class = interner.class(NodeId(1), vec![], vec![], vec![], vec![implementation]);
        let TypeData::Class(shape) = interner.get(class) else {
            unreachable!()
        };
        let resolve = |id: TypeId| id;
        let methods = effective_methods(&interner, &resolve, &shape);
        assert_eq!(methods.len(), 1);
    }

    #[test]
    fn class_override_shadows_implementation_method() {
        let interner = TypeInterner::new();
        let impl_greet = method(&interner, "greet", false);
        let implementation = interner.implementation(vec![], vec![impl_greet], None);
        let own_override = method(&interner, "greet", true);
        let class = interner.class(
            NodeId(1),
            vec![],
            vec![own_override],
            vec![],
            vec![implementation],
        );
        let TypeData::Class(shape) = interner.get(class) else {
            unreachable!()
        };
        let resolve = |id: TypeId| id;
        let methods = effective_methods(&interner, &resolve, &shape);
        assert_eq!(methods.len(), 1);
        assert!(methods[0].is_override);
    }

    #[test]
    fn named_implementation_behind_a_reference_is_resolved() {
        let interner = TypeInterner::new();
        let greet = method(&interner, "greet", false);
        let implementation = interner.implementation(vec![], vec![greet], None);
        let reference = interner.reference(NodeId(2), vec![]);
        let resolve = |id: TypeId| if id == reference { implementation } else { id };
        let class = interner.class(NodeId(1), vec![], vec![], vec![], vec![reference]);
        let TypeData::Class(shape) = interner.get(class) else {
            unreachable!()
        };
        let methods = effective_methods(&interner, &resolve, &shape);
        assert_eq!(methods.len(), 1);
        assert_eq!(interner.resolve_name(methods[0].names[0]), "greet");
    }
}

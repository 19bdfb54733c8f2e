//! Generic constraint validation (spec §4.3.10).

use tyco_common::outcome::Outcome;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;

use crate::assignability::{is_assignable, ResolveReference};
use crate::pending::PendingChecks;

/// Validates that `concrete` satisfies `constraint`. An absent constraint
/// always succeeds. `Union` constraints accept if any member accepts;
/// `Join` constraints require every member to accept. Anything else falls
/// back to ordinary assignability.
pub fn validate_constraint(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    concrete: TypeId,
    constraint: Option<TypeId>,
) -> Outcome {
    let Some(constraint) = constraint else {
        return Outcome::ok();
    };

    match interner.get(constraint) {
        TypeData::Union(members) => {
            if members.iter().any(|&m| is_assignable(interner, pending, resolve, concrete, m).is_ok()) {
                Outcome::ok()
            } else {
                Outcome::fail(format!(
                    "type does not satisfy any of the {} constraint alternatives",
                    members.len()
                ))
            }
        }
        TypeData::Join(members) => {
            for &m in members.iter() {
                let r = is_assignable(interner, pending, resolve, concrete, m);
                if !r.is_ok() {
                    return r.with_context("join constraint");
                }
            }
            Outcome::ok()
        }
        _ => is_assignable(interner, pending, resolve, concrete, constraint).with_context("constraint"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_resolve(id: TypeId) -> TypeId {
        id
    }

    #[test]
    fn absent_constraint_always_succeeds() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        assert!(validate_constraint(&interner, &pending, &no_resolve, TypeId::STRING, None).is_ok());
    }

    #[test]
    fn union_constraint_accepts_any_member() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        let constraint = interner.union(vec![TypeId::U32, TypeId::STRING]);
        assert!(validate_constraint(&interner, &pending, &no_resolve, TypeId::STRING, Some(constraint)).is_ok());
        assert!(!validate_constraint(&interner, &pending, &no_resolve, TypeId::BOOL, Some(constraint)).is_ok());
    }

    #[test]
    fn join_constraint_requires_every_member() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        let x = interner.intern_name("x");
        let y = interner.intern_name("y");
        let has_x = interner.struct_type(
            vec![tyco_model::shapes::StructField { name: x, ty: TypeId::U32, node: tyco_common::node::NodeId::NONE }],
            false,
        );
        let has_y = interner.struct_type(
            vec![tyco_model::shapes::StructField { name: y, ty: TypeId::U32, node: tyco_common::node::NodeId::NONE }],
            false,
        );
        let constraint = interner.join(vec![has_x, has_y]);
        let candidate = interner.struct_type(
            vec![
                tyco_model::shapes::StructField { name: x, ty: TypeId::U32, node: tyco_common::node::NodeId::NONE },
                tyco_model::shapes::StructField { name: y, ty: TypeId::U32, node: tyco_common::node::NodeId::NONE },
            ],
            false,
        );
        assert!(validate_constraint(&interner, &pending, &no_resolve, candidate, Some(constraint)).is_ok());
        assert!(!validate_constraint(&interner, &pending, &no_resolve, has_x, Some(constraint)).is_ok());
    }

    #[test]
    fn plain_constraint_falls_back_to_assignability() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        assert!(validate_constraint(&interner, &pending, &no_resolve, TypeId::U32, Some(TypeId::ANY)).is_ok());
        assert!(!validate_constraint(&interner, &pending, &no_resolve, TypeId::STRING, Some(TypeId::U32)).is_ok());
    }
}

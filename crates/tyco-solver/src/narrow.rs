//! Control-flow narrowing (spec §4.3.8).

use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;

use crate::assignability::{is_assignable, ResolveReference};
use crate::equality::are_equal;
use crate::pending::PendingChecks;
use crate::simplify::simplify;

/// Narrows `current` toward `target`: `current` itself if they're equal,
/// `target` if it is a subtype of `current`, a re-folded union of the
/// narrowable members if `current` is a union, or `Never` if the two are
/// disjoint.
pub fn narrow(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    current: TypeId,
    target: TypeId,
) -> TypeId {
    if are_equal(interner, current, target).is_ok() {
        return current;
    }

    if let TypeData::Union(members) = interner.get(current) {
        let mut narrowed = Vec::new();
        for &member in members.iter() {
            let n = narrow(interner, pending, resolve, member, target);
            if !matches!(interner.get(n), TypeData::Never) {
                narrowed.push(n);
            }
        }
        return match narrowed.len() {
            0 => TypeId::NEVER,
            1 => narrowed[0],
            _ => simplify(interner, resolve, interner.union(narrowed)),
        };
    }

    if is_assignable(interner, pending, resolve, target, current).is_ok() {
        return target;
    }

    TypeId::NEVER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_resolve(id: TypeId) -> TypeId {
        id
    }

    #[test]
    fn narrowing_to_equal_type_is_a_no_op() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        assert_eq!(
            narrow(&interner, &pending, &no_resolve, TypeId::U32, TypeId::U32),
            TypeId::U32
        );
    }

    #[test]
    fn disjoint_types_narrow_to_never() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        assert_eq!(
            narrow(&interner, &pending, &no_resolve, TypeId::STRING, TypeId::U32),
            TypeId::NEVER
        );
    }

    #[test]
    fn union_narrows_to_the_matching_member() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        let u = interner.union(vec![TypeId::U32, TypeId::STRING]);
        assert_eq!(
            narrow(&interner, &pending, &no_resolve, u, TypeId::STRING),
            TypeId::STRING
        );
    }
}

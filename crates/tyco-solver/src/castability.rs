//! Castability (spec §4.3.7): a more permissive relation than
//! assignability, consulted for the three cast forms `as`, `as?`, `as!`.

use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;

use crate::assignability::{is_assignable, ResolveReference};
use crate::pending::PendingChecks;
use tyco_common::outcome::Outcome;

/// Which spelling of the cast operator is being checked. The safe form
/// (`as`) rejects downcasts that can't be statically verified; the other
/// two accept them, relying on a runtime check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastForm {
    As,
    AsOptional,
    AsForce,
}

impl CastForm {
    fn allows_unverifiable_downcast(self) -> bool {
        !matches!(self, CastForm::As)
    }
}

pub fn can_cast(
    interner: &TypeInterner,
    pending: &PendingChecks,
    resolve: ResolveReference<'_>,
    from: TypeId,
    to: TypeId,
    form: CastForm,
) -> Outcome {
    if is_assignable(interner, pending, resolve, from, to).is_ok() {
        return Outcome::ok();
    }

    let from_data = interner.get(from);
    let to_data = interner.get(to);

    if from_data.kind().is_numeric() && to_data.kind().is_numeric() {
        return Outcome::ok();
    }
    if from_data.kind().is_integer() && matches!(to_data, TypeData::Enum(_)) {
        return Outcome::ok();
    }
    if matches!(from_data, TypeData::Enum(_)) && to_data.kind().is_integer() {
        return Outcome::ok();
    }

    if let TypeData::Nullable(base) = &to_data {
        let r = can_cast(interner, pending, resolve, from, *base, form);
        if r.is_ok() {
            return Outcome::ok();
        }
    }
    if let TypeData::Nullable(base) = &from_data {
        return if form.allows_unverifiable_downcast() {
            can_cast(interner, pending, resolve, *base, to, form)
        } else {
            Outcome::fail("unwrapping a nullable is only sound under `as?` or `as!`")
        };
    }

    if is_class_or_interface(&from_data) && is_class_or_interface(&to_data) {
        return if form.allows_unverifiable_downcast() {
            Outcome::ok()
        } else {
            Outcome::fail("unverifiable class/interface cast requires `as?` or `as!`")
        };
    }

    if matches!(from_data, TypeData::Variant(_)) && matches!(to_data, TypeData::VariantConstructor(_)) {
        return if form.allows_unverifiable_downcast() {
            Outcome::ok()
        } else {
            Outcome::fail("narrowing a variant to a constructor requires `as?` or `as!`")
        };
    }

    if let (TypeData::Array(a), TypeData::Array(b)) = (&from_data, &to_data) {
        return can_cast(interner, pending, resolve, *a, *b, form).with_context("array element");
    }

    Outcome::fail(format!(
        "no cast rule connects {:?} to {:?}",
        from_data.kind(),
        to_data.kind()
    ))
}

fn is_class_or_interface(data: &TypeData) -> bool {
    matches!(data, TypeData::Class(_) | TypeData::Interface(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_resolve(id: TypeId) -> TypeId {
        id
    }

    #[test]
    fn primitive_numeric_casts_are_always_allowed() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        assert!(can_cast(&interner, &pending, &no_resolve, TypeId::F64, TypeId::U8, CastForm::As).is_ok());
    }

    #[test]
    fn nullable_unwrap_requires_unsafe_form() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        let nullable_u32 = interner.nullable(TypeId::U32);
        assert!(!can_cast(&interner, &pending, &no_resolve, nullable_u32, TypeId::U32, CastForm::As).is_ok());
        assert!(can_cast(&interner, &pending, &no_resolve, nullable_u32, TypeId::U32, CastForm::AsForce).is_ok());
    }

    #[test]
    fn downcast_between_unrelated_interfaces_requires_unsafe_form() {
        let interner = TypeInterner::new();
        let pending = PendingChecks::new();
        let foo = interner.intern_name("foo");
        let bar = interner.intern_name("bar");
        let method = |name| tyco_model::shapes::Method {
            names: smallvec::smallvec![name],
            generic_parameters: vec![],
            parameters: vec![],
            return_type: TypeId::VOID,
            is_static: false,
            is_override: false,
            is_local: false,
            node: tyco_common::node::NodeId::NONE,
        };
        let a = interner.interface(vec![method(foo)], vec![]);
        let b = interner.interface(vec![method(bar)], vec![]);
        assert!(!can_cast(&interner, &pending, &no_resolve, a, b, CastForm::As).is_ok());
        assert!(can_cast(&interner, &pending, &no_resolve, a, b, CastForm::AsOptional).is_ok());
    }
}

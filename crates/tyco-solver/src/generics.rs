//! Generic-argument inference for call-site overload resolution (spec
//! §4.3.9).

use rustc_hash::FxHashMap;
use tyco_common::atom::Atom;
use tyco_model::data::TypeData;
use tyco_model::id::TypeId;
use tyco_model::interner::TypeInterner;

use crate::substitution::Substitution;

/// Infers a substitution for `generic_names` by structurally unifying
/// each declared parameter type against the concrete argument type at
/// the same position. Slots never touched by unification default to
/// `Never`, the bottom element, so later arguments can still refine
/// them.
pub fn infer_generics(
    interner: &TypeInterner,
    generic_names: &[Atom],
    parameter_types: &[TypeId],
    argument_types: &[TypeId],
) -> Substitution {
    let mut sigma: Substitution = FxHashMap::default();
    for (&param, &arg) in parameter_types.iter().zip(argument_types.iter()) {
        unify(interner, param, arg, &mut sigma);
    }
    for &name in generic_names {
        sigma.entry(name).or_insert(TypeId::NEVER);
    }
    sigma
}

fn unify(interner: &TypeInterner, param: TypeId, arg: TypeId, sigma: &mut Substitution) {
    if let TypeData::Generic(g) = interner.get(param) {
        match sigma.get(&g.name) {
            None => {
                sigma.insert(g.name, arg);
            }
            Some(&existing) if matches!(interner.get(existing), TypeData::Never) => {
                sigma.insert(g.name, arg);
            }
            // Already inferred to something other than Never from an
            // earlier argument: keep it, later positions only refine
            // Never slots per spec.
            Some(_) => {}
        }
        return;
    }

    match (interner.get(param), interner.get(arg)) {
        (TypeData::Array(p), TypeData::Array(a)) => unify(interner, p, a, sigma),
        (TypeData::Nullable(p), TypeData::Nullable(a)) => unify(interner, p, a, sigma),
        (TypeData::Tuple(p), TypeData::Tuple(a)) => {
            for (&pe, &ae) in p.iter().zip(a.iter()) {
                unify(interner, pe, ae, sigma);
            }
        }
        (TypeData::Function(p), TypeData::Function(a)) => {
            for (pp, ap) in p.parameters.iter().zip(a.parameters.iter()) {
                unify(interner, pp.ty, ap.ty, sigma);
            }
            unify(interner, p.return_type, a.return_type, sigma);
        }
        (TypeData::Reference(p), TypeData::Reference(a)) if p.declaration == a.declaration => {
            for (&pa, &aa) in p.generic_args.iter().zip(a.generic_args.iter()) {
                unify(interner, pa, aa, sigma);
            }
        }
        (TypeData::Reference(p), TypeData::VariantConstructor(vc))
            if vc.variant_declaration == Some(p.declaration) =>
        {
            for (&pa, &aa) in p.generic_args.iter().zip(vc.generic_args.iter()) {
                unify(interner, pa, aa, sigma);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_generic_from_array_argument() {
        let interner = TypeInterner::new();
        let t = interner.intern_name("T");
        let generic_t = interner.generic(t, None, tyco_common::node::NodeId::NONE);
        let param = interner.array(generic_t);
        let arg = interner.array(TypeId::U32);
        let sigma = infer_generics(&interner, &[t], &[param], &[arg]);
        assert_eq!(sigma.get(&t), Some(&TypeId::U32));
    }

    #[test]
    fn unfilled_generic_defaults_to_never() {
        let interner = TypeInterner::new();
        let t = interner.intern_name("T");
        let sigma = infer_generics(&interner, &[t], &[], &[]);
        assert_eq!(sigma.get(&t), Some(&TypeId::NEVER));
    }

    #[test]
    fn later_argument_does_not_override_an_already_inferred_slot() {
        let interner = TypeInterner::new();
        let t = interner.intern_name("T");
        let generic_t = interner.generic(t, None, tyco_common::node::NodeId::NONE);
        let sigma = infer_generics(
            &interner,
            &[t],
            &[generic_t, generic_t],
            &[TypeId::U32, TypeId::STRING],
        );
        assert_eq!(sigma.get(&t), Some(&TypeId::U32));
    }
}

//! The numeric-promotion table used by assignability rule §4.3.2 #6.

use tyco_model::id::TypeId;
use tyco_model::kind::TypeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericInfo {
    pub kind: TypeKind,
    pub bits: u32,
    pub signed: bool,
    pub float: bool,
}

const fn info(kind: TypeKind, bits: u32, signed: bool, float: bool) -> NumericInfo {
    NumericInfo { kind, bits, signed, float }
}

/// Looks up width/signedness for a numeric `TypeId`. Returns `None` for
/// anything that isn't one of the ten numeric primitives.
pub fn numeric_info(id: TypeId) -> Option<NumericInfo> {
    Some(match id {
        TypeId::U8 => info(TypeKind::U8, 8, false, false),
        TypeId::U16 => info(TypeKind::U16, 16, false, false),
        TypeId::U32 => info(TypeKind::U32, 32, false, false),
        TypeId::U64 => info(TypeKind::U64, 64, false, false),
        TypeId::I8 => info(TypeKind::I8, 8, true, false),
        TypeId::I16 => info(TypeKind::I16, 16, true, false),
        TypeId::I32 => info(TypeKind::I32, 32, true, false),
        TypeId::I64 => info(TypeKind::I64, 64, true, false),
        TypeId::F32 => info(TypeKind::F32, 32, true, true),
        TypeId::F64 => info(TypeKind::F64, 64, true, true),
        _ => return None,
    })
}

/// Is `from` promotable to `to` under the numeric-promotion table (spec
/// §4.3.2, the table following rule #6)?
///
/// | from \ to | float wider | float narrower | int same-sign wider | int unsigned->signed wider | signed->unsigned | int->float | float->int |
/// |---|---|---|---|---|---|---|---|
/// | allowed | yes | no | yes | yes (bits strictly less) | no | yes | no |
pub fn numeric_promotable(from: TypeId, to: TypeId) -> bool {
    let (Some(f), Some(t)) = (numeric_info(from), numeric_info(to)) else {
        return false;
    };
    if f.kind == t.kind {
        return true;
    }
    match (f.float, t.float) {
        (true, true) => t.bits >= f.bits,
        (true, false) => false,
        (false, true) => true,
        (false, false) => {
            if f.signed == t.signed {
                t.bits > f.bits
            } else if !f.signed && t.signed {
                t.bits > f.bits
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_to_wider_signed_is_allowed() {
        assert!(numeric_promotable(TypeId::U32, TypeId::I64));
    }

    #[test]
    fn signed_to_narrower_unsigned_is_rejected() {
        assert!(!numeric_promotable(TypeId::I32, TypeId::U32));
    }

    #[test]
    fn int_to_float_is_allowed() {
        assert!(numeric_promotable(TypeId::I32, TypeId::F64));
    }

    #[test]
    fn float_to_int_is_rejected() {
        assert!(!numeric_promotable(TypeId::F32, TypeId::I32));
    }

    #[test]
    fn float_narrowing_is_rejected() {
        assert!(!numeric_promotable(TypeId::F64, TypeId::F32));
    }

    #[test]
    fn same_kind_is_always_allowed() {
        assert!(numeric_promotable(TypeId::U8, TypeId::U8));
    }

    #[test]
    fn unsigned_to_same_width_signed_is_rejected() {
        assert!(!numeric_promotable(TypeId::U32, TypeId::I32));
    }
}

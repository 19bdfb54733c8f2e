//! Identity for interned type descriptions.

use serde::Serialize;

/// A handle into a `TypeInterner`'s arena.
///
/// Distinct `TypeId`s may describe structurally equal types: only the
/// primitive singletons below are guaranteed deduplicated by id. Use
/// `are_equal` (tyco-solver) to compare types structurally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NONE: TypeId = TypeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

macro_rules! well_known {
    ($($name:ident = $idx:expr),* $(,)?) => {
        impl TypeId {
            $(pub const $name: TypeId = TypeId($idx);)*
        }
    };
}

// Fixed arena slots for the primitive singletons, pre-registered by
// `TypeInterner::new()`. Composite and nominal kinds are allocated fresh
// per factory call starting after the last of these.
well_known! {
    U8 = 0, U16 = 1, U32 = 2, U64 = 3,
    I8 = 4, I16 = 5, I32 = 6, I64 = 7,
    F32 = 8, F64 = 9,
    BOOL = 10, VOID = 11, STRING = 12, NULL = 13,
    NEVER = 14, ANY = 15, UNSET = 16,
}

/// Count of well-known primitive slots; the interner's arena starts
/// allocating fresh ids from this index.
pub const WELL_KNOWN_COUNT: u32 = 17;

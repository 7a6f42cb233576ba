//=========================================================================
// Payload Signatures
//=========================================================================
//
// Runtime type descriptor for listener payloads.
//
// Every payload is a tuple of arity 0..=3. Its signature is the ordered
// list of parameter TypeIds, compared explicitly on subscribe, unsubscribe
// and publish.
//
//   ()          → []
//   (A,)        → [A]
//   (A, B)      → [A, B]
//   (A, B, C)   → [A, B, C]
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, TypeId};
use std::fmt;

use smallvec::SmallVec;

//=== Param Type ==========================================================

/// A single positional parameter in a [`Signature`].
///
/// Equality is decided by `TypeId` only; the name is kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct ParamType {
    id: TypeId,
    name: &'static str,
}

impl ParamType {
    /// Describes the type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Full type name as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParamType {}

//=== Signature ===========================================================

/// Arity and ordered parameter types of a listener payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: SmallVec<[ParamType; 3]>,
}

impl Signature {
    /// Signature of the payload tuple `P`.
    pub fn of<P: Payload>() -> Self {
        P::signature()
    }

    fn from_params(params: &[ParamType]) -> Self {
        Self {
            params: SmallVec::from_slice(params),
        }
    }

    /// Number of positional arguments (0..=3).
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter descriptors in declaration order.
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fn(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "&{}", param.name)?;
        }
        f.write_str(")")
    }
}

//=== Payload Trait =======================================================

/// Payload tuples accepted by the dispatcher.
///
/// Implemented for `()`, `(A,)`, `(A, B)` and `(A, B, C)` where every
/// element is `'static`. Sealed; higher arities are not supported.
pub trait Payload: sealed::Sealed + 'static {
    /// Explicit type descriptor for this payload shape.
    fn signature() -> Signature;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_payload {
    ($($param:ident),*) => {
        impl<$($param: 'static),*> sealed::Sealed for ($($param,)*) {}

        impl<$($param: 'static),*> Payload for ($($param,)*) {
            fn signature() -> Signature {
                Signature::from_params(&[$(ParamType::of::<$param>()),*])
            }
        }
    };
}

impl_payload!();
impl_payload!(A);
impl_payload!(A, B);
impl_payload!(A, B, C);

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_follows_tuple_length() {
        assert_eq!(Signature::of::<()>().arity(), 0);
        assert_eq!(Signature::of::<(i32,)>().arity(), 1);
        assert_eq!(Signature::of::<(i32, f32)>().arity(), 2);
        assert_eq!(Signature::of::<(i32, f32, String)>().arity(), 3);
    }

    #[test]
    fn same_types_compare_equal() {
        assert_eq!(Signature::of::<(i32, String)>(), Signature::of::<(i32, String)>());
    }

    #[test]
    fn order_and_types_matter() {
        assert_ne!(Signature::of::<(i32,)>(), Signature::of::<(String,)>());
        assert_ne!(Signature::of::<(i32, f32)>(), Signature::of::<(f32, i32)>());
        assert_ne!(Signature::of::<()>(), Signature::of::<((),)>());
    }

    #[test]
    fn display_lists_parameter_names() {
        assert_eq!(Signature::of::<()>().to_string(), "Fn()");
        assert_eq!(Signature::of::<(i32, bool)>().to_string(), "Fn(&i32, &bool)");
    }
}

use time::OffsetDateTime;

use super::ScalarKind;
use crate::codec::{GeoPoint, Scalar};

/// Field types that map to a single scalar edge.
///
/// Implemented for the integer, float, string, boolean, byte, timestamp and
/// geo types, and for `Option<T>` of any of them (a null reference is the
/// zero value and is never written).
pub trait ScalarField: Sized + 'static {
    /// Kind reported to the classifier.
    const KIND: ScalarKind;

    /// Current value, `None` when the field holds a null reference.
    fn to_scalar(&self) -> Option<Scalar>;

    /// Converts a decoded value into the field type; `None` on kind
    /// mismatch or overflow.
    fn from_scalar(scalar: Scalar) -> Option<Self>;

    /// Value assigned for a JSON `null` collection element, if the type can
    /// represent one.
    fn from_null() -> Option<Self> {
        None
    }
}

macro_rules! signed_scalar {
    ($($ty:ty),*) => {$(
        impl ScalarField for $ty {
            const KIND: ScalarKind = ScalarKind::Int;

            fn to_scalar(&self) -> Option<Scalar> {
                Some(Scalar::Int(*self as i64))
            }

            fn from_scalar(scalar: Scalar) -> Option<Self> {
                match scalar {
                    Scalar::Int(v) => <$ty>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($ty:ty),*) => {$(
        impl ScalarField for $ty {
            const KIND: ScalarKind = ScalarKind::Uint;

            fn to_scalar(&self) -> Option<Scalar> {
                Some(Scalar::Uint(*self as u64))
            }

            fn from_scalar(scalar: Scalar) -> Option<Self> {
                match scalar {
                    Scalar::Uint(v) => <$ty>::try_from(v).ok(),
                    Scalar::Int(v) => <$ty>::try_from(v).ok(),
                    // Unsigned values are stored as doubles.
                    Scalar::Float(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => {
                        <$ty>::try_from(v as u64).ok()
                    }
                    _ => None,
                }
            }
        }
    )*};
}

signed_scalar!(i8, i16, i32, i64, isize);
unsigned_scalar!(u8, u16, u32, u64, usize);

impl ScalarField for f64 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Float(*self))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl ScalarField for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Float(f64::from(*self)))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl ScalarField for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::String(self.clone()))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }
}

impl ScalarField for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl ScalarField for Vec<u8> {
    const KIND: ScalarKind = ScalarKind::Bytes;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bytes(self.clone()))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl ScalarField for OffsetDateTime {
    const KIND: ScalarKind = ScalarKind::DateTime;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::DateTime(*self))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::DateTime(v) => Some(v),
            _ => None,
        }
    }
}

impl ScalarField for GeoPoint {
    const KIND: ScalarKind = ScalarKind::Geo;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Geo(self.clone()))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Geo(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: ScalarField> ScalarField for Option<T> {
    const KIND: ScalarKind = T::KIND;

    fn to_scalar(&self) -> Option<Scalar> {
        self.as_ref().and_then(T::to_scalar)
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        T::from_scalar(scalar).map(Some)
    }

    fn from_null() -> Option<Self> {
        Some(None)
    }
}

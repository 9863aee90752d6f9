use num_traits::{AsPrimitive, Float};

/// Runtime tag for the element type of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DType {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl DType {
    /// Whether the type is one of the floating precisions resampling runs in.
    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// The floating precision a grid of this type is resampled in.
    ///
    /// `f32` stays `f32`; everything else is promoted to `f64`.
    pub fn promoted(self) -> DType {
        match self {
            DType::F32 => DType::F32,
            _ => DType::F64,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F32 => "f32",
            DType::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// An element type that can be stored in a grid.
pub trait GridDtype: Copy + Send + Sync + std::fmt::Debug + AsPrimitive<f64> + 'static {
    /// The runtime tag of this type.
    const DTYPE: DType;
}

/// A floating element type usable as the working precision of a resampling.
pub trait FloatDtype: GridDtype + Float {
    /// Convert from `f64`, rounding to the nearest representable value.
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_grid_dtype {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl GridDtype for $t {
                const DTYPE: DType = DType::$tag;
            }
        )*
    };
}

impl_grid_dtype!(u8 => U8, u16 => U16, i32 => I32, i64 => I64, f32 => F32, f64 => F64);

impl FloatDtype for f32 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl FloatDtype for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_rules() {
        assert_eq!(DType::F32.promoted(), DType::F32);
        assert_eq!(DType::F64.promoted(), DType::F64);
        assert_eq!(DType::U8.promoted(), DType::F64);
        assert_eq!(DType::I64.promoted(), DType::F64);
        assert!(!DType::U16.is_float());
    }

    #[test]
    fn float_roundtrip() {
        assert_eq!(<f32 as FloatDtype>::from_f64(0.5), 0.5f32);
        assert_eq!(<f64 as FloatDtype>::from_f64(1.25), 1.25);
        assert_eq!(<u8 as GridDtype>::DTYPE, DType::U8);
        assert_eq!(DType::I32.to_string(), "i32");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_lowercase() {
        let s = serde_json::to_string(&DType::F32).unwrap();
        assert_eq!(s, "\"f32\"");
    }
}

//! Scalar and bulk value shapes accepted and produced by the decoder.

/// Packed input: a single container, a flat array of them, or a nested
/// (possibly jagged) array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PackedValue {
    Scalar(u64),
    Flat(Vec<u64>),
    Nested(Vec<PackedValue>),
}

/// Decoded output with the same shape as the [PackedValue] it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum DecodedValue {
    Scalar(i128),
    Flat(Vec<i128>),
    Nested(Vec<DecodedValue>),
}

impl PackedValue {
    /// Applies `f` to every container, preserving the shape. Stops at the first error.
    pub(crate) fn try_map<F, E>(&self, f: &F) -> Result<DecodedValue, E>
    where
        F: Fn(u64) -> Result<i128, E>,
    {
        match self {
            PackedValue::Scalar(packed) => f(*packed).map(DecodedValue::Scalar),
            PackedValue::Flat(values) => values
                .iter()
                .map(|&packed| f(packed))
                .collect::<Result<Vec<_>, E>>()
                .map(DecodedValue::Flat),
            PackedValue::Nested(values) => values
                .iter()
                .map(|value| value.try_map(f))
                .collect::<Result<Vec<_>, E>>()
                .map(DecodedValue::Nested),
        }
    }

    /// Total number of containers at every nesting level.
    pub fn count(&self) -> usize {
        match self {
            PackedValue::Scalar(_) => 1,
            PackedValue::Flat(values) => values.len(),
            PackedValue::Nested(values) => values.iter().map(PackedValue::count).sum(),
        }
    }
}

impl DecodedValue {
    pub fn as_scalar(&self) -> Option<i128> {
        match self {
            DecodedValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_flat(&self) -> Option<&[i128]> {
        match self {
            DecodedValue::Flat(values) => Some(values),
            _ => None,
        }
    }

    /// All decoded values in depth-first order, discarding the shape.
    pub fn flatten(&self) -> Vec<i128> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<i128>) {
        match self {
            DecodedValue::Scalar(value) => out.push(*value),
            DecodedValue::Flat(values) => out.extend_from_slice(values),
            DecodedValue::Nested(values) => {
                for value in values {
                    value.flatten_into(out);
                }
            }
        }
    }
}

impl From<u64> for PackedValue {
    fn from(value: u64) -> Self {
        PackedValue::Scalar(value)
    }
}

impl From<Vec<u64>> for PackedValue {
    fn from(values: Vec<u64>) -> Self {
        PackedValue::Flat(values)
    }
}

impl From<&[u64]> for PackedValue {
    fn from(values: &[u64]) -> Self {
        PackedValue::Flat(values.to_vec())
    }
}

impl From<Vec<Vec<u64>>> for PackedValue {
    fn from(rows: Vec<Vec<u64>>) -> Self {
        PackedValue::Nested(rows.into_iter().map(PackedValue::Flat).collect())
    }
}

impl From<Vec<PackedValue>> for PackedValue {
    fn from(values: Vec<PackedValue>) -> Self {
        PackedValue::Nested(values)
    }
}

/// Primitive integers that can be stored as a packed container.
///
/// Signed integers contribute their two's-complement bit pattern, so `-1i32`
/// is the container with all 64 bits set.
pub trait PackedInt: Copy {
    fn to_packed(self) -> u64;
}

macro_rules! impl_packed_int {
    ($($t:ty => $via:ty),* $(,)?) => {
        $(
            impl PackedInt for $t {
                #[inline]
                fn to_packed(self) -> u64 {
                    self as $via as u64
                }
            }
        )*
    };
}

impl_packed_int!(
    u8 => u64,
    u16 => u64,
    u32 => u64,
    u64 => u64,
    usize => u64,
    i8 => i64,
    i16 => i64,
    i32 => i64,
    i64 => i64,
    isize => i64,
);

//! Definition of a single named bit field inside a packed 64-bit value.

use std::fmt;

use crate::{
    bits::{self, CONTAINER_BITS},
    errors::{DecodeError, SchemaError},
};

/// One named, contiguous run of bits: offset, width and signedness plus the
/// mask and value range derived from them.
///
/// A `FieldSpec` never changes after construction; all derived values are
/// computed once in [FieldSpec::new].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldSpec {
    name: String,
    offset: u32,
    width: u32,
    signed: bool,
    mask: u64,
    min_val: i128,
    max_val: i128,
}

impl FieldSpec {
    /// Builds a field at `offset`. The sign of `width` selects signedness:
    /// `-16` is a 16-bit two's-complement field, `16` an unsigned one.
    pub fn new(name: impl Into<String>, offset: i64, width: i64) -> Result<Self, SchemaError> {
        let name = name.into();
        let invalid = |reason: String| SchemaError::InvalidField {
            name: name.clone(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if width == 0 {
            return Err(invalid("width must be non-zero".to_string()));
        }
        if offset < 0 {
            return Err(invalid(format!("offset must be non-negative, got {offset}")));
        }

        let signed = width < 0;
        let magnitude = width.unsigned_abs();
        if magnitude > CONTAINER_BITS as u64 {
            return Err(invalid(format!(
                "width {magnitude} exceeds the {CONTAINER_BITS}-bit container"
            )));
        }
        if offset as u64 + magnitude > CONTAINER_BITS as u64 {
            return Err(invalid(format!(
                "bits {offset}..{} exceed the {CONTAINER_BITS}-bit container",
                offset as u64 + magnitude
            )));
        }

        let offset = offset as u32;
        let width = magnitude as u32;
        let (min_val, max_val) = bits::bounds(width, signed);

        Ok(Self {
            name,
            offset,
            width,
            signed,
            mask: bits::field_mask(offset, width),
            min_val,
            max_val,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the field's least significant bit.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of bits, always in `1..=64`.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Bit pattern isolating this field inside the packed value.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn min_val(&self) -> i128 {
        self.min_val
    }

    pub fn max_val(&self) -> i128 {
        self.max_val
    }

    /// One past the most significant bit of the field.
    pub fn end(&self) -> u32 {
        self.offset + self.width
    }

    /// Returns true when `value` lies in `[min_val, max_val]`.
    pub fn contains(&self, value: i128) -> bool {
        (self.min_val..=self.max_val).contains(&value)
    }

    /// Returns true when both fields claim at least one common bit.
    pub fn overlaps(&self, other: &FieldSpec) -> bool {
        self.mask & other.mask != 0
    }

    /// Extracts this field from `packed`, sign-extending signed fields.
    pub fn extract(&self, packed: u64) -> i128 {
        let raw = bits::read_bits(packed, self.mask, self.offset);

        if self.signed {
            bits::sign_extend(raw, self.width) as i128
        } else {
            raw as i128
        }
    }

    /// Returns `value` unchanged if it is in range, otherwise a [DecodeError::FieldRange].
    pub fn check_range(&self, value: i128) -> Result<i128, DecodeError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(DecodeError::FieldRange {
                field: self.name.clone(),
                value,
                min: self.min_val,
                max: self.max_val,
            })
        }
    }

    /// Writes `value` into this field's bits of `packed`, leaving all other bits untouched.
    pub fn insert(&self, packed: u64, value: i128) -> Result<u64, DecodeError> {
        let value = self.check_range(value)?;
        // Truncation keeps the two's-complement pattern of negative values.
        let raw = value as u64;

        Ok(bits::write_bits(packed, self.mask, self.offset, raw))
    }
}

/// Formats the field as an explicit-offset clause, e.g. `x:32:-16`.
impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { "-" } else { "" };
        write!(f, "{}:{}:{}{}", self.name, self.offset, sign, self.width)
    }
}

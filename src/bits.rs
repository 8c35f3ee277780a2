//! Low-level mask and sign arithmetic on 64-bit containers.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit of the packed value.

/// Number of bits in a packed container.
pub const CONTAINER_BITS: u32 = u64::BITS;

/// Returns a mask with the low `width` bits set. `width` must be in `1..=64`.
pub fn low_mask(width: u32) -> u64 {
    if width >= CONTAINER_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Returns a mask with `width` bits set starting at bit `offset`.
pub fn field_mask(offset: u32, width: u32) -> u64 {
    low_mask(width) << offset
}

/// Isolates the bits selected by `mask` and shifts them down to bit 0.
pub fn read_bits(packed: u64, mask: u64, offset: u32) -> u64 {
    (packed & mask) >> offset
}

/// Replaces the bits selected by `mask` with the low bits of `raw` placed at `offset`.
pub fn write_bits(packed: u64, mask: u64, offset: u32, raw: u64) -> u64 {
    (packed & !mask) | ((raw << offset) & mask)
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = CONTAINER_BITS - bits;
    ((value << shift) as i64) >> shift
}

/// Legal value range `(min, max)` of a field of `width` bits.
pub fn bounds(width: u32, signed: bool) -> (i128, i128) {
    if signed {
        let half = 1i128 << (width - 1);
        (-half, half - 1)
    } else {
        (0, (1i128 << width) - 1)
    }
}

//! Multiplicative (golden-ratio) hashing of integer keys onto buckets.
//!
//! `index = floor(capacity * frac(key * A))` with `A = 1/φ`. The fractional
//! part is computed in 64-bit fixed point: multiplying the key's bit
//! pattern by `floor(2^64 * A)` with wrapping arithmetic leaves exactly the
//! low 64 fractional bits of `key * A`. For negative keys the two's
//! complement product is the floor-based fractional part `x - floor(x)`,
//! so every `i64` lands in range with no sign special case.

/// Reciprocal of the golden ratio, `A` in the formula above.
pub const GOLDEN_RATIO_RECIPROCAL: f64 = 0.618_033_988_749_894_8;

/// `floor(2^64 / φ)`.
const FIXED_POINT_A: u64 = 0x9E37_79B9_7F4A_7C15;

/// Map `key` to a bucket in `[0, capacity)`. A zero capacity is treated as 1.
#[inline]
pub fn bucket_index(key: i64, capacity: usize) -> usize {
    let capacity = capacity.max(1);
    let frac = (key as u64).wrapping_mul(FIXED_POINT_A);
    // (frac / 2^64) * capacity, floored.
    let scaled = ((u128::from(frac) * capacity as u128) >> 64) as usize;
    if capacity.is_power_of_two() {
        reduce_mask(scaled, capacity)
    } else {
        reduce_mod(scaled, capacity)
    }
}

#[inline]
fn reduce_mask(h: usize, capacity: usize) -> usize {
    h & (capacity - 1)
}

#[inline]
fn reduce_mod(h: usize, capacity: usize) -> usize {
    h % capacity
}

//! Field-element conversions for signed 64-bit integers.

use ark_ff::PrimeField;

/// Maps an `i64` into the field. Negative values are taken modulo the
/// field order, so `-1` maps to `p - 1`.
pub fn i64_to_field<F: PrimeField>(v: i64) -> F {
    if v >= 0 {
        F::from(v as u64)
    } else {
        -F::from(v.unsigned_abs())
    }
}

//! Depth quantization for the draw key's 16-bit depth field
//!
//! The bit pattern of a non-negative IEEE-754 float grows monotonically with
//! its value, so the high 16 bits of `f32::to_bits` are a coarse, ordered
//! depth bucket (sign, exponent and 7 mantissa bits). This does not hold for
//! negative floats, so anything that is not a non-negative number maps to
//! bucket 0.

use crate::key::Translucency;

/// Quantize a camera-space distance into an ascending 16-bit bucket.
#[inline]
pub fn quantize(depth: f32) -> u16 {
    // `-0.0 >= 0.0` holds, so test the sign bit too.
    if depth >= 0.0 && depth.is_sign_positive() {
        (depth.to_bits() >> 16) as u16
    } else {
        0
    }
}

/// Depth bucket to store in a key.
///
/// Opaque draws go front-to-back to maximise early depth rejection.
/// Blended draws go back-to-front so they composite correctly.
#[inline]
pub fn sort_depth(depth: f32, translucency: Translucency) -> u16 {
    let bucket = quantize(depth);
    if translucency.is_opaque() {
        bucket
    } else {
        u16::MAX - bucket
    }
}

//! 80-bit IEEE 754 extended precision, big-endian.
//!
//! Layout: 1 sign bit, 15-bit exponent (bias 16383), 64-bit mantissa with
//! an explicit integer bit. AIFF stores the `COMM` sample rate this way.

use crate::error::{Result, SynthError};

const EXTENDED_BIAS: i32 = 16383;
const DOUBLE_BIAS: i32 = 1023;
const FRACTION_BITS: u32 = 52;
const FRACTION_MASK: u64 = (1 << FRACTION_BITS) - 1;

/// Encode `value` as 10 big-endian bytes of 80-bit extended precision.
///
/// Zero (of either sign) encodes as ten zero bytes. Every finite `f64`
/// is exactly representable, so no rounding takes place.
pub fn encode_extended(value: f64) -> Result<[u8; 10]> {
    if !value.is_finite() {
        return Err(SynthError::NonFiniteValue(value));
    }
    if value == 0.0 {
        return Ok([0; 10]);
    }

    let sign: u16 = if value < 0.0 { 1 << 15 } else { 0 };
    let bits = value.abs().to_bits();
    let raw_exponent = (bits >> FRACTION_BITS) as i32;
    let fraction = bits & FRACTION_MASK;

    // floor(log2(|value|)) and the mantissa scaled so bit 63 is the leading one.
    let (exponent, mantissa) = if raw_exponent == 0 {
        // Subnormal double: value = fraction * 2^-1074.
        let shift = fraction.leading_zeros();
        (63 - shift as i32 - 1074, fraction << shift)
    } else {
        (
            raw_exponent - DOUBLE_BIAS,
            (1 << 63) | (fraction << (63 - FRACTION_BITS)),
        )
    };

    let biased = (exponent + EXTENDED_BIAS) as u16;
    let mut out = [0u8; 10];
    out[..2].copy_from_slice(&(sign | biased).to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    Ok(out)
}

/// Decode 10 big-endian extended-precision bytes back to `f64`.
///
/// Values outside the `f64` range saturate to infinity or zero; the
/// infinity/NaN exponent pattern decodes to infinity or NaN.
pub fn decode_extended(bytes: &[u8; 10]) -> f64 {
    let head = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mut mantissa_bytes = [0u8; 8];
    mantissa_bytes.copy_from_slice(&bytes[2..]);
    let mantissa = u64::from_be_bytes(mantissa_bytes);

    let negative = head & 0x8000 != 0;
    let exponent = i32::from(head & 0x7fff);

    let magnitude = if exponent == 0 && mantissa == 0 {
        0.0
    } else if exponent == 0x7fff {
        if mantissa << 1 == 0 { f64::INFINITY } else { f64::NAN }
    } else {
        // Split the scaling so huge exponents do not overflow powi early.
        let scale = exponent - EXTENDED_BIAS - 63;
        (mantissa as f64) * 2f64.powi(scale / 2) * 2f64.powi(scale - scale / 2)
    };

    if negative { -magnitude } else { magnitude }
}

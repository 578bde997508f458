//! `FLOAT32` element kernel.

use super::ElementKernel;
use std::fmt::Write;

const SIZE: usize = std::mem::size_of::<f32>();

pub(crate) struct Float32Kernel;

fn elements(bytes: &[u8]) -> impl Iterator<Item = f32> + '_ {
    bytes
        .chunks_exact(SIZE)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
}

/// Integral values print as integers; everything else as `%.6e`.
fn format_element(value: f32, out: &mut String) {
    let truncated = value as u64;
    if truncated as f32 == value {
        let _ = write!(out, "{}", truncated);
    } else {
        format_scientific(value as f64, out);
    }
}

/// C-style `%.6e`: exponent always signed and at least two digits.
fn format_scientific(value: f64, out: &mut String) {
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                let _ = write!(out, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs());
            }
            Err(_) => out.push_str(&formatted),
        },
        // inf / NaN
        None => out.push_str(&formatted),
    }
}

impl ElementKernel for Float32Kernel {
    fn size(&self) -> usize {
        SIZE
    }

    fn parse_into(&self, token: &str, dst: &mut [u8]) -> bool {
        match token.parse::<f32>() {
            Ok(value) if value.is_finite() => {
                dst.copy_from_slice(&value.to_ne_bytes());
                true
            }
            _ => false,
        }
    }

    fn render_into(&self, src: &[u8], out: &mut String) {
        for (i, value) in elements(src).enumerate() {
            if i > 0 {
                out.push(',');
            }
            format_element(value, out);
        }
    }

    fn distance_cos(&self, a: &[u8], b: &[u8]) -> f32 {
        // Accumulate in f64: squares of large f32 elements overflow f32
        let mut dot = 0.0f64;
        let mut norm_a = 0.0f64;
        let mut norm_b = 0.0f64;
        for (x, y) in elements(a).zip(elements(b)) {
            let (x, y) = (f64::from(x), f64::from(y));
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }
        (1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
    }

    fn to_f32(&self, src: &[u8]) -> Vec<f32> {
        elements(src).collect()
    }

    fn from_f32(&self, values: &[f32], dst: &mut [u8]) {
        for (chunk, value) in dst.chunks_exact_mut(SIZE).zip(values) {
            chunk.copy_from_slice(&value.to_ne_bytes());
        }
    }
}

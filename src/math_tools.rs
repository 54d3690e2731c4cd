//! Numerical helpers: a complex reciprocal that survives extreme magnitudes,
//! a finite-difference gradient over an arbitrary sample grid, a phase
//! unwrapper and a scan for non-finite samples.

use crate::error::{OscillatorError, Result};
use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;
use num_traits::Float;

/// `1 / z` computed on a copy of `z` scaled by its largest component.
///
/// `Complex64::inv` divides by `|z|²`, which underflows below about 1e-154
/// and overflows above about 1e154. Non-finite or zero inputs fall through to
/// the plain inverse so that singular samples stay non-finite.
pub fn reciprocal(z: Complex64) -> Complex64 {
    let scale = z.re.abs().max(z.im.abs());
    if scale == 0.0 || !scale.is_finite() {
        return z.inv();
    }
    (z / scale).inv() / scale
}

/// Differentiates `y` with respect to the sample positions `x`.
///
/// Interior points use the centered difference for (possibly) uneven spacing,
/// which is what numpy's `gradient` does; the two end points use one-sided
/// first-order differences.
///
/// # Arguments
/// - `y`: sampled function values.
/// - `x`: sample positions, same length as `y`, strictly monotonic.
///
/// # Returns
/// The derivative estimate at every sample, or `SizeMismatch` when the lengths
/// differ and `InvalidParameter` when fewer than two samples are given.
pub fn numerical_gradient<T: Float>(y: ArrayView1<T>, x: ArrayView1<T>) -> Result<Array1<T>> {
    if y.len() != x.len() {
        return Err(OscillatorError::SizeMismatch {
            expected: x.len(),
            found: y.len(),
        });
    }
    let n = y.len();
    if n < 2 {
        return Err(OscillatorError::InvalidParameter(format!(
            "gradient needs at least 2 samples, got {n}"
        )));
    }

    let mut out = Array1::from_elem(n, T::zero());
    out[0] = (y[1] - y[0]) / (x[1] - x[0]);
    out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);

    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        let a = -hd / (hs * (hd + hs));
        let b = (hd - hs) / (hd * hs);
        let c = hs / (hd * (hd + hs));
        out[i] = a * y[i - 1] + b * y[i] + c * y[i + 1];
    }
    Ok(out)
}

/// Removes jumps larger than half a `period` between neighbouring samples.
///
/// The plain-arctangent phase wraps with a period of 180 degrees, so pass
/// `180.0` for phase curves in degrees. Non-finite samples are passed through
/// as they are and the next finite sample is unwrapped against the last
/// finite one.
pub fn unwrap_phase(x: ArrayView1<f64>, period: f64) -> Array1<f64> {
    let mut unwrapped = x.to_owned();
    // (last finite raw value, its unwrapped value)
    let mut prev: Option<(f64, f64)> = None;
    for (i, &val) in x.iter().enumerate() {
        if !val.is_finite() {
            continue;
        }
        let Some((prev_val, prev_unwrapped)) = prev else {
            prev = Some((val, val));
            continue;
        };
        let mut diff = val - prev_val;
        if diff > period / 2.0 {
            diff -= period;
        } else if diff < -period / 2.0 {
            diff += period;
        }
        unwrapped[i] = prev_unwrapped + diff;
        prev = Some((val, unwrapped[i]));
    }
    unwrapped
}

/// Indices of every sample for which `is_finite` is false.
pub fn non_finite_indices<I, F>(values: I, is_finite: F) -> Vec<usize>
where
    I: IntoIterator,
    F: Fn(I::Item) -> bool,
{
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| if is_finite(v) { None } else { Some(i) })
        .collect()
}

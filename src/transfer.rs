//! Result containers of an oscillator evaluation: the per-sample 2×2 transfer
//! matrix, the transmission bundle and the derived phase quantities.

use crate::error::{OscillatorError, Result};
use crate::math_tools::{non_finite_indices, unwrap_phase};
use ndarray::{s, Array1, Array3, ArrayView1};
use num_complex::Complex64;

/// Array of 2×2 complex matrices, one per frequency sample.
///
/// Stored as shape `(2, 2, n_samples)` so that `entry(row, col)` is a
/// contiguous curve over the sweep, matching the `[[M11, M12], [M21, M22]]`
/// layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferMatrix {
    data: Array3<Complex64>,
}

impl TransferMatrix {
    /// Assembles the matrix from its four entry curves, which must share one length.
    pub fn from_entries(
        m11: Array1<Complex64>,
        m12: Array1<Complex64>,
        m21: Array1<Complex64>,
        m22: Array1<Complex64>,
    ) -> Result<Self> {
        let n = m11.len();
        for entry in [&m12, &m21, &m22] {
            if entry.len() != n {
                return Err(OscillatorError::SizeMismatch {
                    expected: n,
                    found: entry.len(),
                });
            }
        }
        let mut data = Array3::from_elem((2, 2, n), Complex64::new(0.0, 0.0));
        data.slice_mut(s![0, 0, ..]).assign(&m11);
        data.slice_mut(s![0, 1, ..]).assign(&m12);
        data.slice_mut(s![1, 0, ..]).assign(&m21);
        data.slice_mut(s![1, 1, ..]).assign(&m22);
        Ok(TransferMatrix { data })
    }

    /// The curve of entry `(row, col)` across all samples (zero-based indices).
    ///
    /// # Panics
    /// When `row` or `col` is larger than 1.
    pub fn entry(&self, row: usize, col: usize) -> ArrayView1<'_, Complex64> {
        self.data.slice(s![row, col, ..])
    }

    /// The full 2×2 matrix at one sample.
    pub fn at(&self, sample: usize) -> [[Complex64; 2]; 2] {
        [
            [self.data[[0, 0, sample]], self.data[[0, 1, sample]]],
            [self.data[[1, 0, sample]], self.data[[1, 1, sample]]],
        ]
    }

    pub fn len(&self) -> usize {
        self.data.dim().2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_array(&self) -> &Array3<Complex64> {
        &self.data
    }
}

/// Everything produced by `Oscillator::evaluate`.
///
/// # Fields
/// - `admittance`: normalized admittance `Y` per sample.
/// - `matrix`: transfer matrix per sample.
/// - `tf`: transmission coefficient `1 / M22`.
/// - `abs_tf`: `|tf|`.
/// - `tf_squared`: `tf · conj(tf)`, evaluated on its own rather than from `abs_tf`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferState {
    pub admittance: Array1<Complex64>,
    pub matrix: TransferMatrix,
    pub tf: Array1<Complex64>,
    pub abs_tf: Array1<f64>,
    pub tf_squared: Array1<f64>,
}

impl TransferState {
    pub fn re_tf(&self) -> Array1<f64> {
        self.tf.mapv(|t| t.re)
    }

    pub fn im_tf(&self) -> Array1<f64> {
        self.tf.mapv(|t| t.im)
    }

    /// Samples at which the admittance or the transmission is not finite.
    pub fn singular_samples(&self) -> Vec<usize> {
        non_finite_indices(
            self.admittance.iter().zip(self.tf.iter()),
            |(y, t)| y.is_finite() && t.is_finite(),
        )
    }

    /// Fails with `NumericSingularity` if any sample is non-finite.
    pub fn check_finite(&self) -> Result<()> {
        let singular = self.singular_samples();
        match singular.first() {
            None => Ok(()),
            Some(&first_index) => Err(OscillatorError::NumericSingularity {
                count: singular.len(),
                first_index,
            }),
        }
    }
}

/// Phase-derived curves, available once the transmission exists.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedQuantities {
    /// Phase of `tf` in degrees, from the plain arctangent of `Im/Re`.
    pub phase: Array1<f64>,
    /// First derivative of `phase` over the sweep.
    pub group_delay: Array1<f64>,
    /// Second derivative of `phase` over the sweep.
    pub dispersion: Array1<f64>,
}

impl DerivedQuantities {
    /// `phase` with the 180° jumps of the plain arctangent removed.
    ///
    /// Presentation only; `group_delay` and `dispersion` are always computed
    /// from the wrapped phase.
    pub fn unwrapped_phase(&self) -> Array1<f64> {
        unwrap_phase(self.phase.view(), 180.0)
    }
}

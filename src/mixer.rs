//! Combination of two uncoupled oscillators acting in orthogonal planes.
//!
//! The two transmission magnitudes are combined in quadrature on the Cartesian
//! grid of the shared frequency sweep; there is no cross term.

use crate::error::{OscillatorError, Result};
use crate::oscillator::Oscillator;
use crate::sweep::FrequencySweep;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Square grid of combined magnitudes, `z[[x, y]]`, plus the axes it lives on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MixedSurface {
    pub x_axis: Array1<f64>,
    pub y_axis: Array1<f64>,
    pub z: Array2<f64>,
}

/// Mixes two magnitude curves it borrows; owns the surface it builds.
///
/// Both axes are the one shared sweep, whatever the inputs were computed on,
/// so the inputs must be index-aligned with it.
#[derive(Debug)]
pub struct OscillatorMixer<'a> {
    x_mag: ArrayView1<'a, f64>,
    y_mag: ArrayView1<'a, f64>,
    sweep: FrequencySweep,
    surface: Option<MixedSurface>,
}

impl<'a> OscillatorMixer<'a> {
    /// # Arguments
    /// - `x_mag`: magnitude curve of the oscillator along the first plane.
    /// - `y_mag`: magnitude curve of the oscillator along the second plane.
    /// - `sweep`: the sweep used for both axes.
    ///
    /// # Returns
    /// `SizeMismatch` if the curves differ in length or do not match the sweep.
    pub fn new(
        x_mag: ArrayView1<'a, f64>,
        y_mag: ArrayView1<'a, f64>,
        sweep: FrequencySweep,
    ) -> Result<Self> {
        if y_mag.len() != x_mag.len() {
            return Err(OscillatorError::SizeMismatch {
                expected: x_mag.len(),
                found: y_mag.len(),
            });
        }
        sweep.check_len(x_mag.len())?;
        Ok(OscillatorMixer {
            x_mag,
            y_mag,
            sweep,
            surface: None,
        })
    }

    /// Mixes the `|tf|` curves of two evaluated oscillators sharing a sweep.
    pub fn from_oscillators(x: &'a Oscillator, y: &'a Oscillator) -> Result<Self> {
        if x.sweep() != y.sweep() {
            return Err(OscillatorError::SweepMismatch);
        }
        let x_transfer = x.transfer().map_err(|_| OscillatorError::Sequencing {
            required: "mixing",
            current: x.stage().name(),
        })?;
        let y_transfer = y.transfer().map_err(|_| OscillatorError::Sequencing {
            required: "mixing",
            current: y.stage().name(),
        })?;
        Self::new(
            x_transfer.abs_tf.view(),
            y_transfer.abs_tf.view(),
            x.sweep().clone(),
        )
    }

    /// Rebuilds the surface, fixing `x` and iterating all `y`.
    pub fn mix(&mut self) -> &MixedSurface {
        let n = self.x_mag.len();
        let mut z = Array2::<f64>::zeros((n, n));
        for x in 0..n {
            for y in 0..n {
                z[[x, y]] = quadrature(self.x_mag[x], self.y_mag[y]);
            }
        }
        self.store(z)
    }

    /// Same surface as [`OscillatorMixer::mix`], with the rows filled in parallel.
    pub fn mix_parallel(&mut self) -> &MixedSurface {
        let n = self.x_mag.len();
        let mut z = Array2::<f64>::zeros((n, n));
        let x_mag = self.x_mag;
        let y_mag = self.y_mag;
        z.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(x, mut row)| {
                row.iter_mut()
                    .zip(y_mag.iter())
                    .for_each(|(cell, y)| *cell = quadrature(x_mag[x], *y));
            });
        self.store(z)
    }

    pub fn surface(&self) -> Option<&MixedSurface> {
        self.surface.as_ref()
    }

    pub fn into_surface(self) -> Option<MixedSurface> {
        self.surface
    }

    fn store(&mut self, z: Array2<f64>) -> &MixedSurface {
        log::debug!("mixed {}x{} surface", z.nrows(), z.ncols());
        self.surface.insert(MixedSurface {
            x_axis: self.sweep.samples().clone(),
            y_axis: self.sweep.samples().clone(),
            z,
        })
    }
}

fn quadrature(x: f64, y: f64) -> f64 {
    (x.powi(2) + y.powi(2)).sqrt()
}

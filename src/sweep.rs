//! Shared frequency sweep and the generalized-frequency transform evaluated on it.

use crate::config::SweepConfig;
use crate::error::{OscillatorError, Result};
use ndarray::Array1;
use std::sync::Arc;

/// Ordered, evenly spaced frequency samples.
///
/// The samples sit behind an `Arc`, so cloning a sweep to hand it to several
/// oscillators (or to a mixer) shares one immutable array.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySweep {
    config: SweepConfig,
    samples: Arc<Array1<f64>>,
}

impl Default for FrequencySweep {
    fn default() -> Self {
        let config = SweepConfig::default();
        FrequencySweep {
            samples: Arc::new(Array1::linspace(config.low, config.high, config.count)),
            config,
        }
    }
}

impl FrequencySweep {
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(FrequencySweep {
            samples: Arc::new(Array1::linspace(config.low, config.high, config.count)),
            config,
        })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn samples(&self) -> &Array1<f64> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Computes the generalized frequency `Ω = ω·g/w23 − w23/(g·ω)` at every sample.
    ///
    /// # Arguments
    /// - `g`: periodicity of the mesh.
    /// - `w23`: resonance normalization, `g / l0`.
    ///
    /// # Returns
    /// One value per sweep sample. A sample at `ω = 0` yields a non-finite value.
    pub fn generalized_frequency(&self, g: f64, w23: f64) -> Array1<f64> {
        self.samples.mapv(|w| (w * g / w23) - (w23 / (g * w)))
    }

    pub(crate) fn check_len(&self, found: usize) -> Result<()> {
        if found != self.len() {
            return Err(OscillatorError::SizeMismatch {
                expected: self.len(),
                found,
            });
        }
        Ok(())
    }
}

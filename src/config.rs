//! Configuration containers for the frequency sweep, the modelled media and a
//! complete two-oscillator session.
//!
//! Every container carries the historical fixed values in its `Default` impl,
//! so callers only override what they need (e.g. a coarser sweep in tests).

use crate::error::{OscillatorError, Result};
use crate::oscillator::{OscillatorParameters, Polarity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Evenly spaced, inclusive frequency sweep.
///
/// # Fields
/// - `count`: number of samples (at least 2).
/// - `low`: first sample.
/// - `high`: last sample.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct SweepConfig {
    pub count: usize,
    pub low: f64,
    pub high: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            count: 159,
            low: 0.005,
            high: 0.1,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.count < 2 {
            return Err(OscillatorError::InvalidParameter(format!(
                "sweep needs at least 2 samples, got {}",
                self.count
            )));
        }
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(OscillatorError::InvalidParameter(format!(
                "sweep bounds must be finite, got [{}, {}]",
                self.low, self.high
            )));
        }
        if self.low >= self.high {
            return Err(OscillatorError::InvalidParameter(format!(
                "sweep start {} must lie below sweep end {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Refractive indices of the three media around the mesh.
///
/// `n1` is the incident medium; only `n2` and `n3` enter the single-mesh
/// transfer matrix. All three default to vacuum.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct MediumIndices {
    pub n1: f64,
    pub n2: f64,
    pub n3: f64,
}

impl Default for MediumIndices {
    fn default() -> Self {
        MediumIndices {
            n1: 1.0,
            n2: 1.0,
            n3: 1.0,
        }
    }
}

/// Physical parameters plus admittance branch of one oscillator.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct OscillatorSpec {
    pub parameters: OscillatorParameters,
    pub polarity: Polarity,
}

impl OscillatorSpec {
    pub fn new(parameters: OscillatorParameters, polarity: Polarity) -> Self {
        OscillatorSpec {
            parameters,
            polarity,
        }
    }
}

/// Everything needed to evaluate and mix two uncoupled oscillators.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct SessionConfig {
    pub sweep: SweepConfig,
    pub media: MediumIndices,
    pub x: OscillatorSpec,
    pub y: OscillatorSpec,
    pub export_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            sweep: SweepConfig::default(),
            media: MediumIndices::default(),
            x: OscillatorSpec::new(
                OscillatorParameters::new(0.001, 0.01, 24.0, 32.0),
                Polarity::Normal,
            ),
            y: OscillatorSpec::new(
                OscillatorParameters::new(0.01, 3.0, 10.0, 15.0),
                Polarity::Normal,
            ),
            export_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_matches_historical_grid() {
        let sweep = SweepConfig::default();
        assert_eq!(sweep.count, 159);
        assert_eq!(sweep.low, 0.005);
        assert_eq!(sweep.high, 0.1);
        assert!(sweep.validate().is_ok());
    }

    #[test]
    fn test_sweep_validation_rejects_degenerate_grids() {
        let too_short = SweepConfig {
            count: 1,
            ..SweepConfig::default()
        };
        assert!(matches!(
            too_short.validate(),
            Err(OscillatorError::InvalidParameter(_))
        ));

        let reversed = SweepConfig {
            count: 10,
            low: 0.1,
            high: 0.005,
        };
        assert!(reversed.validate().is_err());

        let unbounded = SweepConfig {
            count: 10,
            low: 0.0,
            high: f64::INFINITY,
        };
        assert!(unbounded.validate().is_err());
    }

    #[test]
    fn test_default_media_are_vacuum() {
        let media = MediumIndices::default();
        assert_eq!([media.n1, media.n2, media.n3], [1.0, 1.0, 1.0]);
    }
}

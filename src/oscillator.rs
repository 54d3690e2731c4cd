//! Transmission-line model of a single periodic inductive mesh.
//!
//! An [`Oscillator`] evaluates the normalized admittance of the mesh over a
//! frequency sweep, builds the per-sample 2×2 transfer matrix from it and
//! derives the transmission coefficient `tf = 1 / M22`. Phase, group delay and
//! dispersion form a second, optional stage that needs the transmission.
//!
//! Formulation after R. Ulrich, "Far infrared properties of metallic mesh and
//! its complementary structure", Infrared Physics 7 (1967) 37–50.

use crate::config::MediumIndices;
use crate::error::{OscillatorError, Result};
use crate::math_tools::{numerical_gradient, reciprocal};
use crate::sweep::FrequencySweep;
use crate::transfer::{DerivedQuantities, TransferMatrix, TransferState};
use ndarray::{Array1, Zip};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

/// Selects which of the two closed-form admittance expressions is used.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum Polarity {
    /// `Y = 1 / (a1 − j·w23·A1 / Ω)`
    #[default]
    Normal,
    /// `Y = 1 / (a1 + 1 / (j·w23·A1 / Ω))`
    Inverted,
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Normal => {
                write!(f, "Normal")
            }
            Polarity::Inverted => {
                write!(f, "Inverted")
            }
        }
    }
}

/// Physical parameters of one mesh.
///
/// # Fields
/// - `a1`: resistive (loss) parameter.
/// - `big_a1`: reactive scaling parameter (`A1`).
/// - `g`: periodicity length.
/// - `l0`: reference length.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct OscillatorParameters {
    pub a1: f64,
    #[serde(rename = "A1")]
    pub big_a1: f64,
    pub g: f64,
    pub l0: f64,
}

impl OscillatorParameters {
    pub fn new(a1: f64, big_a1: f64, g: f64, l0: f64) -> Self {
        OscillatorParameters { a1, big_a1, g, l0 }
    }

    /// Resonance normalization `g / l0`.
    pub fn w23(&self) -> f64 {
        self.g / self.l0
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("g", self.g), ("l0", self.l0)] {
            if !value.is_finite() || value == 0.0 {
                return Err(OscillatorError::InvalidParameter(format!(
                    "{name} must be finite and non-zero, got {value}"
                )));
            }
        }
        for (name, value) in [("a1", self.a1), ("A1", self.big_a1)] {
            if !value.is_finite() {
                return Err(OscillatorError::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Progress of an oscillator through its two computation stages.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Stage {
    #[default]
    Uninitialized,
    Evaluated(TransferState),
    DerivedComputed(TransferState, DerivedQuantities),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Uninitialized => "uninitialized",
            Stage::Evaluated(_) => "evaluated",
            Stage::DerivedComputed(_, _) => "derived",
        }
    }

    fn transfer(&self) -> Option<&TransferState> {
        match self {
            Stage::Uninitialized => None,
            Stage::Evaluated(transfer) | Stage::DerivedComputed(transfer, _) => Some(transfer),
        }
    }
}

/// One inductive mesh evaluated over a frequency sweep.
#[derive(Debug, Clone)]
pub struct Oscillator {
    parameters: OscillatorParameters,
    polarity: Polarity,
    sweep: FrequencySweep,
    media: MediumIndices,
    generalized_frequency: Array1<f64>,
    stage: Stage,
}

impl Oscillator {
    /// Creates an oscillator on the default 159-point sweep in vacuum.
    pub fn new(parameters: OscillatorParameters, polarity: Polarity) -> Result<Self> {
        Self::with_config(
            parameters,
            polarity,
            FrequencySweep::default(),
            MediumIndices::default(),
        )
    }

    /// Creates an oscillator on a caller-supplied sweep and set of media.
    ///
    /// The generalized frequency is computed here once and reused until `g`
    /// or `l0` change.
    pub fn with_config(
        parameters: OscillatorParameters,
        polarity: Polarity,
        sweep: FrequencySweep,
        media: MediumIndices,
    ) -> Result<Self> {
        parameters.validate()?;
        let generalized_frequency = sweep.generalized_frequency(parameters.g, parameters.w23());
        Ok(Oscillator {
            parameters,
            polarity,
            sweep,
            media,
            generalized_frequency,
            stage: Stage::Uninitialized,
        })
    }

    pub fn parameters(&self) -> &OscillatorParameters {
        &self.parameters
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn sweep(&self) -> &FrequencySweep {
        &self.sweep
    }

    pub fn media(&self) -> &MediumIndices {
        &self.media
    }

    pub fn generalized_frequency(&self) -> &Array1<f64> {
        &self.generalized_frequency
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Switches the admittance branch. Any earlier results are discarded.
    pub fn set_polarity(&mut self, polarity: Polarity) {
        if polarity != self.polarity {
            self.polarity = polarity;
            self.stage = Stage::Uninitialized;
        }
    }

    /// Replaces the physical parameters. Any earlier results are discarded.
    pub fn set_parameters(&mut self, parameters: OscillatorParameters) -> Result<()> {
        parameters.validate()?;
        if parameters.g != self.parameters.g || parameters.l0 != self.parameters.l0 {
            self.generalized_frequency = self
                .sweep
                .generalized_frequency(parameters.g, parameters.w23());
        }
        self.parameters = parameters;
        self.stage = Stage::Uninitialized;
        Ok(())
    }

    /// Normalized admittance `Y` of the mesh at every sample.
    ///
    /// A vanishing generalized frequency makes the division by `Ω` blow up;
    /// those samples come back non-finite rather than clamped.
    pub fn compute_admittance(&self) -> Array1<Complex64> {
        let a1 = Complex64::new(self.parameters.a1, 0.0);
        let reactance = Complex64::new(0.0, self.parameters.w23() * self.parameters.big_a1);
        let polarity = self.polarity;
        self.generalized_frequency.mapv(|omega| {
            let x = reactance / omega;
            match polarity {
                Polarity::Normal => reciprocal(a1 - x),
                Polarity::Inverted => reciprocal(a1 + reciprocal(x)),
            }
        })
    }

    /// Builds the per-sample transfer matrix for the admittance `y`.
    ///
    /// ```text
    /// M11 = −Y/(2n2) + (n2+n3)/(2n2)    M12 = −Y/(2n2) + (n2−n3)/(2n2)
    /// M21 =  Y/(2n2) + (n2−n3)/(2n2)    M22 =  Y/(2n2) + (n2+n3)/(2n2)
    /// ```
    ///
    /// With both indices at 1 the constant parts are 1 and 0; the general form
    /// is kept so that non-vacuum media work unchanged.
    pub fn compute_transfer_matrix(&self, y: &Array1<Complex64>) -> Result<TransferMatrix> {
        self.sweep.check_len(y.len())?;
        let n2 = self.media.n2;
        let n3 = self.media.n3;
        let scale = 2.0 * n2;
        let sum = (n2 + n3) / scale;
        let diff = (n2 - n3) / scale;

        let m11 = y.mapv(|y| -(y / scale) + sum);
        let m21 = y.mapv(|y| (y / scale) + diff);
        let m12 = y.mapv(|y| -(y / scale) + diff);
        let m22 = y.mapv(|y| (y / scale) + sum);
        TransferMatrix::from_entries(m11, m12, m21, m22)
    }

    /// Runs admittance and matrix construction and stores the transmission.
    ///
    /// Calling it again recomputes from scratch and drops derived quantities.
    pub fn evaluate(&mut self) -> Result<&TransferState> {
        log::debug!(
            "evaluating {} oscillator a1={} A1={} g={} l0={} over {} samples",
            self.polarity,
            self.parameters.a1,
            self.parameters.big_a1,
            self.parameters.g,
            self.parameters.l0,
            self.sweep.len()
        );
        let admittance = self.compute_admittance();
        let matrix = self.compute_transfer_matrix(&admittance)?;

        let tf = matrix.entry(1, 1).mapv(reciprocal);
        let abs_tf = tf.mapv(|t| t.norm());
        let tf_squared = tf.mapv(|t| (t * t.conj()).re);

        let transfer = TransferState {
            admittance,
            matrix,
            tf,
            abs_tf,
            tf_squared,
        };
        let singular = transfer.singular_samples();
        if let Some(first) = singular.first() {
            log::warn!(
                "{} non-finite sample(s) in transfer function, first at index {} (w = {})",
                singular.len(),
                first,
                self.sweep.samples()[*first]
            );
        }

        self.stage = Stage::Evaluated(transfer);
        self.transfer()
    }

    /// Computes phase, group delay and dispersion from the stored transmission.
    ///
    /// Fails with `Sequencing` unless [`Oscillator::evaluate`] ran first.
    /// The phase uses `atan(Im/Re)`, not `atan2`, so it stays within ±90° and
    /// jumps by 180° where `Re(tf)` changes sign.
    pub fn derive_phase_and_dispersion(&mut self) -> Result<&DerivedQuantities> {
        let transfer = match std::mem::take(&mut self.stage) {
            Stage::Evaluated(transfer) | Stage::DerivedComputed(transfer, _) => transfer,
            Stage::Uninitialized => {
                return Err(OscillatorError::Sequencing {
                    required: "phase/dispersion derivation",
                    current: Stage::Uninitialized.name(),
                });
            }
        };

        let derived = match derive_from_transfer(&transfer, &self.sweep) {
            Ok(derived) => derived,
            Err(err) => {
                self.stage = Stage::Evaluated(transfer);
                return Err(err);
            }
        };
        log::debug!("derived phase, group delay and dispersion");
        self.stage = Stage::DerivedComputed(transfer, derived);
        self.derived()
    }

    /// The transmission bundle, if the oscillator was evaluated.
    pub fn transfer(&self) -> Result<&TransferState> {
        self.stage
            .transfer()
            .ok_or_else(|| OscillatorError::Sequencing {
                required: "transfer access",
                current: self.stage.name(),
            })
    }

    /// The derived quantities, if they were computed.
    pub fn derived(&self) -> Result<&DerivedQuantities> {
        match &self.stage {
            Stage::DerivedComputed(_, derived) => Ok(derived),
            other => Err(OscillatorError::Sequencing {
                required: "derived quantity access",
                current: other.name(),
            }),
        }
    }
}

fn derive_from_transfer(
    transfer: &TransferState,
    sweep: &FrequencySweep,
) -> Result<DerivedQuantities> {
    let mut phase = Array1::<f64>::zeros(transfer.tf.len());
    Zip::from(&mut phase)
        .and(&transfer.tf)
        .for_each(|p, t| *p = (180.0 / PI) * (t.im / t.re).atan());

    let w = sweep.samples().view();
    let group_delay = numerical_gradient(phase.view(), w)?;
    let dispersion = numerical_gradient(group_delay.view(), w)?;
    Ok(DerivedQuantities {
        phase,
        group_delay,
        dispersion,
    })
}

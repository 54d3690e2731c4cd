//! Transfer-function engine for periodic inductive-mesh optical filters.
//!
//! A mesh is modelled as an equivalent transmission-line circuit: its
//! normalized admittance feeds a 2×2 transfer matrix per frequency sample, from
//! which the transmission coefficient, its magnitude and phase, the group delay
//! and the dispersion follow. Two meshes acting in orthogonal planes can be
//! combined, assuming no coupling, into a 2-D magnitude surface.
//!
//! # Modules
//!
//! * `config`: sweep, media and session configuration with historical defaults.
//! * `oscillator`: the single-mesh model and its evaluation stages.
//! * `mixer`: quadrature combination of two magnitude curves.
//! * `batch`: parallel, cancellable evaluation of many parameter sets.
//! * `io`: `.npz` export for plotting tools.
//! * `session`: the complete two-oscillator run.

pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod math_tools;
pub mod mixer;
pub mod oscillator;
pub mod session;
pub mod sweep;
pub mod transfer;

pub use config::{MediumIndices, OscillatorSpec, SessionConfig, SweepConfig};
pub use error::{OscillatorError, Result};
pub use mixer::{MixedSurface, OscillatorMixer};
pub use oscillator::{Oscillator, OscillatorParameters, Polarity, Stage};
pub use sweep::FrequencySweep;
pub use transfer::{DerivedQuantities, TransferMatrix, TransferState};

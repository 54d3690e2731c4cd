//! A full two-oscillator run: evaluate both meshes, derive their phase
//! quantities and mix the magnitudes into one surface.

use crate::config::{OscillatorSpec, SessionConfig};
use crate::error::Result;
use crate::io::{save_surface_to_npz, save_transfer_to_npz};
use crate::mixer::{MixedSurface, OscillatorMixer};
use crate::oscillator::Oscillator;
use crate::sweep::FrequencySweep;
use std::path::Path;

pub struct SessionOutput {
    pub x: Oscillator,
    pub y: Oscillator,
    pub surface: MixedSurface,
}

impl SessionOutput {
    /// Writes `transfer_x.npz`, `transfer_y.npz` and `uncoupled_oscillator.npz` into `dir`.
    pub fn export(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        save_transfer_to_npz(&self.x, &dir.join("transfer_x.npz"))?;
        save_transfer_to_npz(&self.y, &dir.join("transfer_y.npz"))?;
        save_surface_to_npz(&self.surface, &dir.join("uncoupled_oscillator.npz"))?;
        Ok(())
    }
}

fn prepare(
    spec: &OscillatorSpec,
    sweep: &FrequencySweep,
    config: &SessionConfig,
) -> Result<Oscillator> {
    log::info!("A1 -> {} ({} polarity)", spec.parameters.big_a1, spec.polarity);
    let mut oscillator =
        Oscillator::with_config(spec.parameters, spec.polarity, sweep.clone(), config.media)?;
    oscillator.evaluate()?;
    oscillator.derive_phase_and_dispersion()?;
    Ok(oscillator)
}

pub fn run_session(config: &SessionConfig) -> Result<SessionOutput> {
    let sweep = FrequencySweep::new(config.sweep)?;
    let x = prepare(&config.x, &sweep, config)?;
    let y = prepare(&config.y, &sweep, config)?;

    let surface = OscillatorMixer::from_oscillators(&x, &y)?
        .mix_parallel()
        .clone();
    log::info!(
        "mixed surface {}x{}, peak {:.4}",
        surface.z.nrows(),
        surface.z.ncols(),
        surface.z.iter().cloned().fold(f64::NAN, f64::max)
    );
    Ok(SessionOutput { x, y, surface })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_session_reproduces_reference_pair() {
        let output = run_session(&SessionConfig::default()).unwrap();
        assert_eq!(output.x.parameters().g, 24.0);
        assert_eq!(output.y.parameters().l0, 15.0);
        assert!(output.x.derived().is_ok());
        assert!(output.y.derived().is_ok());
        assert_eq!(output.surface.z.dim(), (159, 159));

        let x_abs = &output.x.transfer().unwrap().abs_tf;
        let y_abs = &output.y.transfer().unwrap().abs_tf;
        assert_relative_eq!(
            output.surface.z[[3, 150]],
            (x_abs[3].powi(2) + y_abs[150].powi(2)).sqrt()
        );
    }

    #[test]
    fn test_session_honours_sweep_override() {
        let config = SessionConfig {
            sweep: SweepConfig {
                count: 21,
                low: 0.01,
                high: 0.05,
            },
            ..SessionConfig::default()
        };
        let output = run_session(&config).unwrap();
        assert_eq!(output.x.sweep().len(), 21);
        assert_eq!(output.surface.x_axis.len(), 21);
        assert_relative_eq!(output.surface.y_axis[20], 0.05, max_relative = 1e-12);
    }

    #[test]
    fn test_session_export_writes_three_archives() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_session(&SessionConfig::default()).unwrap();
        output.export(dir.path()).unwrap();
        for name in ["transfer_x.npz", "transfer_y.npz", "uncoupled_oscillator.npz"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }
}

//! Parallel evaluation of many independent oscillators on one shared sweep.
//!
//! Every parameter set is evaluated on its own rayon task; an abort flag lets
//! a caller stop a long parameter study early.

use crate::config::{MediumIndices, OscillatorSpec};
use crate::error::{OscillatorError, Result};
use crate::oscillator::Oscillator;
use crate::sweep::FrequencySweep;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Evaluates every spec, optionally deriving phase quantities as well.
///
/// # Arguments
/// - `specs`: parameter sets and polarities, evaluated independently.
/// - `sweep`: shared by all resulting oscillators.
/// - `media`: refractive indices used by all oscillators.
/// - `derive`: also run the phase/group-delay/dispersion stage.
/// - `abort_flag`: set to `true` from elsewhere to stop the batch.
///
/// # Returns
/// The oscillators in the order of `specs`, or `Cancelled` if the flag was
/// raised at any point before the batch returns, even after the last spec
/// finished. Otherwise the error of a failing spec.
pub fn evaluate_batch(
    specs: &[OscillatorSpec],
    sweep: &FrequencySweep,
    media: &MediumIndices,
    derive: bool,
    abort_flag: &AtomicBool,
) -> Result<Vec<Oscillator>> {
    log::debug!("evaluating batch of {} oscillators", specs.len());
    let result: Result<Vec<Oscillator>> = specs
        .par_iter()
        .map(|spec| {
            check_abort(abort_flag)?;
            let mut oscillator =
                Oscillator::with_config(spec.parameters, spec.polarity, sweep.clone(), *media)?;
            oscillator.evaluate()?;
            check_abort(abort_flag)?;
            if derive {
                oscillator.derive_phase_and_dispersion()?;
            }
            Ok(oscillator)
        })
        .collect();
    finish_unless_aborted(result, abort_flag)
}

fn check_abort(abort_flag: &AtomicBool) -> Result<()> {
    if abort_flag.load(Ordering::Relaxed) {
        return Err(OscillatorError::Cancelled);
    }
    Ok(())
}

/// A flag raised while the last tasks were finishing still cancels the batch.
fn finish_unless_aborted(
    result: Result<Vec<Oscillator>>,
    abort_flag: &AtomicBool,
) -> Result<Vec<Oscillator>> {
    check_abort(abort_flag).inspect_err(|_| log::info!("batch evaluation cancelled"))?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::{OscillatorParameters, Polarity};

    fn specs() -> Vec<OscillatorSpec> {
        (1..=8)
            .map(|i| {
                let polarity = if i % 2 == 0 {
                    Polarity::Normal
                } else {
                    Polarity::Inverted
                };
                OscillatorSpec::new(
                    OscillatorParameters::new(0.001 * i as f64, 0.01, 24.0, 32.0),
                    polarity,
                )
            })
            .collect()
    }

    #[test]
    fn test_batch_preserves_order_and_matches_single_evaluation() {
        let specs = specs();
        let abort = AtomicBool::new(false);
        let sweep = FrequencySweep::default();
        let batch = evaluate_batch(&specs, &sweep, &MediumIndices::default(), true, &abort).unwrap();
        assert_eq!(batch.len(), specs.len());
        for (osc, spec) in batch.iter().zip(specs.iter()) {
            assert_eq!(osc.parameters(), &spec.parameters);
            assert_eq!(osc.polarity(), spec.polarity);
            assert!(osc.derived().is_ok());

            let mut single = Oscillator::new(spec.parameters, spec.polarity).unwrap();
            let expected = single.evaluate().unwrap();
            assert_eq!(osc.transfer().unwrap(), expected);
        }
    }

    #[test]
    fn test_batch_without_derivation_stops_at_evaluated() {
        let abort = AtomicBool::new(false);
        let batch = evaluate_batch(
            &specs(),
            &FrequencySweep::default(),
            &MediumIndices::default(),
            false,
            &abort,
        )
        .unwrap();
        assert!(batch.iter().all(|osc| osc.stage().name() == "evaluated"));
    }

    #[test]
    fn test_raised_flag_cancels_batch() {
        let abort = AtomicBool::new(true);
        let result = evaluate_batch(
            &specs(),
            &FrequencySweep::default(),
            &MediumIndices::default(),
            false,
            &abort,
        );
        assert!(matches!(result, Err(OscillatorError::Cancelled)));
    }

    #[test]
    fn test_flag_raised_after_last_task_still_cancels() {
        let abort = AtomicBool::new(false);
        let finished = evaluate_batch(
            &specs(),
            &FrequencySweep::default(),
            &MediumIndices::default(),
            true,
            &abort,
        );
        assert!(finished.is_ok());

        abort.store(true, Ordering::Relaxed);
        assert!(matches!(
            finish_unless_aborted(finished, &abort),
            Err(OscillatorError::Cancelled)
        ));
    }

    #[test]
    fn test_lowered_flag_passes_task_errors_through() {
        let abort = AtomicBool::new(false);
        let failed = Err(OscillatorError::InvalidParameter("l0".to_string()));
        assert!(matches!(
            finish_unless_aborted(failed, &abort),
            Err(OscillatorError::InvalidParameter(_))
        ));
        assert!(finish_unless_aborted(Ok(Vec::new()), &abort).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_spec_fails_batch() {
        let mut specs = specs();
        specs.push(OscillatorSpec::new(
            OscillatorParameters::new(0.001, 0.01, 24.0, 0.0),
            Polarity::Normal,
        ));
        let abort = AtomicBool::new(false);
        let result = evaluate_batch(
            &specs,
            &FrequencySweep::default(),
            &MediumIndices::default(),
            false,
            &abort,
        );
        assert!(matches!(result, Err(OscillatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_batch() {
        let abort = AtomicBool::new(false);
        let batch = evaluate_batch(
            &[],
            &FrequencySweep::default(),
            &MediumIndices::default(),
            true,
            &abort,
        )
        .unwrap();
        assert!(batch.is_empty());
    }
}

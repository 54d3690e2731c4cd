use mesh_oscillator::session::run_session;
use mesh_oscillator::SessionConfig;
use preferences::{AppInfo, Preferences};
use std::error::Error;

const APP_INFO: AppInfo = AppInfo {
    name: "Mesh Oscillator",
    author: "Linus Leo Stöckli",
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let prefs_key = "config/session";
    let config = match SessionConfig::load(&APP_INFO, prefs_key) {
        Ok(config) => config,
        Err(_) => {
            // save default settings
            let config = SessionConfig::default();
            if let Err(err) = config.save(&APP_INFO, prefs_key) {
                log::error!("error in saving session config: {err:?}");
            }
            config
        }
    };

    let output = run_session(&config)?;
    for (label, oscillator) in [("x", &output.x), ("y", &output.y)] {
        let transfer = oscillator.transfer()?;
        let singular = transfer.singular_samples();
        if !singular.is_empty() {
            log::warn!("oscillator {label}: singular at samples {singular:?}");
        }
        let peak = transfer.abs_tf.iter().cloned().fold(f64::NAN, f64::max);
        log::info!("oscillator {label}: peak |tf| = {peak:.4}");
    }
    output.export(&config.export_dir)?;
    Ok(())
}

//! Export of oscillator curves and mixed surfaces to `.npz` archives, the
//! hand-over format for plotting tools.

use crate::error::Result;
use crate::mixer::MixedSurface;
use crate::oscillator::Oscillator;
use ndarray_npy::{NpzReader, NpzWriter};
use std::fs::File;
use std::path::Path;

/// Writes the transmission curves of an evaluated oscillator.
///
/// Arrays: `frequency`, `abs_tf`, `re_tf`, `im_tf`, `tf_squared` and, once
/// derived, `phase`, `group_delay`, `dispersion`.
pub fn save_transfer_to_npz(oscillator: &Oscillator, file_path: &Path) -> Result<()> {
    let transfer = oscillator.transfer()?;
    let mut npz = NpzWriter::new(File::create(file_path)?);
    npz.add_array("frequency", oscillator.sweep().samples())?;
    npz.add_array("abs_tf", &transfer.abs_tf)?;
    npz.add_array("re_tf", &transfer.re_tf())?;
    npz.add_array("im_tf", &transfer.im_tf())?;
    npz.add_array("tf_squared", &transfer.tf_squared)?;
    if let Ok(derived) = oscillator.derived() {
        npz.add_array("phase", &derived.phase)?;
        npz.add_array("group_delay", &derived.group_delay)?;
        npz.add_array("dispersion", &derived.dispersion)?;
    }
    npz.finish()?;
    log::info!("saved transfer curves to {:?}", file_path);
    Ok(())
}

pub fn save_surface_to_npz(surface: &MixedSurface, file_path: &Path) -> Result<()> {
    let mut npz = NpzWriter::new(File::create(file_path)?);
    npz.add_array("x_axis", &surface.x_axis)?;
    npz.add_array("y_axis", &surface.y_axis)?;
    npz.add_array("z", &surface.z)?;
    npz.finish()?;
    log::info!("saved mixed surface to {:?}", file_path);
    Ok(())
}

pub fn open_surface_from_npz(file_path: &Path) -> Result<MixedSurface> {
    let mut npz = NpzReader::new(File::open(file_path)?)?;
    Ok(MixedSurface {
        x_axis: npz.by_name("x_axis.npy")?,
        y_axis: npz.by_name("y_axis.npy")?,
        z: npz.by_name("z.npy")?,
    })
}

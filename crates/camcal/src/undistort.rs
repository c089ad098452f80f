//! Undistortion pass over the input images.

use std::path::{Path, PathBuf};

use log::info;
use opencv::calib3d;
use opencv::core::{Mat, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;

use crate::calibrate::SolvedCalibration;
use crate::config::CalibrationConfig;
use crate::detect::read_gray;
use crate::error::CalibError;
use crate::preview::PreviewWindows;

/// Re-iterate the file list, undistorting every decodable image with
/// the solved parameters and cropping to the valid region.
///
/// Entries that failed to decode during detection fail again here and
/// are skipped the same way. Saved files carry one 0-based index that
/// advances per decoded image, independent of the detection loop's
/// acceptance count. Returns the number of images processed.
pub fn undistort_all(
    cfg: &CalibrationConfig,
    entries: &[PathBuf],
    output_dir: &Path,
    solved: &SolvedCalibration,
    preview: &PreviewWindows,
) -> Result<usize, CalibError> {
    let mut index = 0;
    for path in entries {
        let Some(gray) = read_gray(path) else {
            continue;
        };

        info!("undistorting image {}", path.display());
        preview.show_raw(&gray)?;

        let mut undistorted = Mat::default();
        calib3d::undistort(
            &gray,
            &mut undistorted,
            &solved.camera_matrix,
            &solved.distortion,
            &solved.optimal_matrix,
        )?;
        let cropped = Mat::roi(&undistorted, solved.crop)?.try_clone()?;

        if cfg.save {
            let out = output_dir.join(format!("undistort{index}.jpg"));
            imgcodecs::imwrite(&out.to_string_lossy(), &cropped, &Vector::new())?;
        }
        preview.show_undistorted(&cropped)?;
        index += 1;
    }
    Ok(index)
}

//! The end-to-end calibration run.

use log::{debug, info};

use crate::calibrate;
use crate::config::CalibrationConfig;
use crate::detect;
use crate::error::CalibError;
use crate::preview::PreviewWindows;
use crate::report::CalibrationReport;
use crate::undistort;

/// Run the whole pipeline: enumerate, detect, calibrate, undistort,
/// report. Strictly sequential; the first fatal error ends the run.
pub fn run(cfg: &CalibrationConfig) -> Result<(), CalibError> {
    let input_dir = cfg.input_path()?;
    let output_dir = cfg.output_path()?;

    info!("searching for images in {}", input_dir.display());
    let entries = detect::list_entries(&input_dir)?;
    for path in &entries {
        debug!("\t{}", path.display());
    }

    if cfg.visualize {
        info!("previews enabled; each preview pauses for 5 seconds, press any key to continue earlier");
    }
    let preview = PreviewWindows::open(cfg.visualize, cfg.grid.kind)?;

    if cfg.save {
        info!("saving output to {}", output_dir.display());
        if !output_dir.exists() {
            std::fs::create_dir_all(&output_dir)?;
            info!("created new output directory");
        }
    }

    let detections = detect::collect_detections(cfg, &input_dir, &entries, &output_dir, &preview)?;

    info!("beginning calibration");
    let solved = calibrate::calibrate(&detections)?;

    info!("beginning undistortion");
    let undistorted = undistort::undistort_all(cfg, &entries, &output_dir, &solved, &preview)?;
    debug!("undistorted {undistorted} images");

    let error = calibrate::mean_reprojection_error(&detections, &solved)?;
    let report = CalibrationReport::new(&cfg.grid, &solved.result(error)?);
    report.log_summary();

    if cfg.save {
        report.write_text(&output_dir.join("result.txt"))?;
        report.write_json(&output_dir.join("result.json"))?;
    }

    Ok(())
}

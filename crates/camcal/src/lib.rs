//! Single-camera intrinsic calibration from a folder of images.
//!
//! The crate walks a directory of chessboard (or circle-grid)
//! photographs, accumulates 3D-to-2D point correspondences via the
//! OpenCV pattern finders, solves for the intrinsic matrix and lens
//! distortion, undistorts the inputs, and reports the result as text
//! and JSON.
//!
//! The numerical heavy lifting (pattern detection, sub-pixel corner
//! refinement, the calibration solver, undistortion) is delegated to
//! OpenCV; this crate owns configuration, the sequential pipeline,
//! accumulation, and reporting.

mod calibrate;
mod config;
mod detect;
mod error;
mod grid;
pub mod logger;
mod pipeline;
mod preview;
mod report;
mod undistort;

pub use calibrate::{calibrate, mean_reprojection_error, CalibrationResult, SolvedCalibration};
pub use config::CalibrationConfig;
pub use detect::{collect_detections, list_entries, read_gray, refine_corners, Detections};
pub use error::CalibError;
pub use grid::{CalibrationGrid, PatternKind};
pub use pipeline::run;
pub use preview::PreviewWindows;
pub use report::{CalibrationReport, GridSummary};
pub use undistort::undistort_all;

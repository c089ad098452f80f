//! Calibration solver invocation and reprojection diagnostics.

use log::debug;
use nalgebra::Matrix3;
use opencv::calib3d;
use opencv::core::{self, Mat, Point2f, Rect, Size, TermCriteria, Vector};
use opencv::prelude::*;

use crate::detect::Detections;
use crate::error::CalibError;

/// Raw solver output, kept in library matrix form for the undistortion
/// pass. Produced once; read-only afterwards.
pub struct SolvedCalibration {
    pub camera_matrix: Mat,
    pub distortion: Mat,
    pub rvecs: Vector<Mat>,
    pub tvecs: Vector<Mat>,
    pub optimal_matrix: Mat,
    pub crop: Rect,
    pub image_size: Size,
    pub rms: f64,
}

/// Terminal calibration output in plain numeric form.
#[derive(Clone, Debug)]
pub struct CalibrationResult {
    pub intrinsic: Matrix3<f64>,
    pub distortion: Vec<f64>,
    pub optimal: Matrix3<f64>,
    pub crop: Rect,
    pub mean_reprojection_error: f64,
}

/// Solve camera intrinsics from the accumulated correspondences.
///
/// The solver is called exactly once; a solver failure aborts the run.
/// The "optimal" matrix is derived with alpha = 1 so no pixels are
/// clipped, at the cost of black border regions in the undistorted
/// output.
pub fn calibrate(detections: &Detections) -> Result<SolvedCalibration, CalibError> {
    let mut camera_matrix = Mat::default();
    let mut distortion = Mat::default();
    let mut rvecs = Vector::<Mat>::new();
    let mut tvecs = Vector::<Mat>::new();

    let rms = calib3d::calibrate_camera(
        &detections.object_points,
        &detections.image_points,
        detections.image_size,
        &mut camera_matrix,
        &mut distortion,
        &mut rvecs,
        &mut tvecs,
        0,
        TermCriteria::default()?,
    )?;
    debug!("solver RMS reprojection error: {rms:.6}");

    let mut crop = Rect::default();
    let optimal_matrix = calib3d::get_optimal_new_camera_matrix(
        &camera_matrix,
        &distortion,
        detections.image_size,
        1.0,
        detections.image_size,
        Some(&mut crop),
        false,
    )?;

    Ok(SolvedCalibration {
        camera_matrix,
        distortion,
        rvecs,
        tvecs,
        optimal_matrix,
        crop,
        image_size: detections.image_size,
        rms,
    })
}

/// Mean reprojection error over all accepted images.
///
/// Each image's object points are pushed through its solved pose and
/// the intrinsic/distortion parameters; the L2 distance to the observed
/// points is normalized by the point count, then averaged over images.
/// Diagnostic only; the result does not feed back into the solution.
pub fn mean_reprojection_error(
    detections: &Detections,
    solved: &SolvedCalibration,
) -> Result<f64, CalibError> {
    let images = detections.object_points.len();
    let mut total = 0.0;
    for i in 0..images {
        let mut projected = Vector::<Point2f>::new();
        calib3d::project_points(
            &detections.object_points.get(i)?,
            &solved.rvecs.get(i)?,
            &solved.tvecs.get(i)?,
            &solved.camera_matrix,
            &solved.distortion,
            &mut projected,
            &mut core::no_array(),
            0.0,
        )?;
        let error = core::norm2(
            &detections.image_points.get(i)?,
            &projected,
            core::NORM_L2,
            &core::no_array(),
        )?;
        total += error / projected.len() as f64;
    }
    Ok(total / images as f64)
}

impl SolvedCalibration {
    /// Plain numeric view of the solution for reporting.
    pub fn result(&self, mean_reprojection_error: f64) -> Result<CalibrationResult, CalibError> {
        Ok(CalibrationResult {
            intrinsic: mat3_to_matrix3(&self.camera_matrix)?,
            distortion: mat_to_vec_f64(&self.distortion)?,
            optimal: mat3_to_matrix3(&self.optimal_matrix)?,
            crop: self.crop,
            mean_reprojection_error,
        })
    }
}

fn mat3_to_matrix3(m: &Mat) -> Result<Matrix3<f64>, opencv::Error> {
    let mut out = Matrix3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            out[(r as usize, c as usize)] = *m.at_2d::<f64>(r, c)?;
        }
    }
    Ok(out)
}

fn mat_to_vec_f64(m: &Mat) -> Result<Vec<f64>, opencv::Error> {
    Ok(m.to_vec_2d::<f64>()?.into_iter().flatten().collect())
}

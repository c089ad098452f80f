//! Image enumeration, pattern detection and point accumulation.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use opencv::calib3d;
use opencv::core::{self, Mat, Point2f, Point3f, Size, TermCriteria, Vector};
use opencv::imgcodecs;
use opencv::imgproc;
use opencv::prelude::*;

use crate::config::CalibrationConfig;
use crate::error::CalibError;
use crate::grid::{CalibrationGrid, PatternKind};
use crate::preview::PreviewWindows;

/// Below this many accepted images the run proceeds with a warning.
const MIN_RECOMMENDED_IMAGES: usize = 10;

/// Sub-pixel search termination: 30 iterations or 0.001 px movement,
/// whichever comes first.
fn subpix_criteria() -> Result<TermCriteria, opencv::Error> {
    TermCriteria::new(core::TermCriteria_EPS + core::TermCriteria_MAX_ITER, 30, 0.001)
}

/// Point correspondences accumulated over the detection loop.
///
/// `object_points` and `image_points` grow in lockstep, one entry per
/// accepted image, and are sealed once the loop finishes. `image_size`
/// comes from the first accepted image.
pub struct Detections {
    pub object_points: Vector<Vector<Point3f>>,
    pub image_points: Vector<Vector<Point2f>>,
    pub image_size: Size,
    pub found: usize,
    pub scanned: usize,
}

/// Directory entries in deterministic name order.
pub fn list_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    Ok(entries)
}

/// Try to decode a directory entry as a grayscale image.
///
/// Anything that does not decode (non-image files, subdirectories) is
/// reported as `None`; decode failure is informative, never fatal.
pub fn read_gray(path: &Path) -> Option<Mat> {
    match imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_GRAYSCALE) {
        Ok(img) if !img.empty() => Some(img),
        _ => None,
    }
}

/// Refine chessboard corners to sub-pixel accuracy.
///
/// Takes the detected corners by value and returns the refined vector
/// explicitly, so callers never have to reason about in-place mutation.
pub fn refine_corners(
    gray: &Mat,
    mut corners: Vector<Point2f>,
    window: i32,
) -> Result<Vector<Point2f>, opencv::Error> {
    imgproc::corner_sub_pix(
        gray,
        &mut corners,
        Size::new(window, window),
        Size::new(-1, -1),
        subpix_criteria()?,
    )?;
    Ok(corners)
}

/// Run the configured pattern finder on one grayscale image.
///
/// Returns `Ok(None)` when the pattern is not present; the image is
/// then skipped by the caller.
fn find_pattern(
    gray: &Mat,
    grid: &CalibrationGrid,
    window: i32,
) -> Result<Option<Vector<Point2f>>, opencv::Error> {
    match grid.kind {
        PatternKind::Chessboard => {
            let mut corners = Vector::<Point2f>::new();
            let found = calib3d::find_chessboard_corners(
                gray,
                grid.pattern_size(),
                &mut corners,
                calib3d::CALIB_CB_ADAPTIVE_THRESH | calib3d::CALIB_CB_FAST_CHECK,
            )?;
            if !found {
                return Ok(None);
            }
            let refined = refine_corners(gray, corners, window)?;
            debug!("refined {} corners to sub-pixel accuracy", refined.len());
            Ok(Some(refined))
        }
        PatternKind::CircleGrid => {
            let mut centers = Vector::<Point2f>::new();
            let found = calib3d::find_circles_grid(
                gray,
                grid.pattern_size(),
                &mut centers,
                calib3d::CALIB_CB_SYMMETRIC_GRID,
                None,
                calib3d::CirclesGridFinderParameters::default()?,
            )?;
            if found {
                Ok(Some(centers))
            } else {
                Ok(None)
            }
        }
    }
}

/// Draw the detected points over a colour copy of the image.
fn annotate(gray: &Mat, grid: &CalibrationGrid, points: &Vector<Point2f>) -> Result<Mat, opencv::Error> {
    let mut colour = Mat::default();
    imgproc::cvt_color_def(gray, &mut colour, imgproc::COLOR_GRAY2BGR)?;
    calib3d::draw_chessboard_corners(&mut colour, grid.pattern_size(), points, true)?;
    Ok(colour)
}

/// Walk the input directory and accumulate correspondences from every
/// image in which the pattern is found.
///
/// A decode failure or a detection miss skips that entry; the run only
/// aborts when no image at all contributed points.
pub fn collect_detections(
    cfg: &CalibrationConfig,
    input_dir: &Path,
    entries: &[PathBuf],
    output_dir: &Path,
    preview: &PreviewWindows,
) -> Result<Detections, CalibError> {
    let grid = &cfg.grid;
    let object_point = grid.object_points();

    let mut detections = Detections {
        object_points: Vector::new(),
        image_points: Vector::new(),
        image_size: Size::default(),
        found: 0,
        scanned: 0,
    };

    for path in entries {
        detections.scanned += 1;
        let Some(gray) = read_gray(path) else {
            debug!("skipping non-image entry {}", path.display());
            continue;
        };

        info!("searching image {}", path.display());
        preview.show_raw(&gray)?;

        let Some(points) = find_pattern(&gray, grid, cfg.window)? else {
            info!("\tpattern not found");
            continue;
        };
        info!("\tfound corners or centers");

        let size = gray.size()?;
        if detections.found == 0 {
            detections.image_size = size;
        } else if size != detections.image_size {
            warn!(
                "image size {}x{} differs from first accepted image {}x{}",
                size.width, size.height, detections.image_size.width, detections.image_size.height
            );
        }

        detections.object_points.push(object_point.clone());
        detections.image_points.push(points.clone());
        detections.found += 1;

        let annotated = annotate(&gray, grid, &points)?;
        if cfg.save {
            let out = output_dir.join(format!("grid{}.jpg", detections.found));
            imgcodecs::imwrite(&out.to_string_lossy(), &annotated, &Vector::new())?;
        }
        preview.show_detection(&annotated)?;
    }

    if detections.found >= MIN_RECOMMENDED_IMAGES {
        info!("found {} calibratable images", detections.found);
    } else if detections.found == 0 {
        return Err(CalibError::InsufficientData {
            dir: input_dir.to_path_buf(),
            scanned: detections.scanned,
        });
    } else {
        warn!(
            "found only {} calibratable images; calibration quality is not guaranteed",
            detections.found
        );
    }

    Ok(detections)
}

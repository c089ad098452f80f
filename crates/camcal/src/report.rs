//! Console and file reporting.
//!
//! The text and JSON reports carry the same values; the JSON document
//! uses the fixed keys `grid`, `time`, `intrinsic`, `distortion`,
//! `optimal`, `crop` and `error`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::calibrate::CalibrationResult;
use crate::grid::CalibrationGrid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSummary {
    pub rows: i32,
    pub cols: i32,
    pub spacing: f64,
}

/// Serializable report of one calibration run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub grid: GridSummary,
    pub time: String,
    pub intrinsic: [[f64; 3]; 3],
    pub distortion: Vec<f64>,
    pub optimal: [[f64; 3]; 3],
    pub crop: [i32; 4],
    pub error: f64,
}

impl CalibrationReport {
    /// Snapshot the result with a local timestamp.
    pub fn new(grid: &CalibrationGrid, result: &CalibrationResult) -> Self {
        Self {
            grid: GridSummary {
                rows: grid.rows,
                cols: grid.cols,
                spacing: grid.spacing,
            },
            time: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S%.6f")
                .to_string(),
            intrinsic: matrix_rows(&result.intrinsic),
            distortion: result.distortion.clone(),
            optimal: matrix_rows(&result.optimal),
            crop: [
                result.crop.x,
                result.crop.y,
                result.crop.width,
                result.crop.height,
            ],
            error: result.mean_reprojection_error,
        }
    }

    /// Log the full result at info level.
    pub fn log_summary(&self) {
        info!("Intrinsic Matrix:");
        for row in &self.intrinsic {
            info!("\t{}", row_line(row));
        }
        info!("Distortion Coefficients:");
        info!("\t{}", row_line(&self.distortion));
        info!("Optimal Camera Matrix:");
        for row in &self.optimal {
            info!("\t{}", row_line(row));
        }
        let [x, y, w, h] = self.crop;
        info!("Optimal Camera Matrix Crop: ({x}, {y}, {w}, {h})");
        info!("Re-projection Error: {}", self.error);
    }

    /// Write the human-readable text report.
    pub fn write_text(&self, path: &Path) -> std::io::Result<()> {
        let mut f = File::create(path)?;
        writeln!(
            f,
            "Grid: Rows: {}, Cols: {}, Spacing: {}:",
            self.grid.rows, self.grid.cols, self.grid.spacing
        )?;
        writeln!(f, "Time: {}", self.time)?;

        writeln!(f, "Intrinsic Matrix:")?;
        for row in &self.intrinsic {
            writeln!(f, "{}", row_line(row))?;
        }
        writeln!(f)?;

        writeln!(f, "Distortion Matrix:")?;
        writeln!(f, "{}", row_line(&self.distortion))?;
        writeln!(f)?;

        writeln!(f, "Optimal Camera Matrix:")?;
        for row in &self.optimal {
            writeln!(f, "{}", row_line(row))?;
        }
        writeln!(f)?;

        writeln!(f, "Optimal Camera Matrix Crop:")?;
        for v in self.crop {
            writeln!(f, "{v}")?;
        }
        writeln!(f)?;

        write!(f, "Re-projection Error:  {}", self.error)?;
        Ok(())
    }

    /// Write the structured JSON report.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let f = File::create(path)?;
        serde_json::to_writer_pretty(f, self).map_err(std::io::Error::from)
    }
}

fn matrix_rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    let mut rows = [[0.0; 3]; 3];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = m[(r, c)];
        }
    }
    rows
}

fn row_line(values: &[f64]) -> String {
    values.iter().map(|&v| sci(v)).collect::<Vec<_>>().join(" ")
}

/// Scientific notation with a signed two-digit exponent, the format
/// the report tables have always used.
fn sci(v: f64) -> String {
    let s = format!("{v:.6E}");
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use opencv::core::Rect;

    fn sample_report() -> CalibrationReport {
        let result = CalibrationResult {
            intrinsic: Matrix3::new(
                1234.5678, 0.0, 640.25, //
                0.0, 1230.1, 360.75, //
                0.0, 0.0, 1.0,
            ),
            distortion: vec![0.1, -0.25, 0.001, -0.0005, 0.0333],
            optimal: Matrix3::new(
                1200.0, 0.0, 644.0, //
                0.0, 1198.5, 355.5, //
                0.0, 0.0, 1.0,
            ),
            crop: Rect::new(12, 9, 1256, 702),
            mean_reprojection_error: 0.04321,
        };
        let grid = CalibrationGrid::new(6, 9, 25.0, crate::grid::PatternKind::Chessboard).unwrap();
        CalibrationReport::new(&grid, &result)
    }

    #[test]
    fn sci_matches_expected_format() {
        assert_eq!(sci(1234.5), "1.234500E+03");
        assert_eq!(sci(-0.00012345), "-1.234500E-04");
        assert_eq!(sci(0.0), "0.000000E+00");
        assert_eq!(sci(1.0), "1.000000E+00");
    }

    #[test]
    fn json_uses_fixed_keys() {
        let report = sample_report();
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();

        for key in ["grid", "time", "intrinsic", "distortion", "optimal", "crop", "error"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["grid"]["rows"], 6);
        assert_eq!(value["grid"]["cols"], 9);
        assert_eq!(value["grid"]["spacing"], 25.0);
        assert_eq!(value["intrinsic"].as_array().unwrap().len(), 3);
        assert_eq!(value["intrinsic"][0].as_array().unwrap().len(), 3);
        assert_eq!(value["crop"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn text_and_json_reports_agree() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("result.txt");
        let json_path = dir.path().join("result.json");
        report.write_text(&text_path).unwrap();
        report.write_json(&json_path).unwrap();

        let parsed: CalibrationReport =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        let text = std::fs::read_to_string(&text_path).unwrap();

        // The text tables round to six fractional digits; parse them
        // back and compare against the JSON values.
        let lines: Vec<&str> = text.lines().collect();
        let intrinsic_start = lines.iter().position(|l| *l == "Intrinsic Matrix:").unwrap() + 1;
        for r in 0..3 {
            for (c, field) in lines[intrinsic_start + r].split_whitespace().enumerate() {
                let v: f64 = field.parse().unwrap();
                assert_relative_eq!(v, parsed.intrinsic[r][c], max_relative = 1e-6);
            }
        }

        assert!(text.ends_with(&format!("Re-projection Error:  {}", parsed.error)));
        assert_eq!(parsed.error, report.error);
    }

    #[test]
    fn error_is_non_negative_in_sample() {
        assert!(sample_report().error >= 0.0);
    }
}

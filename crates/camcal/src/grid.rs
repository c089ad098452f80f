//! Calibration-pattern geometry.

use opencv::core::{Point3f, Size, Vector};
use serde::{Deserialize, Serialize};

use crate::error::CalibError;

/// The kind of printed pattern the detector should look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    Chessboard,
    CircleGrid,
}

/// Physical description of the calibration pattern.
///
/// `rows` and `cols` count inner corners (chessboard) or circle
/// centres per column/row. `spacing` is the centre-to-centre distance
/// in millimetres.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CalibrationGrid {
    pub rows: i32,
    pub cols: i32,
    pub spacing: f64,
    pub kind: PatternKind,
}

impl CalibrationGrid {
    /// Build a grid description, rejecting symmetric layouts.
    pub fn new(rows: i32, cols: i32, spacing: f64, kind: PatternKind) -> Result<Self, CalibError> {
        if rows == cols {
            return Err(CalibError::SymmetricGrid { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            spacing,
            kind,
        })
    }

    /// Pattern size handed to the detector.
    pub fn pattern_size(&self) -> Size {
        Size::new(self.rows, self.cols)
    }

    pub fn point_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// The canonical board-plane point sequence.
    ///
    /// One copy of this sequence is appended to the accumulator for
    /// every accepted image. Points live in the z = 0 plane, the row
    /// index varies fastest, and regeneration from the same grid always
    /// yields the identical sequence.
    pub fn object_points(&self) -> Vector<Point3f> {
        let mut points = Vector::with_capacity(self.point_count());
        for j in 0..self.cols {
            for i in 0..self.rows {
                points.push(Point3f::new(
                    i as f32 * self.spacing as f32,
                    j as f32 * self.spacing as f32,
                    0.0,
                ));
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_symmetric_grid() {
        let err = CalibrationGrid::new(7, 7, 25.0, PatternKind::Chessboard).unwrap_err();
        assert!(matches!(
            err,
            CalibError::SymmetricGrid { rows: 7, cols: 7 }
        ));
    }

    #[test]
    fn object_points_layout_row_index_fastest() {
        let grid = CalibrationGrid::new(2, 3, 10.0, PatternKind::Chessboard).unwrap();
        let pts = grid.object_points();
        assert_eq!(pts.len(), 6);

        let expected = [
            (0.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (0.0, 20.0),
            (10.0, 20.0),
        ];
        for (k, &(x, y)) in expected.iter().enumerate() {
            let p = pts.get(k).unwrap();
            assert_eq!((p.x, p.y, p.z), (x, y, 0.0), "point {k}");
        }
    }

    #[test]
    fn object_points_regeneration_is_idempotent() {
        let grid = CalibrationGrid::new(6, 9, 25.0, PatternKind::Chessboard).unwrap();
        let a = grid.object_points();
        let b = grid.object_points();
        assert_eq!(a.len(), grid.point_count());
        for k in 0..a.len() {
            let (p, q) = (a.get(k).unwrap(), b.get(k).unwrap());
            assert_eq!((p.x, p.y, p.z), (q.x, q.y, q.z));
        }
    }

    #[test]
    fn pattern_size_is_rows_by_cols() {
        let grid = CalibrationGrid::new(6, 9, 25.0, PatternKind::CircleGrid).unwrap();
        let size = grid.pattern_size();
        assert_eq!((size.width, size.height), (6, 9));
    }
}

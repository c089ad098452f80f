//! Run configuration.

use std::path::PathBuf;

use crate::grid::CalibrationGrid;

/// Everything a calibration run needs, resolved before any I/O.
#[derive(Clone, Debug)]
pub struct CalibrationConfig {
    pub grid: CalibrationGrid,
    /// Input image directory, relative to the working directory.
    pub image_dir: String,
    /// Output directory for saved previews and reports.
    pub output_dir: String,
    /// Half side length of the sub-pixel corner search window; the
    /// actual window is `2*window + 1` pixels square.
    pub window: i32,
    pub save: bool,
    pub visualize: bool,
}

impl CalibrationConfig {
    /// Absolute input directory.
    pub fn input_path(&self) -> std::io::Result<PathBuf> {
        Ok(std::env::current_dir()?.join(normalize_component(&self.image_dir)))
    }

    /// Absolute output directory.
    pub fn output_path(&self) -> std::io::Result<PathBuf> {
        Ok(std::env::current_dir()?.join(normalize_component(&self.output_dir)))
    }
}

/// Strip leading and trailing path separators so the component joins
/// cleanly onto the working directory. Both separator styles are
/// stripped regardless of platform.
fn normalize_component(dir: &str) -> &str {
    dir.trim_matches(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_and_trailing_separators() {
        assert_eq!(normalize_component("/images/"), "images");
        assert_eq!(normalize_component("\\images\\"), "images");
        assert_eq!(normalize_component("images"), "images");
        assert_eq!(normalize_component(""), "");
        assert_eq!(normalize_component("/"), "");
    }

    #[test]
    fn interior_separators_are_preserved() {
        assert_eq!(normalize_component("/data/run1/"), "data/run1");
    }
}

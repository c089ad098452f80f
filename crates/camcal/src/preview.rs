//! Live preview windows.
//!
//! All highgui state is owned by [`PreviewWindows`], created at run
//! start and torn down on drop. When previews are disabled every call
//! is a no-op, so the pipeline code does not branch on the flag.

use opencv::core::Mat;
use opencv::highgui;

use crate::grid::PatternKind;

pub const RAW_WINDOW: &str = "Raw Image";
pub const CORNERS_WINDOW: &str = "Image with Corners";
pub const CENTERS_WINDOW: &str = "Image with Centers";
pub const UNDISTORTED_WINDOW: &str = "Undistorted Image";

/// Each shown image pauses the run for this long, or until a key is
/// pressed.
const PREVIEW_DELAY_MS: i32 = 5000;

pub struct PreviewWindows {
    enabled: bool,
    detection_window: &'static str,
}

impl PreviewWindows {
    /// Create the named windows up front when previews are enabled.
    pub fn open(enabled: bool, kind: PatternKind) -> Result<Self, opencv::Error> {
        let detection_window = match kind {
            PatternKind::Chessboard => CORNERS_WINDOW,
            PatternKind::CircleGrid => CENTERS_WINDOW,
        };
        if enabled {
            highgui::named_window(RAW_WINDOW, highgui::WINDOW_NORMAL)?;
            highgui::named_window(detection_window, highgui::WINDOW_NORMAL)?;
            highgui::named_window(UNDISTORTED_WINDOW, highgui::WINDOW_NORMAL)?;
        }
        Ok(Self {
            enabled,
            detection_window,
        })
    }

    pub fn show_raw(&self, img: &Mat) -> Result<(), opencv::Error> {
        self.show(RAW_WINDOW, img)
    }

    pub fn show_detection(&self, img: &Mat) -> Result<(), opencv::Error> {
        self.show(self.detection_window, img)
    }

    pub fn show_undistorted(&self, img: &Mat) -> Result<(), opencv::Error> {
        self.show(UNDISTORTED_WINDOW, img)
    }

    fn show(&self, window: &str, img: &Mat) -> Result<(), opencv::Error> {
        if !self.enabled {
            return Ok(());
        }
        highgui::imshow(window, img)?;
        highgui::wait_key(PREVIEW_DELAY_MS)?;
        Ok(())
    }
}

impl Drop for PreviewWindows {
    fn drop(&mut self) {
        if self.enabled {
            let _ = highgui::destroy_all_windows();
        }
    }
}

use std::path::PathBuf;

/// Errors that abort a calibration run.
///
/// Per-image problems (an entry that does not decode, a pattern the
/// detector misses) are not represented here: they are logged and
/// skipped inside the detection loop.
#[derive(thiserror::Error, Debug)]
pub enum CalibError {
    #[error("rows and cols must differ (got {rows}x{cols}); a symmetric grid leaves the board pose ambiguous under 180-degree rotation")]
    SymmetricGrid { rows: i32, cols: i32 },

    #[error("found no calibratable images in {} ({scanned} directory entries scanned)", dir.display())]
    InsufficientData { dir: PathBuf, scanned: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Vision(#[from] opencv::Error),
}

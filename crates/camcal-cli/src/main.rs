//! `camcal` command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use camcal::{CalibrationConfig, CalibrationGrid, PatternKind};

#[derive(Parser, Debug)]
#[command(
    name = "camcal",
    version,
    about = "Calibrate a camera from a folder of calibration-pattern images",
    long_about = "Calibrates a camera from images stored in a folder. Images should show \
a grid of black and white squares (or a circle grid with --circles); a white border around \
the pattern helps, and the number of rows and columns must differ. Put the calibration \
images in a folder and point --dir at it. For best results provide at least ten images in \
which the whole pattern is visible."
)]
struct Args {
    /// Directory of images to calibrate from, relative to the working
    /// directory.
    #[arg(long, default_value = "")]
    dir: String,

    /// Grid spacing in millimetres.
    #[arg(short, long)]
    spacing: f64,

    /// Number of inner corners horizontally.
    #[arg(short, long)]
    columns: i32,

    /// Number of inner corners vertically.
    #[arg(short, long)]
    rows: i32,

    /// Half side length of the sub-pixel corner search window; the
    /// window is (2w+1) x (2w+1) pixels.
    #[arg(short, long, default_value_t = 11)]
    window: i32,

    /// Save annotated detections, undistorted images and reports.
    #[arg(long)]
    save: bool,

    /// Where to save output, relative to the working directory.
    #[arg(long, default_value = "output")]
    outdir: String,

    /// Show live previews while processing.
    #[arg(short, long)]
    visualize: bool,

    /// Look for a circle grid instead of a chessboard.
    #[arg(long)]
    circles: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if camcal::logger::init_with_level(LevelFilter::Info).is_err() {
        eprintln!("failed to install logger");
    }

    let kind = if args.circles {
        PatternKind::CircleGrid
    } else {
        PatternKind::Chessboard
    };
    let grid = match CalibrationGrid::new(args.rows, args.columns, args.spacing, kind) {
        Ok(grid) => grid,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let cfg = CalibrationConfig {
        grid,
        image_dir: args.dir,
        output_dir: args.outdir,
        window: args.window,
        save: args.save,
        visualize: args.visualize,
    };

    if let Err(err) = camcal::run(&cfg) {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

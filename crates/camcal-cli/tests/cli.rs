use assert_cmd::Command;
use predicates::prelude::*;

fn camcal() -> Command {
    Command::cargo_bin("camcal").expect("binary builds")
}

#[test]
fn requires_grid_arguments() {
    camcal().assert().failure();
}

#[test]
fn help_lists_canonical_flags() {
    camcal()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--spacing")
                .and(predicate::str::contains("--columns"))
                .and(predicate::str::contains("--rows"))
                .and(predicate::str::contains("--window"))
                .and(predicate::str::contains("--outdir"))
                .and(predicate::str::contains("--circles"))
                .and(predicate::str::contains("--visualize")),
        );
}

#[test]
fn rejects_symmetric_grid_before_reading_images() {
    let dir = tempfile::tempdir().unwrap();
    camcal()
        .current_dir(dir.path())
        .args(["-s", "25.0", "-c", "7", "-r", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rows and cols must differ"));
    // Nothing was scanned or written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn aborts_when_no_images_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    camcal()
        .current_dir(dir.path())
        .args(["-s", "25.0", "-c", "9", "-r", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("found no calibratable images"));
}

#[test]
fn save_flag_does_not_rescue_an_empty_run() {
    let dir = tempfile::tempdir().unwrap();
    camcal()
        .current_dir(dir.path())
        .args(["-s", "25.0", "-c", "9", "-r", "6", "--save"])
        .assert()
        .failure();
    // The run aborted before calibration, so no reports exist.
    assert!(!dir.path().join("output/result.txt").exists());
    assert!(!dir.path().join("output/result.json").exists());
}

#[test]
fn fails_when_directory_missing() {
    let dir = tempfile::tempdir().unwrap();
    camcal()
        .current_dir(dir.path())
        .args(["--dir", "no-such-dir", "-s", "25.0", "-c", "9", "-r", "6"])
        .assert()
        .failure();
}

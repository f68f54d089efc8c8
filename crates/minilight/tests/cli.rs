//! End-to-end tests over the compiled binary.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn minilight() -> Command {
    Command::new(env!("CARGO_BIN_EXE_minilight"))
}

fn temp_model(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, content).unwrap();
    path
}

const EMPTY_SCENE: &str = "#MiniLight\n\
    1\n\
    8 6\n\
    (0 0 0) (0 0 1) 45\n\
    (1 1 1) (1 1 1)\n";

const TWO_TRIANGLES: &str = "#MiniLight\n\
    2\n\
    8 6\n\
    (0 0.75 -2) (0 0 1) 45\n\
    (0.8 0.9 1) (0.9 0.8 0.7)\n\
    (0 0 0) (4 0 0) (0 4 0) (0.7 0.7 0.7) (0 0 0)\n\
    (0 1 1) (1 1 1) (0 2 1) (0 0 0) (50 50 50)\n";

#[test]
fn test_empty_scene_gives_constant_gray_ppm() {
    let model = temp_model("minilight_empty.ml", EMPTY_SCENE);
    let status = minilight().arg(&model).status().unwrap();
    assert!(status.success());

    let ppm = fs::read(format!("{}.ppm", model.display())).unwrap();
    assert!(ppm.starts_with(b"P6\n"));
    // Body of an all-background frame is one repeated byte
    let body = &ppm[ppm.len() - 8 * 6 * 3..];
    assert!(body.iter().all(|&byte| byte == body[0]));
    assert!(body[0] > 0);
}

#[test]
fn test_output_is_deterministic() {
    let first = temp_model("minilight_det_a.ml", TWO_TRIANGLES);
    let second = temp_model("minilight_det_b.ml", TWO_TRIANGLES);

    assert!(minilight().arg(&first).status().unwrap().success());
    assert!(minilight().arg(&second).status().unwrap().success());

    let a = fs::read(format!("{}.ppm", first.display())).unwrap();
    let b = fs::read(format!("{}.ppm", second.display())).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_finished_notice_on_stdout() {
    let model = temp_model("minilight_notice.ml", EMPTY_SCENE);
    let output = minilight().arg(&model).output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("iteration: 1"));
    assert!(stdout.ends_with("finished\n"));
}

#[test]
fn test_missing_model_fails_with_one_line_message() {
    let output = minilight().arg("/no/such/model.ml").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.trim_end().lines().count(), 1, "stderr: {stderr:?}");
}

#[test]
fn test_malformed_model_fails_with_one_line_message() {
    let model = temp_model("minilight_bad.ml", "#WrongMagic\n1\n8 6\n");
    let output = minilight().arg(&model).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed") || stderr.contains("MiniLight"));
    assert_eq!(stderr.trim_end().lines().count(), 1, "stderr: {stderr:?}");
}

#[test]
fn test_help_flags_exit_zero() {
    for flag in ["--help", "-?"] {
        let output = minilight().arg(flag).output().unwrap();
        assert!(output.status.success(), "{flag} should exit 0");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("minilight"));
    }
}

#[test]
fn test_no_arguments_fails() {
    let output = minilight().output().unwrap();
    assert!(!output.status.success());
}

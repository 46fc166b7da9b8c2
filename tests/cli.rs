//! Runs the `upright` binary against a temporary directory.

use image::{GenericImageView, ImageEncoder, RgbImage};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn upright(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_upright"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn gen_config_prints_stock_toml() {
    let tmp = TempDir::new().unwrap();
    let out = upright(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("max_width = 4000"));
    assert!(stdout.contains("[processing]"));
}

#[test]
fn resize_writes_scaled_files_and_copies_others() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("photos");
    fs::create_dir_all(&input).unwrap();
    write_jpeg(&input.join("wide.jpg"), 300, 100);
    fs::write(input.join("notes.txt"), "keep me").unwrap();

    let out = upright(
        tmp.path(),
        &["resize", "photos", "--out-dir", "out", "--max-width", "150"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let resized = image::open(tmp.path().join("out/wide.jpg")).unwrap();
    assert_eq!(resized.dimensions(), (150, 50));
    assert_eq!(
        fs::read_to_string(tmp.path().join("out/notes.txt")).unwrap(),
        "keep me"
    );

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Resized 1 image, skipped 1 file"));
}

#[test]
fn config_file_in_working_directory_is_used() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("tall.jpg"), 100, 400);
    fs::write(tmp.path().join("upright.toml"), "max_height = 200\n").unwrap();

    let out = upright(tmp.path(), &["resize", "tall.jpg", "--out-dir", "out"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let resized = image::open(tmp.path().join("out/tall.jpg")).unwrap();
    assert_eq!(resized.dimensions(), (50, 200));
}

#[test]
fn invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 10, 10);
    fs::write(tmp.path().join("upright.toml"), "max_widht = 10\n").unwrap();

    let out = upright(tmp.path(), &["resize", "a.jpg"]);
    assert!(!out.status.success());
}

#[test]
fn missing_explicit_config_fails() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 400, 100);

    let out = upright(
        tmp.path(),
        &["--config", "typo.toml", "resize", "a.jpg", "--out-dir", "out"],
    );
    assert!(!out.status.success());
    assert!(!tmp.path().join("out/a.jpg").exists());
}

#[test]
fn explicit_config_file_is_used() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 400, 100);
    fs::write(tmp.path().join("small.toml"), "max_width = 100\n").unwrap();

    let out = upright(
        tmp.path(),
        &["--config", "small.toml", "resize", "a.jpg", "--out-dir", "out"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let resized = image::open(tmp.path().join("out/a.jpg")).unwrap();
    assert_eq!(resized.dimensions(), (100, 25));
}

#[test]
fn colliding_output_names_fail_without_writing() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("a")).unwrap();
    fs::create_dir_all(tmp.path().join("b")).unwrap();
    fs::write(tmp.path().join("a/n.txt"), "first").unwrap();
    fs::write(tmp.path().join("b/n.txt"), "second").unwrap();

    let out = upright(
        tmp.path(),
        &["resize", "a/n.txt", "b/n.txt", "--out-dir", "out"],
    );
    assert!(!out.status.success());
    assert!(!tmp.path().join("out/n.txt").exists());
}

#[test]
fn inspect_json_reports_plan() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 80, 40);

    let out = upright(
        tmp.path(),
        &["inspect", "a.jpg", "--json", "--max-width", "40"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let reports: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let report = &reports[0];
    assert_eq!(report["name"], "a.jpg");
    // Encoder output carries no Exif segment
    assert_eq!(report["orientation"], serde_json::Value::Null);
    assert_eq!(report["source"]["width"], 80);
    assert_eq!(report["plan"]["canvas_width"], 40);
    assert_eq!(report["plan"]["canvas_height"], 20);
}

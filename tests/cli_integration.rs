//! CLI integration tests
//!
//! Runs the real binary against generated images in temporary directories.

#![cfg(feature = "cli")]

mod common;

use common::{encode, framed_square, BLUE, RED};
use image::ImageFormat;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bgremove-heuristic"))
}

fn write_png(path: &Path) {
    std::fs::write(
        path,
        encode(40, 40, framed_square(40, 10, BLUE, RED), ImageFormat::Png),
    )
    .unwrap();
}

#[test]
fn test_single_file_default_output_name() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("shoe.png");
    write_png(&input);

    let output = cli().arg(&input).output().expect("Failed to execute CLI");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let result = image::open(temp_dir.path().join("shoe_bg_removed.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(result.get_pixel(0, 0)[3], 0);
    assert_eq!(result.get_pixel(20, 20)[3], 255);
}

#[test]
fn test_batch_processes_in_alphanumerical_order() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");
    let mask_dir = temp_dir.path().join("masks");
    std::fs::create_dir(&input_dir).unwrap();

    let names = ["z_last", "a_first", "img10", "img2", "img1"];
    for name in names {
        write_png(&input_dir.join(format!("{name}.png")));
    }
    std::fs::write(input_dir.join("notes.txt"), b"not an image").unwrap();

    let output = cli()
        .arg(&input_dir)
        .arg("-o")
        .arg(&output_dir)
        .arg("-f")
        .arg("tiff")
        .arg("--mask")
        .arg(&mask_dir)
        .arg("--progress")
        .output()
        .expect("Failed to execute CLI");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");

    for name in names {
        assert!(output_dir.join(format!("{name}_bg_removed.tiff")).is_file());
        assert!(mask_dir.join(format!("{name}_mask.png")).is_file());
    }
    assert!(!output_dir.join("notes_bg_removed.tiff").exists());

    let expected = ["a_first", "img1", "img10", "img2", "z_last"];
    let positions: Vec<usize> = expected
        .iter()
        .map(|name| {
            stderr
                .find(&format!("breakdown for {}", input_dir.join(format!("{name}.png")).display()))
                .unwrap_or_else(|| panic!("{name} missing from log:\n{stderr}"))
        })
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{positions:?}");
}

#[test]
fn test_stdin_to_stdout() {
    let mut child = cli()
        .arg("-")
        .arg("-f")
        .arg("rgba8")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    let input = encode(40, 40, framed_square(40, 10, BLUE, RED), ImageFormat::Png);
    child.stdin.take().unwrap().write_all(&input).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(output.stdout.len(), 40 * 40 * 4);
    assert_eq!(output.stdout[3], 0);
    let center = (20 * 40 + 20) * 4;
    assert_eq!(&output.stdout[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn test_invalid_arguments_fail() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("x.png");
    write_png(&input);

    let status = cli()
        .arg(&input)
        .arg("--jpeg-quality")
        .arg("150")
        .output()
        .unwrap()
        .status;
    assert!(!status.success());

    let status = cli()
        .arg(&input)
        .arg("--background-color")
        .arg("not-a-color")
        .output()
        .unwrap()
        .status;
    assert!(!status.success());

    let status = cli()
        .arg(temp_dir.path().join("missing.png"))
        .output()
        .unwrap()
        .status;
    assert!(!status.success());
}

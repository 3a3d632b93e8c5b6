//! Build script for wristlcd-firmware
//!
//! - Passes the defmt linker script through
//! - Locates the panel controller image and stages it in OUT_DIR

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the image location
const IMAGE_ENV: &str = "WRISTLCD_FPGA_IMAGE";

/// Default image location, relative to this crate
const IMAGE_DEFAULT: &str = "fpga/panel.bin";

fn main() {
    setup_linker();
    stage_image();
}

/// Linker arguments; memory.x comes from embassy-stm32's `memory-x` feature
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Copy the controller image to OUT_DIR/panel.bin
///
/// An explicit `WRISTLCD_FPGA_IMAGE` that does not exist is a hard error.
/// A missing default image only warns: the firmware still builds and the
/// display comes up in its degraded bootloader mode.
fn stage_image() {
    println!("cargo:rerun-if-env-changed={}", IMAGE_ENV);
    println!("cargo:rerun-if-changed={}", IMAGE_DEFAULT);

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let staged = out_dir.join("panel.bin");

    let source = match env::var(IMAGE_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                panic!(
                    "\n\
                    ╔══════════════════════════════════════════════════════════════════╗\n\
                    ║  ERROR: panel controller image not found!                        ║\n\
                    ║                                                                  ║\n\
                    ║  {} points at a file that does not exist:        ║\n\
                    ║  {:<64}║\n\
                    ╚══════════════════════════════════════════════════════════════════╝\n",
                    IMAGE_ENV,
                    path.display().to_string()
                );
            }
            println!("cargo:rerun-if-changed={}", path.display());
            Some(path)
        }
        Err(_) => {
            let path = Path::new(IMAGE_DEFAULT);
            path.exists().then(|| path.to_path_buf())
        }
    };

    match source {
        Some(path) => {
            let image = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    panic!(
                        "\n\
                        ╔══════════════════════════════════════════════════════════════════╗\n\
                        ║  ERROR: Failed to read panel controller image                    ║\n\
                        ║                                                                  ║\n\
                        ║  Error: {:<56} ║\n\
                        ╚══════════════════════════════════════════════════════════════════╝\n",
                        e
                    );
                }
            };
            if image.is_empty() {
                println!("cargo:warning={} is empty", path.display());
            }
            fs::write(&staged, image).expect("write staged image");
        }
        None => {
            println!(
                "cargo:warning=No panel controller image ({} unset, {} missing); \
                 building with an empty image",
                IMAGE_ENV, IMAGE_DEFAULT
            );
            fs::write(&staged, []).expect("write empty image");
        }
    }
}

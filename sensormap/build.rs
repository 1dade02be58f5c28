// sensormap/build.rs

use std::{env, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-env-changed=SENSORMAP_BUILD_UI");
    println!("cargo:rerun-if-changed=../sensormap-ui/src");
    println!("cargo:rerun-if-changed=../sensormap-ui/static/index.html");
    println!("cargo:rerun-if-changed=../sensormap-ui/static/styles/sensormap.css");
    println!("cargo:rerun-if-changed=../sensormap-ui/static/icons");

    // The wasm bundle is only rebuilt on request; without it the host still
    // serves index.html, styles and icons.
    if env::var_os("SENSORMAP_BUILD_UI").is_none() {
        println!("cargo:warning=SENSORMAP_BUILD_UI not set, embedding sensormap-ui/static as is");
        return;
    }

    // 1) Get the crate root as a PathBuf
    let manifest = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let crate_root = PathBuf::from(&manifest);

    // 2) Compute the UI directory (sibling of sensormap/)
    let ui_dir = crate_root
        .parent()
        .expect("sensormap has no parent directory")
        .join("sensormap-ui");

    // 3) Build the UI via wasm-pack into static/pkg, which rust-embed picks up
    let status = Command::new("wasm-pack")
        .env("CARGO_TARGET_DIR", "../target/target-wasm")
        .args([
            "build",
            ".",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .current_dir(&ui_dir)
        .status()
        .expect("failed to run wasm-pack");
    if !status.success() {
        panic!("wasm-pack build failed");
    }
}

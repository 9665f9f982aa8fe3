use std::path::Path;
use syringe_core::driver::run;
use syringe_core::manifest::Manifest;
use syringe_util::constants::SYRINGE_MANIFEST_FILE_NAME;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let manifest_dir = Path::new(&manifest_dir);
    let manifest_path = manifest_dir.join(SYRINGE_MANIFEST_FILE_NAME);
    println!("cargo:rerun-if-changed={}", manifest_path.display());
    println!("cargo:rerun-if-changed={}", manifest_dir.join("assets").display());

    let manifest = Manifest::read(&manifest_path).unwrap_or_else(|e| panic!("{e}"));
    let raw = manifest
        .into_raw_config(manifest_dir)
        .unwrap_or_else(|e| panic!("{e}"));
    let config = raw.build().unwrap_or_else(|e| panic!("{e}"));
    let output = run(&config).unwrap_or_else(|e| panic!("{e}"));

    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_dir = Path::new(&out_dir);
    std::fs::write(out_dir.join("assets.rs"), output.source).unwrap();
}

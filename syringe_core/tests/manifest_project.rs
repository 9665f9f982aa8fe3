use std::path::PathBuf;
use syringe_core::config::{RawConfig, Target};
use syringe_core::driver::run;
use syringe_core::manifest::Manifest;
use syringe_util::constants::SYRINGE_MANIFEST_FILE_NAME;

fn write(path: PathBuf, content: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn manifest_project_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root.join("assets/readme.txt"), b"hello\n");
    write(root.join("assets/icons/b.svg"), b"<svg/>");
    write(root.join("assets/icons/a.svg"), b"<svg/>");
    write(root.join("extra.bin"), &[0, 1, 2]);
    write(
        root.join(SYRINGE_MANIFEST_FILE_NAME),
        br#"
variable = "assets::FILES"
prefix = "res/"
relative = "assets"
files = ["assets/readme.txt"]
directories = ["assets/icons"]
"#,
    );

    let manifest_path = root.join(SYRINGE_MANIFEST_FILE_NAME);
    let manifest = Manifest::read(&manifest_path).unwrap();
    let base = manifest.into_raw_config(root).unwrap();

    // the command line overrides the target and appends a file
    let cli = RawConfig {
        files: vec![root.join("assets/readme.txt"), root.join("assets/icons/a.svg")],
        target: Some(Target::Cpp),
        ..RawConfig::default()
    };
    let config = cli.overriding(base).build().unwrap();

    let names = config
        .inputs
        .iter()
        .map(|input| input.display_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["res/readme.txt", "res/icons/a.svg", "res/icons/b.svg"]);
    assert_eq!(config.target, Target::Cpp);

    let output = run(&config).unwrap();
    assert_eq!(output.stats.usage_count, 3);
    assert_eq!(output.stats.definition_count, 2);
    assert!(output.source.contains("namespace assets {"));
    assert!(output.source.contains("constexpr auto FILES = []() {"));
    assert!(output.source.contains("registry[\"res/icons/a.svg\"] = ::syringe::_"));
    assert!(output.source.contains("_5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"));
}

#[test]
fn manifest_with_file_outside_relative_base() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root.join("inside/a.txt"), b"a");
    write(root.join("outside.txt"), b"b");

    let manifest = Manifest::from_toml("relative = \"inside\"\nfiles = [\"inside/a.txt\", \"outside.txt\"]").unwrap();
    let raw = manifest.into_raw_config(root).unwrap();
    assert!(raw.build().is_err());
}

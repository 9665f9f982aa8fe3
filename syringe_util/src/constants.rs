#[macro_export]
macro_rules! syringe_manifest_file_name_macro {
    () => {
        "syringe.toml"
    };
}

pub const SYRINGE_TOOL_NAME: &str = "syringe";
pub const SYRINGE_MANIFEST_FILE_NAME: &str = syringe_manifest_file_name_macro!();
pub const SYRINGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Variable name used for the generated registry when the user does not pick one.
pub const DEFAULT_VARIABLE_NAME: &str = "resources";

use crate::compile::ResourceInput;
use crate::throw;
use crate::util::data::IndexMapExt;
use crate::validate::{identifier, Validator};
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use path_clean::PathClean;
use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use syringe_util::constants::DEFAULT_VARIABLE_NAME;
use syringe_util::io::{IoErrorExt, IoErrorWithPath};

/// Separator between namespace segments and the variable name, in both Rust and C++.
pub const SCOPE_SEPARATOR: &str = "::";

/// Name of the module or namespace holding the generated support code, which user code must not shadow.
pub const SUPPORT_MODULE_NAME: &str = "syringe";

/// Everything a single run needs, built once up front and then passed down explicitly.
#[derive(Debug, Clone)]
pub struct SyringeConfig {
    pub inputs: Vec<ResourceInput>,
    pub variable: VariableName,
    pub target: Target,
    pub thread_count: NonZeroUsize,
}

/// Unvalidated settings, as collected from the command line or a manifest.
#[derive(Debug, Default, Clone)]
pub struct RawConfig {
    pub files: Vec<PathBuf>,
    pub variable: Option<String>,
    pub target: Option<Target>,
    pub prefix: Option<String>,
    pub relative: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub thread_count: Option<NonZeroUsize>,
}

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Rust,
    Cpp,
}

/// Possibly namespaced name of the generated registry, for example `assets::RESOURCES`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VariableName {
    pub namespace: Vec<String>,
    pub name: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidIdentifier { name: String, reason: String },
    NoInputs,
    NotUnderBase { path: PathBuf, base: PathBuf },
    NonUtf8Path(PathBuf),
    Io(IoErrorWithPath),
}

lazy_static! {
    static ref RUST_KEYWORDS: IndexSet<&'static str> = parse_keywords(include_str!("keywords/rust.txt"));
    static ref CPP_KEYWORDS: IndexSet<&'static str> = parse_keywords(include_str!("keywords/cpp.txt"));
}

fn parse_keywords(src: &'static str) -> IndexSet<&'static str> {
    src.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
}

impl RawConfig {
    /// Combine with a lower priority `base`: settings missing here are taken from `base`,
    /// and the files of `base` come before the files listed here.
    pub fn overriding(self, base: RawConfig) -> RawConfig {
        let RawConfig {
            files,
            variable,
            target,
            prefix,
            relative,
            output,
            thread_count,
        } = self;

        let mut all_files = base.files;
        all_files.extend(files);

        RawConfig {
            files: all_files,
            variable: variable.or(base.variable),
            target: target.or(base.target),
            prefix: prefix.or(base.prefix),
            relative: relative.or(base.relative),
            output: output.or(base.output),
            thread_count: thread_count.or(base.thread_count),
        }
    }

    /// Validate everything and compute the display names, without reading any file contents.
    pub fn build(&self) -> Result<SyringeConfig, ConfigError> {
        let target = self.target.unwrap_or_default();
        let variable = match &self.variable {
            None => VariableName::default_name(),
            Some(variable) => VariableName::parse(variable, target)?,
        };

        if self.files.is_empty() {
            throw!(ConfigError::NoInputs);
        }

        let prefix = self.prefix.as_deref().unwrap_or("");
        let mut seen = IndexMap::new();
        let mut inputs = vec![];
        for path in &self.files {
            if !seen.insert_if_absent(path.clean(), ()) {
                log::debug!("skipping repeated input {path:?}");
                continue;
            }
            let display_name = display_name(path, self.relative.as_deref(), prefix)?;
            inputs.push(ResourceInput {
                source: path.clone(),
                display_name,
            });
        }

        Ok(SyringeConfig {
            inputs,
            variable,
            target,
            thread_count: self.thread_count.unwrap_or(NonZeroUsize::MIN),
        })
    }
}

impl Target {
    pub fn keywords(self) -> &'static IndexSet<&'static str> {
        match self {
            Target::Rust => &RUST_KEYWORDS,
            Target::Cpp => &CPP_KEYWORDS,
        }
    }

    /// Names the generated code itself needs at the outermost scope.
    pub fn reserved_top_level(self) -> &'static [&'static str] {
        match self {
            Target::Rust => &[SUPPORT_MODULE_NAME],
            Target::Cpp => &[SUPPORT_MODULE_NAME, "std"],
        }
    }

    pub fn language_name(self) -> &'static str {
        match self {
            Target::Rust => "Rust",
            Target::Cpp => "C++",
        }
    }
}

impl VariableName {
    /// Split `full` on its last scope separator into namespace and variable name, and validate every part.
    pub fn parse(full: &str, target: Target) -> Result<VariableName, ConfigError> {
        let (namespace, name) = match full.rfind(SCOPE_SEPARATOR) {
            None => (vec![], full.to_owned()),
            Some(split) => {
                let namespace: Vec<String> = full[..split].split(SCOPE_SEPARATOR).map(str::to_owned).collect();
                (namespace, full[split + SCOPE_SEPARATOR.len()..].to_owned())
            }
        };

        let validator = identifier(target);
        for part in namespace.iter().chain(std::iter::once(&name)) {
            validator
                .validate(part)
                .map_err(|reason| ConfigError::InvalidIdentifier {
                    name: full.to_owned(),
                    reason,
                })?;
        }

        // in C++ the variable itself lives at global scope when there is no namespace
        let top_level = match target {
            Target::Rust => namespace.first(),
            Target::Cpp => Some(namespace.first().unwrap_or(&name)),
        };
        if let Some(top_level) = top_level {
            if target.reserved_top_level().contains(&top_level.as_str()) {
                return Err(ConfigError::InvalidIdentifier {
                    name: full.to_owned(),
                    reason: format!(
                        "the top-level name {top_level:?} is reserved in generated {} code",
                        target.language_name()
                    ),
                });
            }
        }

        Ok(VariableName { namespace, name })
    }

    pub fn default_name() -> VariableName {
        VariableName {
            namespace: vec![],
            name: DEFAULT_VARIABLE_NAME.to_owned(),
        }
    }
}

impl Display for VariableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for segment in &self.namespace {
            write!(f, "{segment}{SCOPE_SEPARATOR}")?;
        }
        f.write_str(&self.name)
    }
}

/// Compute the name a file is registered under.
///
/// With `relative_to`, the name is the path relative to that (canonicalized) directory,
/// and files outside of it are an error. Otherwise the path is used as given.
/// In both cases the prefix is prepended and backslashes become forward slashes,
/// so the names are the same on every platform.
pub fn display_name(path: &Path, relative_to: Option<&Path>, prefix: &str) -> Result<String, ConfigError> {
    let name = match relative_to {
        None => path_to_str(path)?.to_owned(),
        Some(base) => {
            let relative = relative_canonical(path, base)?;
            path_to_str(&relative)?.to_owned()
        }
    };

    let mut result = prefix.to_owned();
    result.push_str(&name);
    Ok(result.replace('\\', "/"))
}

/// Canonicalize both paths and strip `base` from `path`.
pub fn relative_canonical(path: &Path, base: &Path) -> Result<PathBuf, ConfigError> {
    let canonical_path = std::fs::canonicalize(path).map_err(|e| ConfigError::Io(e.with_path(path.to_owned())))?;
    let canonical_base = std::fs::canonicalize(base).map_err(|e| ConfigError::Io(e.with_path(base.to_owned())))?;

    match canonical_path.strip_prefix(&canonical_base) {
        Ok(relative) => Ok(relative.to_owned()),
        Err(_) => Err(ConfigError::NotUnderBase {
            path: path.to_owned(),
            base: base.to_owned(),
        }),
    }
}

fn path_to_str(path: &Path) -> Result<&str, ConfigError> {
    path.to_str().ok_or_else(|| ConfigError::NonUtf8Path(path.to_owned()))
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidIdentifier { name, reason } => write!(f, "invalid variable name {name:?}: {reason}"),
            ConfigError::NoInputs => write!(f, "no input files given"),
            ConfigError::NotUnderBase { path, base } => write!(f, "{base:?} is not a base dir of {path:?}"),
            ConfigError::NonUtf8Path(path) => write!(f, "path {path:?} is not valid UTF-8"),
            ConfigError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<IoErrorWithPath> for ConfigError {
    fn from(value: IoErrorWithPath) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{display_name, ConfigError, RawConfig, Target, VariableName};
    use std::num::NonZeroUsize;
    use std::path::{Path, PathBuf};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn variable_plain() {
        let v = VariableName::parse("resources", Target::Rust).unwrap();
        assert!(v.namespace.is_empty());
        assert_eq!(v.name, "resources");
        assert_eq!(v, VariableName::default_name());
    }

    #[test]
    fn variable_namespaced() {
        let v = VariableName::parse("my_namespace::nested::assets", Target::Cpp).unwrap();
        assert_eq!(v.namespace, vec!["my_namespace".to_owned(), "nested".to_owned()]);
        assert_eq!(v.name, "assets");
        assert_eq!(v.to_string(), "my_namespace::nested::assets");
    }

    #[test]
    fn variable_invalid() {
        for target in Target::iter() {
            for bad in ["", "ns::", "::data", "a::::b", "1a", "a-b::c", "a:b"] {
                let result = VariableName::parse(bad, target);
                assert!(
                    matches!(result, Err(ConfigError::InvalidIdentifier { .. })),
                    "{bad:?} should be rejected for {target}"
                );
            }
        }
    }

    #[test]
    fn variable_keyword() {
        assert!(VariableName::parse("static", Target::Rust).is_err());
        assert!(VariableName::parse("ns::class", Target::Cpp).is_err());
        assert!(VariableName::parse("class", Target::Rust).is_ok());
    }

    #[test]
    fn variable_support_module_reserved() {
        assert!(VariableName::parse("syringe::data", Target::Rust).is_err());
        assert!(VariableName::parse("outer::syringe::data", Target::Rust).is_ok());
        assert!(VariableName::parse("std::data", Target::Rust).is_ok());
        assert!(VariableName::parse("syringe", Target::Rust).is_ok());
    }

    #[test]
    fn variable_cpp_global_names_reserved() {
        for bad in ["syringe", "std", "syringe::data", "std::data", "std::inner::data"] {
            let result = VariableName::parse(bad, Target::Cpp);
            assert!(
                matches!(result, Err(ConfigError::InvalidIdentifier { .. })),
                "{bad:?} should be rejected for C++"
            );
        }
        for good in ["foo::syringe::data", "foo::std::data", "outer::syringe", "syringe_data", "stdlib::data"] {
            assert!(VariableName::parse(good, Target::Cpp).is_ok(), "{good:?} should be accepted for C++");
        }
    }

    #[test]
    fn target_names() {
        assert_eq!(Target::from_str("rust").unwrap(), Target::Rust);
        assert_eq!(Target::from_str("cpp").unwrap(), Target::Cpp);
        assert!(Target::from_str("verilog").is_err());
        assert_eq!(Target::Cpp.to_string(), "cpp");
        assert_eq!(Target::default(), Target::Rust);
    }

    #[test]
    fn display_name_plain() {
        let name = display_name(Path::new("data\\icons\\a.png"), None, "").unwrap();
        assert_eq!(name, "data/icons/a.png");

        let name = display_name(Path::new("a.txt"), None, "assets/").unwrap();
        assert_eq!(name, "assets/a.txt");
    }

    #[test]
    fn display_name_relative() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let file = sub.join("x.bin");
        std::fs::write(&file, b"x").unwrap();

        let name = display_name(&file, Some(dir.path()), "").unwrap();
        assert_eq!(name, "sub/x.bin");

        let name = display_name(&file, Some(&sub), "p/").unwrap();
        assert_eq!(name, "p/x.bin");
    }

    #[test]
    fn display_name_outside_base() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();
        let file = a.join("x.bin");
        std::fs::write(&file, b"x").unwrap();

        let result = display_name(&file, Some(&b), "");
        assert!(matches!(result, Err(ConfigError::NotUnderBase { .. })));
    }

    #[test]
    fn raw_config_override() {
        let cli = RawConfig {
            files: vec![PathBuf::from("cli.txt")],
            variable: Some("cli_var".to_owned()),
            ..RawConfig::default()
        };
        let manifest = RawConfig {
            files: vec![PathBuf::from("manifest.txt")],
            variable: Some("manifest_var".to_owned()),
            target: Some(Target::Cpp),
            ..RawConfig::default()
        };

        let merged = cli.overriding(manifest);
        assert_eq!(merged.files, vec![PathBuf::from("manifest.txt"), PathBuf::from("cli.txt")]);
        assert_eq!(merged.variable.as_deref(), Some("cli_var"));
        assert_eq!(merged.target, Some(Target::Cpp));
        assert_eq!(merged.prefix, None);
    }

    #[test]
    fn raw_config_build() {
        let raw = RawConfig {
            files: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt"), PathBuf::from("./a.txt")],
            variable: Some("assets::DATA".to_owned()),
            prefix: Some("res/".to_owned()),
            thread_count: NonZeroUsize::new(3),
            ..RawConfig::default()
        };

        let config = raw.build().unwrap();
        let names = config.inputs.iter().map(|input| input.display_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["res/a.txt", "res/b.txt"]);
        assert_eq!(config.variable.to_string(), "assets::DATA");
        assert_eq!(config.target, Target::Rust);
        assert_eq!(config.thread_count.get(), 3);
    }

    #[test]
    fn raw_config_rejects_before_reading() {
        let raw = RawConfig {
            files: vec![PathBuf::from("does/not/exist.bin")],
            variable: Some("fn".to_owned()),
            ..RawConfig::default()
        };
        assert!(matches!(raw.build(), Err(ConfigError::InvalidIdentifier { .. })));

        let raw = RawConfig::default();
        assert!(matches!(raw.build(), Err(ConfigError::NoInputs)));
    }
}

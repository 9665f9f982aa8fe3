use crate::config::Target;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// A check on a user-provided string.
///
/// On rejection, the error is a human-readable description of the problem.
pub trait Validator {
    fn validate(&self, candidate: &str) -> Result<(), String>;

    /// Combine two validators, the second one only runs if the first one accepts the candidate.
    fn and<V: Validator>(self, other: V) -> And<Self, V>
    where
        Self: Sized,
    {
        And(self, other)
    }
}

impl<F: Fn(&str) -> Result<(), String>> Validator for F {
    fn validate(&self, candidate: &str) -> Result<(), String> {
        self(candidate)
    }
}

pub struct And<A, B>(A, B);

impl<A: Validator, B: Validator> Validator for And<A, B> {
    fn validate(&self, candidate: &str) -> Result<(), String> {
        self.0.validate(candidate)?;
        self.1.validate(candidate)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PathKind {
    Nonexistent,
    File,
    Directory,
}

/// Classify a path. Anything that exists and is not a directory counts as a file,
/// including symlinks to files, devices and pipes.
pub fn path_kind(path: &Path) -> PathKind {
    match std::fs::metadata(path) {
        Err(_) => PathKind::Nonexistent,
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        Ok(_) => PathKind::File,
    }
}

pub fn existing_file(candidate: &str) -> Result<(), String> {
    match path_kind(Path::new(candidate)) {
        PathKind::Nonexistent => Err(format!("File does not exist: {candidate}")),
        PathKind::Directory => Err(format!("File is actually a directory: {candidate}")),
        PathKind::File => Ok(()),
    }
}

pub fn existing_directory(candidate: &str) -> Result<(), String> {
    match path_kind(Path::new(candidate)) {
        PathKind::Nonexistent => Err(format!("Directory does not exist: {candidate}")),
        PathKind::File => Err(format!("Directory is actually a file: {candidate}")),
        PathKind::Directory => Ok(()),
    }
}

lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Plain identifier syntax, shared by all targets.
pub fn identifier_syntax(candidate: &str) -> Result<(), String> {
    if candidate.is_empty() {
        Err("identifier is empty".to_owned())
    } else if !IDENTIFIER_REGEX.is_match(candidate) {
        Err(format!(
            "{candidate:?} is not a valid identifier, expected an ASCII letter or underscore followed by letters, digits or underscores"
        ))
    } else if candidate == "_" {
        Err("\"_\" cannot be used as a name".to_owned())
    } else {
        Ok(())
    }
}

/// Reject identifiers that the given target treats specially.
pub fn target_identifier(target: Target) -> impl Validator {
    move |candidate: &str| {
        if target.keywords().contains(candidate) {
            return Err(format!("{candidate:?} is a reserved keyword in {}", target.language_name()));
        }
        if target == Target::Cpp && (candidate.starts_with("__") || is_underscore_upper(candidate)) {
            return Err(format!("{candidate:?} is reserved for the implementation in C++"));
        }
        Ok(())
    }
}

fn is_underscore_upper(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next() == Some('_') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// The full identifier check for a name that ends up in generated code for `target`.
pub fn identifier(target: Target) -> impl Validator {
    identifier_syntax.and(target_identifier(target))
}

#[cfg(test)]
mod tests {
    use super::{existing_directory, existing_file, identifier, identifier_syntax, path_kind, PathKind, Validator};
    use crate::config::Target;

    #[test]
    fn identifier_syntax_rules() {
        assert!(identifier_syntax("resources").is_ok());
        assert!(identifier_syntax("_private").is_ok());
        assert!(identifier_syntax("Assets2").is_ok());

        assert!(identifier_syntax("").is_err());
        assert!(identifier_syntax("_").is_err());
        assert!(identifier_syntax("2fast").is_err());
        assert!(identifier_syntax("with-dash").is_err());
        assert!(identifier_syntax("with space").is_err());
        assert!(identifier_syntax("ünicode").is_err());
    }

    #[test]
    fn keywords_depend_on_target() {
        assert!(identifier(Target::Rust).validate("fn").is_err());
        assert!(identifier(Target::Rust).validate("namespace").is_ok());
        assert!(identifier(Target::Cpp).validate("namespace").is_err());
        assert!(identifier(Target::Cpp).validate("fn").is_ok());
    }

    #[test]
    fn cpp_reserved_names() {
        assert!(identifier(Target::Cpp).validate("__data").is_err());
        assert!(identifier(Target::Cpp).validate("_Data").is_err());
        assert!(identifier(Target::Cpp).validate("_data").is_ok());
        assert!(identifier(Target::Rust).validate("_Data").is_ok());
    }

    #[test]
    fn validators_compose() {
        let only_short = |s: &str| if s.len() <= 3 { Ok(()) } else { Err("too long".to_owned()) };
        let validator = identifier_syntax.and(only_short);

        assert!(validator.validate("abc").is_ok());
        assert_eq!(validator.validate("abcd"), Err("too long".to_owned()));
        assert!(validator.validate("1").unwrap_err().contains("not a valid identifier"));
    }

    #[test]
    fn path_checks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.bin");
        std::fs::write(&file, b"x").unwrap();
        let missing = dir.path().join("missing.bin");

        let dir_str = dir.path().to_str().unwrap();
        let file_str = file.to_str().unwrap();
        let missing_str = missing.to_str().unwrap();

        assert_eq!(path_kind(dir.path()), PathKind::Directory);
        assert_eq!(path_kind(&file), PathKind::File);
        assert_eq!(path_kind(&missing), PathKind::Nonexistent);

        assert!(existing_file(file_str).is_ok());
        assert!(existing_file(dir_str).unwrap_err().contains("directory"));
        assert!(existing_file(missing_str).unwrap_err().contains("does not exist"));

        assert!(existing_directory(dir_str).is_ok());
        assert!(existing_directory(file_str).unwrap_err().contains("is actually a file"));
        assert!(existing_directory(missing_str).is_err());
    }
}

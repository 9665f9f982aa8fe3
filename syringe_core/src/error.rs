use crate::back::TemplateError;
use crate::config::ConfigError;
use crate::manifest::ManifestError;
use std::fmt::{Display, Formatter};
use syringe_util::io::IoErrorWithPath;

#[must_use]
#[derive(Debug)]
pub enum CompileError {
    InvalidConfig(ConfigError),
    Manifest(ManifestError),
    SourceRead(IoErrorWithPath),
    Template(TemplateError),
}

pub type CompileResult<T> = Result<T, CompileError>;

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::InvalidConfig(e) => write!(f, "invalid configuration: {e}"),
            CompileError::Manifest(e) => write!(f, "invalid manifest: {e}"),
            CompileError::SourceRead(e) => write!(f, "failed to read source: {e}"),
            CompileError::Template(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<ConfigError> for CompileError {
    fn from(value: ConfigError) -> Self {
        CompileError::InvalidConfig(value)
    }
}

impl From<ManifestError> for CompileError {
    fn from(value: ManifestError) -> Self {
        CompileError::Manifest(value)
    }
}

impl From<IoErrorWithPath> for CompileError {
    fn from(value: IoErrorWithPath) -> Self {
        CompileError::SourceRead(value)
    }
}

impl From<TemplateError> for CompileError {
    fn from(value: TemplateError) -> Self {
        CompileError::Template(value)
    }
}

use crate::config::{RawConfig, Target};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use syringe_util::io::{recurse_for_each_file, IoErrorExt, IoErrorWithPath};

/// Contents of a `syringe.toml` file.
///
/// All paths are relative to the directory containing the manifest.
/// Without `relative`, display names are relative to the manifest directory itself.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub variable: Option<String>,
    pub target: Option<Target>,
    pub prefix: Option<String>,
    pub relative: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Directories whose files are all included, recursively and in sorted order.
    #[serde(default)]
    pub directories: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum ManifestError {
    Io(IoErrorWithPath),
    Parse { path: PathBuf, error: toml::de::Error },
}

impl Manifest {
    pub fn from_toml(src: &str) -> Result<Manifest, toml::de::Error> {
        // the `preserve_order` feature of `toml` keeps file lists in the order they were written
        toml::from_str(src)
    }

    pub fn read(path: &Path) -> Result<Manifest, ManifestError> {
        let src = std::fs::read_to_string(path).map_err(|e| ManifestError::Io(e.with_path(path.to_owned())))?;
        Manifest::from_toml(&src).map_err(|error| ManifestError::Parse {
            path: path.to_owned(),
            error,
        })
    }

    /// Resolve all paths against `manifest_dir` and expand the listed directories into files.
    pub fn into_raw_config(self, manifest_dir: &Path) -> Result<RawConfig, ManifestError> {
        let Manifest {
            variable,
            target,
            prefix,
            relative,
            output,
            files,
            directories,
        } = self;

        let mut all_files = files.iter().map(|f| manifest_dir.join(f)).collect::<Vec<_>>();
        for dir in directories {
            let dir = manifest_dir.join(dir);
            let before = all_files.len();
            recurse_for_each_file(&dir, |_, file| -> Result<(), ManifestError> {
                all_files.push(file.to_owned());
                Ok(())
            })?;
            log::debug!("expanded directory {dir:?} into {} files", all_files.len() - before);
        }

        let relative = match relative {
            None => manifest_dir.to_owned(),
            Some(relative) => manifest_dir.join(relative),
        };

        Ok(RawConfig {
            files: all_files,
            variable,
            target,
            prefix,
            relative: Some(relative),
            output: output.map(|output| manifest_dir.join(output)),
            thread_count: None,
        })
    }
}

impl Display for ManifestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Io(e) => write!(f, "failed to read: {e}"),
            ManifestError::Parse { path, error } => write!(f, "failed to parse {path:?}: {error}"),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<IoErrorWithPath> for ManifestError {
    fn from(value: IoErrorWithPath) -> Self {
        ManifestError::Io(value)
    }
}

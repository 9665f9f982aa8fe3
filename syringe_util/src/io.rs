use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Visit every file below `dir`, passing the directory names leading to it and the file path itself.
///
/// Entries are visited in sorted file name order, so repeated runs over the same tree see the same sequence.
pub fn recurse_for_each_file<E: From<IoErrorWithPath>>(
    dir: &Path,
    mut f: impl FnMut(&[OsString], &Path) -> Result<(), E>,
) -> Result<(), E> {
    let mut stack = vec![];
    recurse_for_each_file_impl(dir, &mut stack, &mut f)
}

fn recurse_for_each_file_impl<E: From<IoErrorWithPath>>(
    root: &Path,
    stack: &mut Vec<OsString>,
    f: &mut impl FnMut(&[OsString], &Path) -> Result<(), E>,
) -> Result<(), E> {
    let read_dir = fs::read_dir(root).map_err(|e| e.with_path(root.to_owned()))?;

    let mut entries = vec![];
    for entry in read_dir {
        let entry = entry.map_err(|e| e.with_path(root.to_owned()))?;
        entries.push(entry);
    }
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let next = entry.path();
        if next.is_dir() {
            stack.push(entry.file_name());
            recurse_for_each_file_impl(&next, stack, f)?;
            stack.pop();
        } else {
            f(stack, &next)?;
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct IoErrorWithPath {
    pub error: io::Error,
    pub path: PathBuf,
}

pub trait IoErrorExt {
    fn with_path(self, path: PathBuf) -> IoErrorWithPath;
}

impl IoErrorExt for io::Error {
    fn with_path(self, path: PathBuf) -> IoErrorWithPath {
        IoErrorWithPath { error: self, path }
    }
}

impl Display for IoErrorWithPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.path, self.error)
    }
}

impl std::error::Error for IoErrorWithPath {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

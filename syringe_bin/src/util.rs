use log::{LevelFilter, Log, Metadata, Record};
use path_clean::PathClean;
use std::fmt::Display;
use std::path::PathBuf;
use syringe_util::constants::SYRINGE_MANIFEST_FILE_NAME;
use syringe_util::io::IoErrorExt;

/// Marker for a failure that has already been reported to the user.
pub struct ErrorExit;

pub fn report_error(e: impl Display) -> ErrorExit {
    eprintln!("error: {e}");
    ErrorExit
}

/// Logger that writes every enabled record to stderr, leaving stdout free for the generated source.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level().as_str().to_lowercase(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logger(verbose: u8) {
    // only fails if a logger was already set, in which case that one is kept
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(verbosity_level(verbose));
    }
}

pub struct FoundManifest {
    pub manifest_path: PathBuf,
    pub manifest_parent: PathBuf,
}

pub struct FindManifestError(pub String);

impl Display for FindManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locate the manifest to use, if any.
///
/// An explicit path is always used. Otherwise, when `search` is set, the working directory
/// and its ancestors are searched for a manifest file.
pub fn find_manifest(manifest_path: Option<PathBuf>, search: bool) -> Result<Option<FoundManifest>, FindManifestError> {
    let cwd = std::env::current_dir()
        .map_err(|e| FindManifestError(format!("Failed to get current working directory: {e}")))?;
    let cwd = std::path::absolute(&cwd).map_err(|e| {
        FindManifestError(format!(
            "Failed to convert working dir to absolute path: {}",
            e.with_path(cwd.clone())
        ))
    })?;

    match manifest_path {
        Some(manifest_path) => {
            let manifest_path = cwd.join(manifest_path).clean();
            let manifest_parent = manifest_path
                .parent()
                .ok_or_else(|| {
                    FindManifestError(format!(
                        "Manifest path {manifest_path:?} does not have a parent directory"
                    ))
                })?
                .to_owned();
            Ok(Some(FoundManifest {
                manifest_path,
                manifest_parent,
            }))
        }
        None if search => {
            // walk up the path until we find a folder containing a manifest file
            for ancestor in cwd.ancestors() {
                let candidate = ancestor.join(SYRINGE_MANIFEST_FILE_NAME);
                if candidate.is_file() {
                    return Ok(Some(FoundManifest {
                        manifest_path: candidate,
                        manifest_parent: ancestor.to_owned(),
                    }));
                }
            }
            Ok(None)
        }
        None => Ok(None),
    }
}

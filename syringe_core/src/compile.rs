use crate::error::CompileResult;
use crate::hash::{Digest, Sha256};
use indexmap::map::Entry;
use indexmap::IndexMap;
use itertools::zip_eq;
use parking_lot::Mutex;
use std::fs::File;
use std::io;
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use syringe_util::io::{IoErrorExt, IoErrorWithPath};

/// Size of the read buffer, independent of the size of the file being read.
pub const READ_CHUNK_SIZE: usize = 10240;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceInput {
    /// Where to read the content from.
    pub source: PathBuf,
    /// The key this content is registered under in the generated registry.
    pub display_name: String,
}

/// Unique resource content, embedded once in the generated output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Definition {
    pub digest: Digest,
    pub contents: Vec<u8>,
}

/// A single input, referring to its content by digest.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Usage {
    pub display_name: String,
    pub digest: Digest,
}

#[derive(Debug, Default)]
pub struct CompiledResources {
    /// Unique contents, in the order they were first encountered.
    pub definitions: IndexMap<Digest, Definition>,
    /// One entry per input, in input order.
    pub usages: Vec<Usage>,
}

/// The result of reading a single source: its content and the digest of that content.
#[derive(Debug)]
pub struct ScannedSource {
    pub digest: Digest,
    pub contents: Vec<u8>,
}

impl Definition {
    pub fn len(&self) -> usize {
        self.contents.len()
    }
}

impl CompiledResources {
    /// Register a scanned input under `display_name`.
    ///
    /// Content that has been seen before is dropped and only the usage is recorded.
    /// Returns whether the content was new.
    pub fn add(&mut self, display_name: String, scanned: ScannedSource) -> bool {
        let ScannedSource { digest, contents } = scanned;

        let is_new = match self.definitions.entry(digest) {
            Entry::Occupied(_) => {
                log::debug!("{display_name:?} has the same content as an earlier input ({digest})");
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(Definition { digest, contents });
                true
            }
        };

        self.usages.push(Usage { display_name, digest });
        is_new
    }

    pub fn definition(&self, usage: &Usage) -> Option<&Definition> {
        self.definitions.get(&usage.digest)
    }

    pub fn total_embedded_bytes(&self) -> usize {
        self.definitions.values().map(Definition::len).sum()
    }
}

/// Read, hash and deduplicate all inputs.
///
/// Each file is read exactly once. With more than one thread, files are scanned concurrently,
/// but they are always merged in input order so the result does not depend on the thread count.
/// The first failing input (in input order) aborts the entire run.
pub fn compile_resources(inputs: &[ResourceInput], thread_count: NonZeroUsize) -> CompileResult<CompiledResources> {
    let mut result = CompiledResources::default();

    if thread_count.get() == 1 || inputs.len() <= 1 {
        for input in inputs {
            let scanned = scan_file(&input.source)?;
            result.add(input.display_name.clone(), scanned);
        }
    } else {
        let scanned = scan_files_parallel(inputs, thread_count)?;
        for (input, scanned) in zip_eq(inputs, scanned) {
            result.add(input.display_name.clone(), scanned);
        }
    }

    log::info!(
        "compiled {} inputs into {} unique definitions ({} bytes)",
        result.usages.len(),
        result.definitions.len(),
        result.total_embedded_bytes()
    );
    Ok(result)
}

pub fn scan_file(path: &Path) -> Result<ScannedSource, IoErrorWithPath> {
    let file = File::open(path).map_err(|e| e.with_path(path.to_owned()))?;
    let scanned = scan_reader(file).map_err(|e| e.with_path(path.to_owned()))?;

    log::debug!(
        "scanned {path:?}: {} bytes, digest {}",
        scanned.contents.len(),
        scanned.digest
    );
    Ok(scanned)
}

/// Read `reader` to the end in fixed-size chunks, hashing and collecting the bytes in the same pass.
pub fn scan_reader(mut reader: impl Read) -> io::Result<ScannedSource> {
    let mut buffer = [0u8; READ_CHUNK_SIZE];
    let mut hasher = Sha256::new();
    let mut contents = vec![];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        let chunk = &buffer[..n];
        hasher.update(chunk);
        contents.extend_from_slice(chunk);
    }

    debug_assert_eq!(hasher.total_len(), contents.len() as u64);
    Ok(ScannedSource {
        digest: hasher.finish(),
        contents,
    })
}

fn scan_files_parallel(
    inputs: &[ResourceInput],
    thread_count: NonZeroUsize,
) -> Result<Vec<ScannedSource>, IoErrorWithPath> {
    let next_index = AtomicUsize::new(0);
    let any_failed = AtomicBool::new(false);
    let results: Mutex<Vec<Option<Result<ScannedSource, IoErrorWithPath>>>> =
        Mutex::new(inputs.iter().map(|_| None).collect());

    let worker_count = usize::min(thread_count.get(), inputs.len());
    std::thread::scope(|s| {
        for _ in 0..worker_count {
            s.spawn(|| {
                while !any_failed.load(Ordering::Relaxed) {
                    let index = next_index.fetch_add(1, Ordering::Relaxed);
                    let Some(input) = inputs.get(index) else {
                        break;
                    };

                    let result = scan_file(&input.source);
                    if result.is_err() {
                        any_failed.store(true, Ordering::Relaxed);
                    }
                    results.lock()[index] = Some(result);
                }
            });
        }
    });

    // Indices are claimed in increasing order and every claimed input is finished,
    //   so all inputs before the first failure have a result.
    let mut scanned = Vec::with_capacity(inputs.len());
    for (index, result) in results.into_inner().into_iter().enumerate() {
        match result {
            Some(Ok(s)) => scanned.push(s),
            Some(Err(e)) => return Err(e),
            None => unreachable!("input {index} was skipped without an earlier failure"),
        }
    }
    Ok(scanned)
}

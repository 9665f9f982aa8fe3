use crate::args::Args;
use crate::util::{find_manifest, init_logger, report_error, ErrorExit};
use clap::Parser;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use syringe_core::config::RawConfig;
use syringe_core::driver::run;
use syringe_core::error::CompileError;
use syringe_core::manifest::Manifest;
use syringe_util::io::IoErrorExt;

mod args;
mod util;

#[global_allocator]
static ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match main_inner(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ErrorExit) => ExitCode::FAILURE,
    }
}

fn main_inner(args: Args) -> Result<(), ErrorExit> {
    let Args {
        paths,
        manifest,
        relative,
        prefix,
        output,
        variable,
        target,
        thread_count,
        profile,
        verbose: _,
    } = args;

    let thread_count = thread_count.unwrap_or_else(|| NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN));
    let start_all = Instant::now();

    // collect settings
    let start_config = Instant::now();
    let search_manifest = paths.is_empty();
    let cli = RawConfig {
        files: paths,
        variable,
        target,
        prefix,
        relative,
        output,
        thread_count: Some(thread_count),
    };
    let raw = match find_manifest(manifest, search_manifest).map_err(report_error)? {
        None => cli,
        Some(found) => {
            log::info!("using manifest {:?}", found.manifest_path);
            let manifest = Manifest::read(&found.manifest_path).map_err(|e| report_error(CompileError::from(e)))?;
            let base = manifest
                .into_raw_config(&found.manifest_parent)
                .map_err(|e| report_error(CompileError::from(e)))?;
            cli.overriding(base)
        }
    };
    let config = raw.build().map_err(|e| report_error(CompileError::from(e)))?;
    let time_config = start_config.elapsed();

    // compile, nothing is written unless this succeeds
    let result = run(&config).map_err(report_error)?;

    let start_write = Instant::now();
    match raw.output.as_deref() {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, &result.source).map_err(|e| report_error(e.with_path(path.to_owned())))?;
            log::info!("wrote {path:?}");
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(result.source.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| report_error(format!("failed to write to stdout: {e}")))?;
        }
    }
    let time_write = start_write.elapsed();
    let time_all = start_all.elapsed();

    // print profiling info
    if profile {
        let stats = result.stats;
        eprintln!();
        eprintln!("profiling info:");
        eprintln!("-----------------------------------------------");
        eprintln!("threads:          {}", config.thread_count);
        eprintln!("inputs:           {}", stats.usage_count);
        eprintln!("unique contents:  {}", stats.definition_count);
        eprintln!("embedded bytes:   {}", stats.embedded_bytes);
        eprintln!("output bytes:     {}", result.source.len());
        eprintln!("-----------------------------------------------");
        eprintln!("config:           {time_config:?}");
        eprintln!("read + hash:      {:?}", stats.time_compile);
        eprintln!("lower:            {:?}", stats.time_lower);
        eprintln!("write:            {time_write:?}");
        eprintln!("-----------------------------------------------");
        eprintln!("total:            {time_all:?}");
        eprintln!();
    }

    Ok(())
}

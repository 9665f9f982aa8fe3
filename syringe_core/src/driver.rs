use crate::back::lower;
use crate::compile::compile_resources;
use crate::config::{ConfigError, SyringeConfig};
use crate::error::CompileResult;
use crate::throw;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RunOutput {
    /// The complete generated source.
    pub source: String,
    pub stats: RunStats,
}

#[derive(Debug, Copy, Clone)]
pub struct RunStats {
    pub usage_count: usize,
    pub definition_count: usize,
    pub embedded_bytes: usize,
    pub time_compile: Duration,
    pub time_lower: Duration,
}

/// Read all inputs and generate the registry source.
///
/// This is all-or-nothing: if any input cannot be read, no source is produced at all.
pub fn run(config: &SyringeConfig) -> CompileResult<RunOutput> {
    if config.inputs.is_empty() {
        throw!(ConfigError::NoInputs);
    }

    let start_compile = Instant::now();
    let compiled = compile_resources(&config.inputs, config.thread_count)?;
    let time_compile = start_compile.elapsed();

    let start_lower = Instant::now();
    let source = lower(&compiled, &config.variable, config.target)?;
    let time_lower = start_lower.elapsed();

    let stats = RunStats {
        usage_count: compiled.usages.len(),
        definition_count: compiled.definitions.len(),
        embedded_bytes: compiled.total_embedded_bytes(),
        time_compile,
        time_lower,
    };
    Ok(RunOutput { source, stats })
}

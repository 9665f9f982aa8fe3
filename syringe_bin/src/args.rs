use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use syringe_core::config::{Target, SCOPE_SEPARATOR};
use syringe_core::validate::{existing_directory, existing_file, identifier_syntax, Validator};
use syringe_util::constants::SYRINGE_VERSION;

/// Compile files into source code that embeds their contents, deduplicated by SHA-256 digest.
#[derive(Parser, Debug)]
#[command(version = SYRINGE_VERSION)]
pub struct Args {
    // input
    /// Files to embed, appended after the files listed in the manifest.
    #[arg(value_parser = parse_existing_file)]
    pub paths: Vec<PathBuf>,
    /// Manifest to read. Without paths or this flag, the working directory and its parents are searched.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Register files under their path relative to this directory.
    #[arg(long, short = 'r', value_parser = parse_existing_directory)]
    pub relative: Option<PathBuf>,
    /// Prepended to every registered name.
    #[arg(long, short = 'p')]
    pub prefix: Option<String>,

    // output
    /// Output file, `-` for stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Name of the generated registry, optionally namespaced as `a::b::name`.
    #[arg(long, value_parser = parse_variable)]
    pub variable: Option<String>,
    #[arg(long)]
    pub target: Option<Target>,

    // performance
    #[arg(long, short = 'j')]
    pub thread_count: Option<NonZeroUsize>,

    // debug
    #[arg(long)]
    pub profile: bool,
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_existing_file(s: &str) -> Result<PathBuf, String> {
    existing_file.validate(s)?;
    Ok(PathBuf::from(s))
}

fn parse_existing_directory(s: &str) -> Result<PathBuf, String> {
    existing_directory.validate(s)?;
    Ok(PathBuf::from(s))
}

// keywords depend on the target, those are checked once all options are known
fn parse_variable(s: &str) -> Result<String, String> {
    for segment in s.split(SCOPE_SEPARATOR) {
        identifier_syntax.validate(segment)?;
    }
    Ok(s.to_owned())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};
    use syringe_core::config::Target;

    #[test]
    fn command_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_options() {
        let args = Args::try_parse_from([
            "syringe",
            "--variable",
            "ns::data",
            "--target",
            "cpp",
            "-j",
            "2",
            "-vv",
            "-o",
            "-",
        ])
        .unwrap();
        assert!(args.paths.is_empty());
        assert_eq!(args.variable.as_deref(), Some("ns::data"));
        assert_eq!(args.target, Some(Target::Cpp));
        assert_eq!(args.thread_count.map(|n| n.get()), Some(2));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn reject_invalid() {
        assert!(Args::try_parse_from(["syringe", "--variable", "ns::1bad"]).is_err());
        assert!(Args::try_parse_from(["syringe", "--target", "verilog"]).is_err());
        assert!(Args::try_parse_from(["syringe", "-j", "0"]).is_err());
        assert!(Args::try_parse_from(["syringe", "definitely/not/a/file.bin"]).is_err());
    }

    #[test]
    fn validate_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let file_str = file.to_str().unwrap();

        let args = Args::try_parse_from(["syringe", file_str, "-r", dir_str]).unwrap();
        assert_eq!(args.paths, vec![file.clone()]);
        assert!(Args::try_parse_from(["syringe", dir_str]).is_err());
        assert!(Args::try_parse_from(["syringe", file_str, "-r", file_str]).is_err());
    }
}

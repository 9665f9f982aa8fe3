use crate::compile::CompiledResources;
use crate::config::{Target, VariableName};
use crate::hash::Digest;
use crate::util::data::IndexMapExt;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt::{Display, Formatter};
use syringe_util::constants::{SYRINGE_TOOL_NAME, SYRINGE_VERSION};
use syringe_util::swrite::swrite_separated;

pub mod escape;
pub mod lower_cpp;
pub mod lower_rust;

const I: &str = Indent::I;

/// Render the complete generated source for `target`.
pub fn lower(compiled: &CompiledResources, variable: &VariableName, target: Target) -> Result<String, TemplateError> {
    let source = match target {
        Target::Rust => lower_rust::lower_to_rust(compiled, variable)?,
        Target::Cpp => lower_cpp::lower_to_cpp(compiled, variable)?,
    };
    log::info!(
        "generated {} bytes of {} for {variable}",
        source.len(),
        target.language_name()
    );
    Ok(source)
}

/// The identifier of the embedded definition for a digest, the same in every target.
pub fn definition_identifier(digest: &Digest) -> String {
    format!("_{digest}")
}

/// A single byte as a hex integer literal, valid in both Rust and C++.
#[derive(Debug, Copy, Clone)]
pub struct ByteLiteral(pub u8);

impl Display for ByteLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Append `bytes` as comma-separated hex literals.
pub fn swrite_byte_literals(dst: &mut String, bytes: &[u8]) {
    dst.reserve(bytes.len() * 6);
    swrite_separated(dst, bytes.iter().map(|&b| ByteLiteral(b)), ", ");
}

/// The replacements every template shares.
fn common_replacements(compiled: &CompiledResources) -> IndexMap<&'static str, String> {
    let mut replacements = IndexMap::new();
    replacements.insert_first("TOOL", SYRINGE_TOOL_NAME.to_owned());
    replacements.insert_first("VERSION", SYRINGE_VERSION.to_owned());
    replacements.insert_first("USAGE_COUNT", compiled.usages.len().to_string());
    replacements.insert_first("DEFINITION_COUNT", compiled.definitions.len().to_string());
    replacements
}

#[derive(Debug, Copy, Clone)]
struct Indent {
    depth: usize,
}

impl Indent {
    pub const I: &'static str = "    ";

    pub fn new(depth: usize) -> Indent {
        Indent { depth }
    }

    pub fn nest(self) -> Indent {
        Indent { depth: self.depth + 1 }
    }
}

impl Display for Indent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.depth {
            write!(f, "{I}")?;
        }
        Ok(())
    }
}

/// Indent every non-empty line of `source` by one level.
fn indent_lines(source: &str) -> String {
    source
        .lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{I}{line}") })
        .join("\n")
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TemplateError {
    pub not_found: Vec<String>,
    pub not_used: Vec<String>,
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "template substitution failed: not found: {:?}, not used: {:?}",
            self.not_found, self.not_used
        )
    }
}

impl std::error::Error for TemplateError {}

lazy_static! {
    static ref TEMPLATE_REGEX: Regex = Regex::new(r"/\*\[TEMPLATE_([A-Z_]+)]\*/").unwrap();
}

/// Substitute every `/*[TEMPLATE_KEY]*/` placeholder in `template`.
///
/// Replacement values are inserted literally and are not scanned for placeholders themselves.
/// Fails if the template contains an unknown key or if any replacement is left unused.
fn template_replace(template: &str, replacements: &IndexMap<&'static str, String>) -> Result<String, TemplateError> {
    let mut not_found = IndexSet::new();
    let mut used = vec![false; replacements.len()];

    let result = TEMPLATE_REGEX.replace_all(template, |caps: &Captures| {
        let key = &caps[1];
        match replacements.get_index_of(key) {
            Some(index) => {
                used[index] = true;
                replacements[index].as_str()
            }
            None => {
                not_found.insert(key.to_owned());
                ""
            }
        }
    });

    if !not_found.is_empty() || used.contains(&false) {
        let not_used = replacements
            .keys()
            .enumerate()
            .filter_map(|(i, &k)| (!used[i]).then(|| k.to_owned()))
            .collect_vec();
        Err(TemplateError {
            not_found: not_found.into_iter().collect(),
            not_used,
        })
    } else {
        Ok(result.into_owned())
    }
}

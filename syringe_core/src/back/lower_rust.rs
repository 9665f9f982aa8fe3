use crate::back::escape::rust_string_literal;
use crate::back::{
    common_replacements, definition_identifier, indent_lines, swrite_byte_literals, template_replace, Indent,
    TemplateError,
};
use crate::compile::CompiledResources;
use crate::config::{VariableName, SUPPORT_MODULE_NAME};
use crate::registry::FIXED_MAP_SOURCE;
use crate::util::data::IndexMapExt;
use syringe_util::{swrite, swriteln};

const TEMPLATE: &str = include_str!("templates/registry.rs.in");

/// Generate a Rust source file meant to be pulled in with `include!`.
///
/// The support module holds the map type and one static array per definition,
/// the registry itself is a lazily built static inside the requested modules.
pub fn lower_to_rust(compiled: &CompiledResources, variable: &VariableName) -> Result<String, TemplateError> {
    let mut replacements = common_replacements(compiled);
    replacements.insert_first("FIXED_MAP", indent_lines(FIXED_MAP_SOURCE));
    replacements.insert_first("CAPACITY", compiled.usages.len().to_string());
    replacements.insert_first("DEFINITIONS", definitions_to_rust(compiled));
    replacements.insert_first("REGISTRY", registry_to_rust(compiled, variable));
    template_replace(TEMPLATE, &replacements)
}

fn definitions_to_rust(compiled: &CompiledResources) -> String {
    let indent = Indent::new(1);
    let mut f = String::new();
    for definition in compiled.definitions.values() {
        let ident = definition_identifier(&definition.digest);
        swrite!(f, "{indent}pub static {ident}: [u8; {}] = [", definition.len());
        swrite_byte_literals(&mut f, &definition.contents);
        swriteln!(f, "];");
    }
    f
}

fn registry_to_rust(compiled: &CompiledResources, variable: &VariableName) -> String {
    let depth = variable.namespace.len();
    let support = if depth == 0 {
        format!("self::{SUPPORT_MODULE_NAME}")
    } else {
        format!("{}{SUPPORT_MODULE_NAME}", "super::".repeat(depth))
    };

    // a let binding cannot shadow the static being defined
    let name = &variable.name;
    let local = if name == "registry" { "registry_" } else { "registry" };

    let mut f = String::new();
    let mut indent = Indent::new(0);
    for segment in &variable.namespace {
        swriteln!(f, "{indent}pub mod {segment} {{");
        indent = indent.nest();
    }

    let inner = indent.nest();
    swriteln!(f, "{indent}#[allow(non_upper_case_globals)]");
    swriteln!(
        f,
        "{indent}pub static {name}: ::std::sync::LazyLock<{support}::Registry> = ::std::sync::LazyLock::new(|| {{"
    );
    swriteln!(f, "{inner}let mut {local} = {support}::Registry::new();");
    for usage in &compiled.usages {
        let key = rust_string_literal(&usage.display_name);
        let ident = definition_identifier(&usage.digest);
        swriteln!(
            f,
            "{inner}{local}.insert({key}, &{support}::{ident}).expect(\"registry capacity matches the resource count\");"
        );
    }
    swriteln!(f, "{inner}{local}");
    swriteln!(f, "{indent}}});");

    for depth in (0..depth).rev() {
        swriteln!(f, "{}}}", Indent::new(depth));
    }
    f
}

#[cfg(test)]
mod tests {
    use super::lower_to_rust;
    use crate::compile::{scan_reader, CompiledResources};
    use crate::config::{Target, VariableName};

    fn compiled(entries: &[(&str, &[u8])]) -> CompiledResources {
        let mut compiled = CompiledResources::default();
        for &(name, data) in entries {
            compiled.add(name.to_owned(), scan_reader(data).unwrap());
        }
        compiled
    }

    #[test]
    fn top_level_registry() {
        let compiled = compiled(&[("abc.txt", &b"abc"[..])]);
        let source = lower_to_rust(&compiled, &VariableName::default_name()).unwrap();

        assert!(source.starts_with("// @generated by syringe"));
        assert!(source.contains(
            "    pub static _ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad: [u8; 3] = [0x61, 0x62, 0x63];\n"
        ));
        assert!(source.contains("pub type Registry = FixedMap<&'static str, &'static [u8], 1>;"));
        assert!(source.contains("pub static resources: ::std::sync::LazyLock<self::syringe::Registry>"));
        assert!(source.contains("let mut registry = self::syringe::Registry::new();"));
        assert!(source.contains(
            "registry.insert(\"abc.txt\", &self::syringe::_ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad)"
        ));
        assert!(!source.contains("/*[TEMPLATE_"));
    }

    #[test]
    fn namespaced_registry() {
        let compiled = compiled(&[("a", &b"1"[..]), ("b", &b"2"[..])]);
        let variable = VariableName::parse("outer::inner::registry", Target::Rust).unwrap();
        let source = lower_to_rust(&compiled, &variable).unwrap();

        assert!(source.contains("\npub mod outer {\n    pub mod inner {\n        #[allow(non_upper_case_globals)]\n"));
        assert!(source.contains("LazyLock<super::super::syringe::Registry>"));
        assert!(source.contains("let mut registry_ = super::super::syringe::Registry::new();"));
        assert!(source.ends_with("        });\n    }\n}\n"));
    }

    #[test]
    fn empty_definition() {
        let compiled = compiled(&[("empty.txt", &b""[..])]);
        let source = lower_to_rust(&compiled, &VariableName::default_name()).unwrap();
        assert!(source.contains(
            "pub static _e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855: [u8; 0] = [];"
        ));
    }

    #[test]
    fn duplicates_embedded_once() {
        let compiled = compiled(&[("x", &b"same"[..]), ("y", &b"same"[..])]);
        let source = lower_to_rust(&compiled, &VariableName::default_name()).unwrap();
        assert_eq!(source.matches("pub static _").count(), 1);
        assert_eq!(source.matches("registry.insert(").count(), 2);
    }
}

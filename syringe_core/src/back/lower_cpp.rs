use crate::back::escape::cpp_string_literal;
use crate::back::{
    common_replacements, definition_identifier, swrite_byte_literals, template_replace, Indent, TemplateError,
};
use crate::compile::CompiledResources;
use crate::config::{VariableName, SCOPE_SEPARATOR, SUPPORT_MODULE_NAME};
use crate::util::data::IndexMapExt;
use itertools::Itertools;
use syringe_util::{swrite, swriteln};

const TEMPLATE: &str = include_str!("templates/registry.hpp.in");

/// Generate a self-contained C++20 header.
///
/// The registry is a `constexpr` map from name to byte span, built by an immediately invoked lambda.
/// Everything the header refers to is fully qualified, so user namespaces cannot shadow it.
pub fn lower_to_cpp(compiled: &CompiledResources, variable: &VariableName) -> Result<String, TemplateError> {
    let mut replacements = common_replacements(compiled);
    replacements.insert_first("DEFINITIONS", definitions_to_cpp(compiled));
    replacements.insert_first("REGISTRY", registry_to_cpp(compiled, variable));
    template_replace(TEMPLATE, &replacements)
}

fn definitions_to_cpp(compiled: &CompiledResources) -> String {
    let mut f = String::new();
    for definition in compiled.definitions.values() {
        let ident = definition_identifier(&definition.digest);
        swrite!(
            f,
            "constexpr ::std::array<::std::uint8_t, {}> {ident} = {{",
            definition.len()
        );
        swrite_byte_literals(&mut f, &definition.contents);
        swriteln!(f, "}};");
    }
    f
}

fn registry_to_cpp(compiled: &CompiledResources, variable: &VariableName) -> String {
    let namespace = variable.namespace.iter().join(SCOPE_SEPARATOR);
    let name = &variable.name;
    let capacity = compiled.usages.len();
    let inner = Indent::new(1);

    // the lambda local would otherwise shadow the variable being defined
    let local = if name == "registry" { "registry_" } else { "registry" };

    let mut f = String::new();
    if !namespace.is_empty() {
        swriteln!(f, "namespace {namespace} {{");
        swriteln!(f);
    }

    swriteln!(f, "constexpr auto {name} = []() {{");
    swriteln!(
        f,
        "{inner}::{SUPPORT_MODULE_NAME}::cxmap<::std::string_view, ::std::span<const ::std::uint8_t>, {capacity}> {local};"
    );
    for usage in &compiled.usages {
        let key = cpp_string_literal(&usage.display_name);
        let ident = definition_identifier(&usage.digest);
        swriteln!(f, "{inner}{local}[{key}] = ::{SUPPORT_MODULE_NAME}::{ident};");
    }
    swriteln!(f, "{inner}return ::std::as_const({local});");
    swriteln!(f, "}}();");

    if !namespace.is_empty() {
        swriteln!(f);
        swriteln!(f, "}}  // namespace {namespace}");
    }
    f
}

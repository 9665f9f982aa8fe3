use syringe_util::swrite;

/// Quote `s` as a Rust string literal that evaluates back to exactly `s`.
pub fn rust_string_literal(s: &str) -> String {
    // the Debug representation of str is a valid literal
    format!("{s:?}")
}

/// Quote `s` as a C++ narrow string literal that evaluates back to the UTF-8 bytes of `s`.
///
/// Quotes and backslashes are escaped, control characters become three-digit octal escapes
/// and everything else (including non-ASCII text) is copied unchanged.
pub fn cpp_string_literal(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            // an octal escape always has exactly three digits, so a following digit cannot extend it
            c if c.is_ascii_control() => swrite!(result, "\\{:03o}", c as u32),
            // avoid accidental trigraphs in pre-C++17 compilers
            '?' if result.ends_with('?') => result.push_str("\\?"),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

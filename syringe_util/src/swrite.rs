use std::fmt::Display;

pub trait StringMut {
    fn as_mut_string(&mut self) -> &mut String;
}

impl StringMut for String {
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
}

impl<T: StringMut> StringMut for &mut T {
    fn as_mut_string(&mut self) -> &mut String {
        (*self).as_mut_string()
    }
}

/// Variant of write! that only targets strings, so there is no error to handle.
#[macro_export]
macro_rules! swrite {
    ($dst:expr, $($arg:tt)*) => {{
        use std::fmt::Write;
        use $crate::swrite::StringMut;
        let dst = $dst.as_mut_string();
        write!(dst, $($arg)*).unwrap();
    }};
}

/// Variant of writeln! that only targets strings, so there is no error to handle.
#[macro_export]
macro_rules! swriteln {
    ($dst:expr $(,)?) => {{
        use $crate::swrite::StringMut;
        $dst.as_mut_string().push('\n');
    }};
    ($dst:expr, $($arg:tt)*) => {{
        use std::fmt::Write;
        use $crate::swrite::StringMut;
        let dst = $dst.as_mut_string();
        writeln!(dst, $($arg)*).unwrap();
    }};
}

/// Append all items to `dst`, with `separator` between consecutive items.
///
/// Unlike `Itertools::join` this does not build an intermediate string,
/// which matters for the multi-megabyte byte lists of large resources.
pub fn swrite_separated<I>(mut dst: impl StringMut, items: I, separator: &str)
where
    I: IntoIterator,
    I::Item: Display,
{
    let dst = dst.as_mut_string();
    let mut first = true;
    for item in items {
        if !first {
            dst.push_str(separator);
        }
        first = false;
        swrite!(dst, "{item}");
    }
}

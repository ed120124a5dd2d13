//! Identifier and literal rendering.
//!
//! Every piece of user- or generator-supplied text that ends up inside a
//! statement goes through this module.

use fixture_core::GeneratedValue;
use fixture_generator::generators::identifier::is_reserved;
use std::borrow::Cow;

/// Render an identifier for use in a statement.
///
/// Names made of lowercase letters, digits and underscores (not starting
/// with a digit) that are not reserved keywords are emitted bare, which is
/// the case for every generated name. Anything else, e.g. a mixed-case table
/// found in a pre-existing database, is double-quoted.
pub fn identifier(name: &str) -> Cow<'_, str> {
    if is_plain_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') && !is_reserved(name)
}

/// Render a generated value as a SQL literal.
///
/// Text is single-quoted with embedded single quotes doubled. Generated text
/// is letters only, so this produces the same bytes as plain wrapping.
pub fn literal(value: &GeneratedValue) -> String {
    match value {
        GeneratedValue::Bool(b) => b.to_string(),
        GeneratedValue::Int32(i) => i.to_string(),
        GeneratedValue::Float64(f) => f.to_string(),
        GeneratedValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

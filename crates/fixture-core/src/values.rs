//! Typed random values.

/// A value produced by the generator for a single column.
///
/// Values stay typed until the SQL builder renders them, so quoting is
/// decided in exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    /// `boolean`
    Bool(bool),
    /// `integer`
    Int32(i32),
    /// `double precision`
    Float64(f64),
    /// `character varying`
    Text(String),
}

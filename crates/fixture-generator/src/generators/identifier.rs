//! Random SQL identifier generation.
//!
//! Identifiers are lowercase ASCII letters only, so they are always valid
//! unquoted PostgreSQL identifiers and never need case folding.

use crate::generator::GeneratorError;
use rand::Rng;

/// Minimum identifier length.
pub const MIN_IDENTIFIER_LENGTH: usize = 10;

/// PostgreSQL reserved keywords, sorted. Only the letter-only entries of
/// length 10 or more can ever be generated, but the full list is also used
/// to decide whether an introspected name must be quoted.
const RESERVED_KEYWORDS: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "authorization",
    "binary",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "collation",
    "column",
    "concurrently",
    "constraint",
    "create",
    "cross",
    "current_catalog",
    "current_date",
    "current_role",
    "current_schema",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "freeze",
    "from",
    "full",
    "grant",
    "group",
    "having",
    "ilike",
    "in",
    "initially",
    "inner",
    "intersect",
    "into",
    "is",
    "isnull",
    "join",
    "lateral",
    "leading",
    "left",
    "like",
    "limit",
    "localtime",
    "localtimestamp",
    "natural",
    "not",
    "notnull",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "outer",
    "overlaps",
    "placing",
    "primary",
    "references",
    "returning",
    "right",
    "select",
    "session_user",
    "similar",
    "some",
    "symmetric",
    "system_user",
    "table",
    "tablesample",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "verbose",
    "when",
    "where",
    "window",
    "with",
];

/// Generate exactly `len` random lowercase letters.
pub fn random_letters<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Generate a random identifier whose length is uniform in
/// `[10, 10 + max_len)`.
///
/// A result that collides with a reserved keyword is discarded and drawn
/// again.
pub fn random_identifier<R: Rng>(rng: &mut R, max_len: usize) -> Result<String, GeneratorError> {
    if max_len == 0 {
        return Err(GeneratorError::InvalidNameLength(max_len));
    }

    loop {
        let len = MIN_IDENTIFIER_LENGTH + rng.gen_range(0..max_len);
        let name = random_letters(rng, len);
        if !is_reserved(&name) {
            return Ok(name);
        }
    }
}

/// Whether `name` is a reserved keyword that cannot be used unquoted.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYWORDS.binary_search(&name).is_ok()
}

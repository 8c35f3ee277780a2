//! Tokenizer for the compact schema description language.
//!
//! ```text
//! description := clause (',' clause)*
//! clause      := name ':' width | name ':' offset ':' width
//! ```
//!
//! A negative width marks a signed field. Clauses without an offset are placed
//! directly after everything declared before them.

use crate::errors::SchemaError;

/// One parsed `name:width` or `name:offset:width` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause<'a> {
    pub name: &'a str,
    /// `None` when the field follows the running offset.
    pub offset: Option<i64>,
    /// Signed bit count; negative means two's-complement.
    pub width: i64,
}

/// Splits `description` into clauses without validating widths or names against each other.
pub fn parse_clauses(description: &str) -> Result<Vec<Clause<'_>>, SchemaError> {
    description.split(',').map(parse_clause).collect()
}

fn parse_clause(clause: &str) -> Result<Clause<'_>, SchemaError> {
    let parts: Vec<&str> = clause.split(':').map(str::trim).collect();

    let (name, offset, width) = match parts.as_slice() {
        [name, width] => (*name, None, *width),
        [name, offset, width] => (*name, Some(*offset), *width),
        _ => {
            return Err(parse_error(
                clause,
                "expected `name:width` or `name:offset:width`",
            ));
        }
    };

    if name.is_empty() {
        return Err(parse_error(clause, "field name is empty"));
    }

    let offset = offset
        .map(|token| parse_int(clause, "offset", token))
        .transpose()?;
    let width = parse_int(clause, "width", width)?;

    Ok(Clause {
        name,
        offset,
        width,
    })
}

fn parse_int(clause: &str, what: &str, token: &str) -> Result<i64, SchemaError> {
    token
        .parse::<i64>()
        .map_err(|_| parse_error(clause, &format!("{what} `{token}` is not an integer")))
}

fn parse_error(clause: &str, reason: &str) -> SchemaError {
    SchemaError::Parse {
        clause: clause.to_string(),
        reason: reason.to_string(),
    }
}

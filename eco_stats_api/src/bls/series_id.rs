//! Building and parsing fixed-width BLS series IDs.

use super::programs::{get_program, Program};
use crate::errors::{validation, Error};

/// A series ID split into the named fields of its program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSeriesId {
    pub program: &'static Program,
    /// `(field name, value)` in layout order, `prefix` included.
    pub fields: Vec<(&'static str, String)>,
}

impl ParsedSeriesId {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Fields other than `prefix`, suitable for [`build_series_id`].
    pub fn components(&self) -> Vec<(&'static str, &str)> {
        self.fields
            .iter()
            .filter(|(n, _)| *n != "prefix")
            .map(|(n, v)| (*n, v.as_str()))
            .collect()
    }
}

/// Splits `series_id` into its program's fields.
///
/// The first two characters select the program; the ID must be at least as
/// long as that program's layout. CPI item codes are shorter than their
/// field, so such IDs must carry trailing padding.
pub fn parse_series_id(series_id: &str) -> Result<ParsedSeriesId, Error> {
    if !series_id.is_ascii() {
        return Err(validation(format!(
            "series ID '{}' must be ASCII",
            series_id
        )));
    }
    let prefix = series_id.get(..2).ok_or_else(|| {
        validation(format!(
            "series ID must be at least 2 characters, got '{}'",
            series_id
        ))
    })?;
    let program = get_program(prefix)?;

    let expected = program.series_id_length();
    if series_id.len() < expected {
        return Err(validation(format!(
            "series ID '{}' is too short for program {}: expected at least {} characters, got {}",
            series_id,
            program.prefix,
            expected,
            series_id.len()
        )));
    }

    let fields = program
        .fields
        .iter()
        .map(|f| {
            let value = f.extract(series_id).unwrap_or_default();
            let value = if f.name == "prefix" {
                value.to_uppercase()
            } else {
                value.to_string()
            };
            (f.name, value)
        })
        .collect();

    Ok(ParsedSeriesId { program, fields })
}

/// Assembles a series ID for `program` from `(field, value)` components.
///
/// Fields not supplied are zero-filled. Values are placed left-aligned in
/// their field, padded with `0` or truncated to fit. The prefix comes from
/// the program; unknown component names are ignored.
pub fn build_series_id(program: &str, components: &[(&str, &str)]) -> Result<String, Error> {
    let program = get_program(program)?;
    let mut chars = vec!['0'; program.series_id_length()];

    for field in program.fields {
        let value = if field.name == "prefix" {
            Some(program.prefix)
        } else {
            components
                .iter()
                .rev()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| *value)
        };
        if let Some(value) = value {
            let padded = value.chars().chain(std::iter::repeat('0')).take(field.width());
            for (offset, ch) in padded.enumerate() {
                chars[field.start - 1 + offset] = ch;
            }
        }
    }

    Ok(chars.into_iter().collect())
}

//! FORMAT header parsing.
//!
//! A sky model declares its own schema on the format line:
//!
//! ```text
//! FORMAT = Name, Type, Patch, Ra, Dec, I, SpectralIndex='[0.0]', ReferenceFrequency='1.5e8'
//! # (Name, Type, Ra, Dec, I) = format
//! ```
//!
//! Columns are comma separated `alias[=default]` tokens. List defaults are
//! bracketed and may themselves contain commas, so tokens are re-joined
//! across an open `[` before the defaults are read.

use std::collections::BTreeMap;

use skymodel_core::{ColumnId, DefaultValue};

use crate::error::FormatError;

/// One column declared on the format line.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatColumn {
    pub id: ColumnId,
    /// Default given in the header, if it was numeric.
    pub default: Option<DefaultValue>,
}

/// Ordered column layout of the data lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormatSpec {
    pub columns: Vec<FormatColumn>,
}

impl FormatSpec {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, id: ColumnId) -> bool {
        self.columns.iter().any(|c| c.id == id)
    }

    /// Whether the sky model groups its sources into patches.
    pub fn has_patches(&self) -> bool {
        self.contains(ColumnId::Patch)
    }

    /// Explicit header defaults keyed by column, used to seed table metadata.
    pub fn defaults(&self) -> BTreeMap<ColumnId, DefaultValue> {
        self.columns
            .iter()
            .filter_map(|c| Some((c.id, c.default.clone()?)))
            .collect()
    }
}

/// Find the format line: the first line mentioning "format" in any case.
pub fn find_format_line(text: &str) -> Option<(usize, &str)> {
    text.lines()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains("format"))
}

/// Parse a format line into its column layout.
pub fn parse_format_line(line: &str) -> Result<FormatSpec, FormatError> {
    let rhs = format_rhs(line)?;
    if !rhs.contains(',') {
        return Err(FormatError::unsupported_format(
            "sky model must use ',' as a field separator",
        ));
    }

    let mut columns = Vec::new();
    for token in join_bracketed(&rhs) {
        let mut parts = token.splitn(2, '=');
        let alias = parts.next().unwrap_or("").trim().to_lowercase();
        let default = parts.next().and_then(parse_default);

        if alias.is_empty() {
            return Err(FormatError::unsupported_feature(
                "skipping of columns is not yet supported",
            ));
        }
        let id = ColumnId::from_alias(&alias).ok_or(FormatError::UnknownColumn(alias))?;
        columns.push(FormatColumn { id, default });
    }

    log::debug!(
        "Format line declares {} columns: {}",
        columns.len(),
        columns
            .iter()
            .map(|c| c.id.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(FormatSpec { columns })
}

/// Reduce the line to the comma-separated column list, accepting both
/// `FORMAT = ...` and `(...) = format`.
fn format_rhs(line: &str) -> Result<String, FormatError> {
    let trimmed = line.trim().trim_matches(|c| c == '#' || c == ' ');
    let lower = trimmed.to_lowercase();
    let strip = |s: &str| {
        s.trim_matches(|c: char| c == '#' || c == ' ' || c == '(' || c == ')')
            .to_string()
    };

    if lower.ends_with("format") {
        let parts: Vec<&str> = trimmed.split('=').collect();
        Ok(strip(&parts[..parts.len() - 1].join("=")))
    } else if lower.starts_with("format") {
        let parts: Vec<&str> = trimmed.split('=').skip(1).collect();
        Ok(strip(&parts.join("=")))
    } else {
        Err(FormatError::missing_format(format!(
            "format line not understood: '{}'",
            line.trim()
        )))
    }
}

/// Split on commas, re-joining the pieces of a bracketed list default.
fn join_bracketed(rhs: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending: Option<Vec<&str>> = None;

    for piece in rhs.split(',') {
        match pending.as_mut() {
            Some(parts) => {
                parts.push(piece);
                if piece.contains(']') && !piece.contains('[') {
                    tokens.push(parts.join(","));
                    pending = None;
                }
            }
            None if piece.contains('[') && !piece.contains(']') => pending = Some(vec![piece]),
            None => tokens.push(piece.to_string()),
        }
    }
    // An unterminated list swallows the rest of the line
    if let Some(parts) = pending {
        tokens.push(parts.join(","));
    }
    tokens
}

/// Read a default literal. Non-numeric defaults are dropped.
fn parse_default(literal: &str) -> Option<DefaultValue> {
    let literal = literal.trim().trim_matches('\'').trim();
    if literal.contains('[') {
        literal
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .map(|p| p.trim().parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()
            .map(DefaultValue::List)
    } else {
        literal.parse::<f64>().ok().map(DefaultValue::Scalar)
    }
}

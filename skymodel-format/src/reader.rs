//! Sky model reader.
//!
//! The whole file is read into memory, the format line is parsed, and every
//! remaining line is either a patch definition (blank name, at least five
//! fields) or a source row. Rows are decoded column by column once all of
//! them have been collected, because RA/Dec batches and spectral-index widths
//! depend on the full column.

use std::borrow::Cow;
use std::path::Path;

use skymodel_core::angle::{parse_dec, parse_ra};
use skymodel_core::columns::bounded_text;
use skymodel_core::{
    CatalogMeta, CatalogTable, Column, ColumnData, ColumnId, ColumnKind, DefaultValue,
};

use crate::error::FormatError;
use crate::header::{FormatColumn, FormatSpec, find_format_line, parse_format_line};

/// Columns every sky model must declare.
const REQUIRED_COLUMNS: [ColumnId; 4] = [ColumnId::Name, ColumnId::Type, ColumnId::Ra, ColumnId::Dec];

/// A source row: raw tokens aligned with the format columns.
struct RawRow {
    line: u64,
    tokens: Vec<String>,
}

/// Outcome of decoding one spectral-index token.
#[derive(Debug, Clone, PartialEq)]
enum SpectralToken {
    /// Empty field: the column default applies.
    Blank,
    Parsed(Vec<f64>),
    /// Unreadable field: replaced by zeros so the rest of the file loads.
    Malformed,
}

/// Read a sky model file from disk.
pub fn read_skymodel_file(path: &Path) -> Result<CatalogTable, FormatError> {
    log::debug!("Reading {}", path.display());
    let text = std::fs::read_to_string(path)?;
    read_skymodel(&text)
}

/// Whether the text looks like a sky model (some line starts with FORMAT).
pub fn is_skymodel(text: &str) -> bool {
    text.lines()
        .any(|line| line.starts_with("FORMAT") || line.starts_with("format"))
}

/// Parse sky model text into a table.
pub fn read_skymodel(text: &str) -> Result<CatalogTable, FormatError> {
    let (header_index, header) = find_format_line(text)
        .ok_or_else(|| FormatError::missing_format("no line contains a FORMAT declaration"))?;
    let spec = parse_format_line(header)?;
    for id in REQUIRED_COLUMNS {
        if !spec.contains(id) {
            return Err(FormatError::MissingColumn(id.name()));
        }
    }

    let mut meta = CatalogMeta {
        defaults: spec.defaults(),
        ..Default::default()
    };

    // Keep one buffer line per input line so CSV positions are file line numbers
    let mut buffer = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        let skip = i == header_index || line.starts_with("FORMAT") || line.starts_with("format");
        if !skip {
            buffer.push_str(&rewrite_spectral_list(line));
        }
        buffer.push('\n');
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(buffer.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        if record.get(0).is_none_or(str::is_empty) {
            if record.len() > 4 {
                let name = bounded_text(record.get(2).unwrap_or(""));
                let ra = parse_ra(&[record.get(3).unwrap_or("")])?[0];
                let dec = parse_dec(&[record.get(4).unwrap_or("")])?[0];
                meta.patch_positions.insert(name, (ra, dec));
            }
            continue;
        }

        if record.len() > spec.len() {
            return Err(FormatError::malformed_row(
                line,
                format!("{} fields for {} columns", record.len(), spec.len()),
            ));
        }
        let mut tokens: Vec<String> = record.iter().map(str::to_string).collect();
        tokens.resize(spec.len(), String::new());
        rows.push(RawRow { line, tokens });
    }

    log::debug!("Creating table from {} rows", rows.len());
    let table = decode_rows(&spec, &rows, meta)?;
    Ok(table)
}

/// Rewrite the bracketed spectral-index list of a data line so its internal
/// commas become `;` and the brackets disappear.
///
/// `src, POINT, 0:0:0, 0.0.0, 1.0, [-0.7, 0.1]` → `... 1.0, -0.7; 0.1`
fn rewrite_spectral_list(line: &str) -> Cow<'_, str> {
    let (Some(start), Some(end)) = (line.find('['), line.rfind(']')) else {
        return Cow::Borrowed(line);
    };
    if end < start {
        return Cow::Borrowed(line);
    }
    let inner = line[start..=end]
        .trim_matches(|c| c == '[' || c == ']')
        .replace(',', ";");
    Cow::Owned(format!("{}{}{}", &line[..start], inner, &line[end + 1..]))
}

fn decode_rows(
    spec: &FormatSpec,
    rows: &[RawRow],
    mut meta: CatalogMeta,
) -> Result<CatalogTable, FormatError> {
    let mut columns = Vec::with_capacity(spec.len());

    for (j, format_column) in spec.columns.iter().enumerate() {
        let tokens: Vec<&str> = rows.iter().map(|r| r.tokens[j].as_str()).collect();
        let id = format_column.id;

        let data = match id.kind() {
            ColumnKind::Text => ColumnData::Text(
                tokens
                    .iter()
                    .map(|t| match (t.is_empty(), id.is_bounded_text()) {
                        (true, _) => None,
                        (false, true) => Some(bounded_text(t)),
                        (false, false) => Some(t.to_string()),
                    })
                    .collect(),
            ),
            ColumnKind::Float if matches!(id, ColumnId::Ra | ColumnId::Dec) => {
                decode_angles(id, &tokens)?
            }
            ColumnKind::Float => decode_floats(id, &tokens, rows)?,
            ColumnKind::FloatList => decode_spectral(format_column, &tokens),
        };

        let mut column = Column::new(id, data)?;
        if let Some(default) = &format_column.default {
            column.fill = Some(default.clone());
        }
        if id.kind() == ColumnKind::FloatList {
            let width = column.list_width();
            column.pad_lists(width);
            if let Some(DefaultValue::List(d)) = meta.defaults.get_mut(&id) {
                d.resize(width.max(d.len()), 0.0);
            }
        }
        log::debug!(
            "Column {id}: unit {}, fill {:?}",
            column.unit.map_or("none".to_string(), |u| u.to_string()),
            column.fill
        );
        columns.push(column);
    }

    Ok(CatalogTable::from_columns(columns, meta)?)
}

fn decode_angles(id: ColumnId, tokens: &[&str]) -> Result<ColumnData, FormatError> {
    let present: Vec<&str> = tokens.iter().copied().filter(|t| !t.is_empty()).collect();
    let mut degrees = match id {
        ColumnId::Ra => parse_ra(&present)?,
        _ => parse_dec(&present)?,
    }
    .into_iter();
    Ok(ColumnData::Float(
        tokens
            .iter()
            .map(|t| if t.is_empty() { None } else { degrees.next() })
            .collect(),
    ))
}

fn decode_floats(id: ColumnId, tokens: &[&str], rows: &[RawRow]) -> Result<ColumnData, FormatError> {
    tokens
        .iter()
        .zip(rows)
        .map(|(t, row)| {
            if t.is_empty() {
                return Ok(None);
            }
            t.parse::<f64>().map(Some).map_err(|_| {
                FormatError::malformed_row(row.line, format!("{id} value '{t}' is not a number"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ColumnData::Float)
}

fn classify_spectral(token: &str) -> SpectralToken {
    if token.is_empty() {
        return SpectralToken::Blank;
    }
    token
        .split(';')
        .map(|f| f.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()
        .map_or(SpectralToken::Malformed, SpectralToken::Parsed)
}

/// Decode spectral-index tokens and zero-pad them to a common width.
///
/// The width is the longest list in the file (or the default, if longer).
/// Blank tokens take the column default; malformed ones become zeros.
fn decode_spectral(column: &FormatColumn, tokens: &[&str]) -> ColumnData {
    let default = match column.default.clone().or(column.id.builtin_default()) {
        Some(DefaultValue::List(d)) => d,
        Some(DefaultValue::Scalar(v)) => vec![v],
        None => Vec::new(),
    };
    let entries: Vec<SpectralToken> = tokens.iter().map(|t| classify_spectral(t)).collect();

    let width = entries
        .iter()
        .filter_map(|e| match e {
            SpectralToken::Parsed(v) => Some(v.len()),
            _ => None,
        })
        .max()
        .unwrap_or(0)
        .max(default.len());
    log::debug!("Maximum number of spectral index terms in model: {width}");

    let lists = entries
        .into_iter()
        .map(|entry| {
            let mut list = match entry {
                SpectralToken::Parsed(v) => v,
                SpectralToken::Blank => default.clone(),
                SpectralToken::Malformed => {
                    log::warn!("Unreadable spectral index; substituting zeros");
                    Vec::new()
                }
            };
            list.resize(width, 0.0);
            list
        })
        .collect();
    ColumnData::FloatList(lists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_spectral_list() {
        assert_eq!(
            rewrite_spectral_list("a, POINT, 0:0:0, +0.0.0, 1.0, [-0.7, 0.1]"),
            "a, POINT, 0:0:0, +0.0.0, 1.0, -0.7; 0.1"
        );
        assert_eq!(
            rewrite_spectral_list("a, POINT, 0:0:0, +0.0.0, [0.5], 1e8"),
            "a, POINT, 0:0:0, +0.0.0, 0.5, 1e8"
        );
        assert!(matches!(rewrite_spectral_list("a, b"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_classify_spectral() {
        assert_eq!(classify_spectral(""), SpectralToken::Blank);
        assert_eq!(
            classify_spectral("-0.7;0.1"),
            SpectralToken::Parsed(vec![-0.7, 0.1])
        );
        assert_eq!(classify_spectral("-0.7;x"), SpectralToken::Malformed);
    }

    #[test]
    fn test_decode_spectral_widths() {
        let column = FormatColumn {
            id: ColumnId::SpectralIndex,
            default: Some(DefaultValue::List(vec![-0.8])),
        };
        let data = decode_spectral(&column, &["-0.7;0.1;0.01", "", "bad", "-0.5"]);
        assert_eq!(
            data,
            ColumnData::FloatList(vec![
                vec![-0.7, 0.1, 0.01],
                vec![-0.8, 0.0, 0.0],
                vec![0.0, 0.0, 0.0],
                vec![-0.5, 0.0, 0.0],
            ])
        );
    }

    #[test]
    fn test_is_skymodel() {
        assert!(is_skymodel("# header\nFORMAT = Name, Type, Ra, Dec\n"));
        assert!(!is_skymodel("# (Name, Type, Ra, Dec) = format\n"));
    }
}

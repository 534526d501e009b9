//! Sky model writer.
//!
//! Output layout:
//!
//! ```text
//! FORMAT = Name, Type, Patch, Ra, Dec, I, SpectralIndex='[]'
//!
//!  , , bright, 12:34:56.7000, +01.02.03.000
//! src1, POINT, bright, 12:34:56.7000, +01.02.03.000, 1.5, [-0.7, 0.1]
//! ```
//!
//! Unset cells are written as blank fields and trailing blanks are dropped.

use std::io::Write;
use std::path::Path;

use skymodel_core::angle::{format_dec, format_ra};
use skymodel_core::{CatalogTable, Column, ColumnData, ColumnId, DefaultValue};

use crate::error::FormatError;

/// Numeric value marking an intentionally unset cell.
pub const FILL_SENTINEL: f64 = -9999.0;

const BLANK: &str = " ";

/// Write a table to a sky model file, replacing any existing file.
pub fn write_skymodel_file(table: &CatalogTable, path: &Path) -> Result<(), FormatError> {
    log::debug!("Writing model to {}", path.display());
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_skymodel(table, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Write a table as sky model text.
pub fn write_skymodel(table: &CatalogTable, out: &mut dyn Write) -> Result<(), FormatError> {
    let mut table = table.clone();
    table.normalize_units();

    writeln!(out, "{}", format_header(&table))?;
    writeln!(out)?;

    if table.has_patches() {
        let (unpatched, named): (Vec<_>, Vec<_>) = table
            .patch_groups()
            .into_iter()
            .partition(|(patch, _)| patch.is_none());
        for (patch, rows) in named {
            let name = patch.unwrap_or_default();
            let (ra, dec) = table
                .meta
                .patch_positions
                .get(&name)
                .copied()
                .unwrap_or((0.0, 0.0));
            writeln!(out, " , , {name}, {}, {}", format_ra(ra), format_dec(dec))?;
            for row in rows {
                writeln!(out, "{}", render_row(&table, row))?;
            }
        }
        // Rows without a patch go last, after every patch line
        for row in unpatched.into_iter().flat_map(|(_, rows)| rows) {
            writeln!(out, "{}", render_row(&table, row))?;
        }
    } else {
        for row in 0..table.row_count() {
            writeln!(out, "{}", render_row(&table, row))?;
        }
    }
    Ok(())
}

/// Build the FORMAT line for the columns present in `table`.
pub fn format_header(table: &CatalogTable) -> String {
    let columns: Vec<String> = table
        .column_ids()
        .map(|id| match table.meta.defaults.get(&id) {
            Some(default) => format!("{id}='{}'", format_default(default)),
            None if id == ColumnId::SpectralIndex => format!("{id}='[]'"),
            None => id.name().to_string(),
        })
        .collect();
    format!("FORMAT = {}", columns.join(", "))
}

fn format_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Scalar(v) => format_number(*v),
        DefaultValue::List(v) => format_list(v),
    }
}

/// Shortest round-trip form, always with a decimal point or exponent.
pub(crate) fn format_number(v: f64) -> String {
    format!("{v:?}")
}

fn format_list(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format_number(*v)).collect();
    format!("[{}]", parts.join(", "))
}

/// Render one row in column order.
fn render_row(table: &CatalogTable, row: usize) -> String {
    let mut fields: Vec<String> = table
        .columns()
        .iter()
        .map(|column| render_cell(table, column, row))
        .collect();

    while fields.len() > 1 && fields.last().is_some_and(|f| f == BLANK) {
        fields.pop();
    }
    fields.join(", ")
}

fn render_cell(table: &CatalogTable, column: &Column, row: usize) -> String {
    match &column.data {
        ColumnData::Text(values) => match &values[row] {
            Some(s) => s.clone(),
            None => BLANK.to_string(),
        },
        ColumnData::Float(values) => match values[row] {
            None => BLANK.to_string(),
            Some(v) if v == FILL_SENTINEL => BLANK.to_string(),
            Some(v) => match column.id {
                ColumnId::Ra => format_ra(v),
                ColumnId::Dec => format_dec(v),
                _ => format_number(v),
            },
        },
        ColumnData::FloatList(values) => {
            let list = &values[row];
            if list.contains(&FILL_SENTINEL) {
                return BLANK.to_string();
            }
            let default = match table.meta.defaults.get(&column.id) {
                Some(DefaultValue::List(d)) => Some(d.clone()),
                Some(DefaultValue::Scalar(v)) => Some(vec![*v]),
                None => column
                    .id
                    .builtin_default()
                    .map(|d| match d {
                        DefaultValue::List(d) => d,
                        DefaultValue::Scalar(v) => vec![v],
                    }),
            };
            if default.as_deref() == Some(list.as_slice()) {
                "[]".to_string()
            } else {
                format_list(list)
            }
        }
    }
}

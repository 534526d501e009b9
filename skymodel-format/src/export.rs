//! Output formats: the sky model itself plus ds9 and kvis overlays.
//!
//! Each format is a plain function over the table; [`OutputFormat`] maps the
//! user-facing name (or output file extension) to the function.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use skymodel_core::{CatalogTable, ColumnId};

use crate::error::FormatError;
use crate::writer::{format_number, write_skymodel};

/// Axes smaller than this (in arcsec) are drawn with [`DS9_AXIS_FLOOR`].
const DS9_MIN_AXIS: f64 = 1.0 / 3600.0;
const DS9_AXIS_FLOOR: f64 = 1.0;
/// Marker radius (degrees) for point sources in kvis.
const KVIS_POINT_RADIUS: f64 = 0.02;
/// Label offset in RA (degrees) for kvis text.
const KVIS_LABEL_OFFSET: f64 = 0.07;

const DS9_HEADER: &str = "# Region file format: DS9 version 4.0\n\
global color=green font=\"helvetica 10 normal\" select=1 highlite=1 edit=1 \
move=1 delete=1 include=1 fixed=0 source\n\
fk5";

pub type WriteFn = fn(&CatalogTable, &mut dyn Write) -> Result<(), FormatError>;

/// A supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    SkyModel,
    Ds9,
    Kvis,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::SkyModel, OutputFormat::Ds9, OutputFormat::Kvis];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::SkyModel => "makesourcedb",
            OutputFormat::Ds9 => "ds9",
            OutputFormat::Kvis => "kvis",
        }
    }

    pub fn writer(self) -> WriteFn {
        match self {
            OutputFormat::SkyModel => write_skymodel,
            OutputFormat::Ds9 => write_ds9,
            OutputFormat::Kvis => write_kvis,
        }
    }

    /// Pick a format from a file extension: `.reg` is ds9, `.ann` is kvis,
    /// anything else a sky model.
    pub fn from_path(path: &Path) -> OutputFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("reg") => OutputFormat::Ds9,
            Some("ann") => OutputFormat::Kvis,
            _ => OutputFormat::SkyModel,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| FormatError::unsupported_format(format!("unknown output format '{s}'")))
    }
}

/// Write `table` to `path` in the given format.
pub fn write_file(table: &CatalogTable, path: &Path, format: OutputFormat) -> Result<(), FormatError> {
    log::debug!("Writing {format} file to {}", path.display());
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    (format.writer())(table, &mut file)?;
    file.flush()?;
    Ok(())
}

/// One source as the overlay writers see it.
struct Marker<'a> {
    name: &'a str,
    ra: f64,
    dec: f64,
    /// Major axis, minor axis (arcsec) and orientation (degrees) of a Gaussian.
    shape: Option<(f64, f64, f64)>,
}

fn markers(table: &CatalogTable) -> Result<Vec<Marker<'_>>, FormatError> {
    let ra = table
        .column(ColumnId::Ra)
        .ok_or(FormatError::MissingColumn(ColumnId::Ra.name()))?;
    let dec = table
        .column(ColumnId::Dec)
        .ok_or(FormatError::MissingColumn(ColumnId::Dec.name()))?;
    let names = table.column(ColumnId::Name);
    let types = table.column(ColumnId::Type);
    let axis = |id: ColumnId, row: usize| {
        table
            .column(id)
            .and_then(|c| c.float_or_fill(row))
            .unwrap_or(0.0)
    };

    let mut out = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let (Some(ra), Some(dec)) = (ra.float(row), dec.float(row)) else {
            log::debug!("Skipping row {row} without a position");
            continue;
        };
        let gaussian = types
            .and_then(|c| c.text(row))
            .is_some_and(|t| t.eq_ignore_ascii_case("gaussian"));
        let shape = gaussian.then(|| {
            (
                axis(ColumnId::MajorAxis, row),
                axis(ColumnId::MinorAxis, row),
                axis(ColumnId::Orientation, row),
            )
        });
        out.push(Marker {
            name: names.and_then(|c| c.text(row)).unwrap_or(""),
            ra,
            dec,
            shape,
        });
    }
    Ok(out)
}

/// Write a ds9 region file.
pub fn write_ds9(table: &CatalogTable, out: &mut dyn Write) -> Result<(), FormatError> {
    let mut table = table.clone();
    table.normalize_units();

    writeln!(out, "{DS9_HEADER}")?;
    for m in markers(&table)? {
        let (ra, dec) = (format_number(m.ra), format_number(m.dec));
        match m.shape {
            Some((a, b, pa)) => {
                let a = if a < DS9_MIN_AXIS { DS9_AXIS_FLOOR } else { a };
                let b = if b < DS9_MIN_AXIS { DS9_AXIS_FLOOR } else { b };
                writeln!(
                    out,
                    "ellipse({ra}, {dec}, {}\", {}\", {}) # text={{{}}}",
                    format_number(a),
                    format_number(b),
                    format_number(pa + 90.0),
                    m.name
                )?;
            }
            None => writeln!(out, "point({ra}, {dec}) # point=cross width=2 text={{{}}}", m.name)?,
        }
    }
    Ok(())
}

/// Write a kvis annotation file.
pub fn write_kvis(table: &CatalogTable, out: &mut dyn Write) -> Result<(), FormatError> {
    let mut table = table.clone();
    table.normalize_units();

    for m in markers(&table)? {
        let (ra, dec) = (format_number(m.ra), format_number(m.dec));
        match m.shape {
            Some((a, b, pa)) => writeln!(
                out,
                "ELLIPSE W {ra} {dec} {} {} {}",
                format_number(a / 3600.0),
                format_number(b / 3600.0),
                format_number(pa)
            )?,
            None => writeln!(out, "CIRCLE W {ra} {dec} {}", format_number(KVIS_POINT_RADIUS))?,
        }
        writeln!(
            out,
            "TEXT W {} {dec} {}",
            format_number(m.ra - KVIS_LABEL_OFFSET),
            m.name
        )?;
    }
    Ok(())
}

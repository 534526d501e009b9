//! Right ascension and declination conversion.
//!
//! Sky model files store positions in sexagesimal notation:
//!
//! ```text
//! RA:   HH:MM:SS.ss      (colon separated, hours)
//! Dec:  +DD.MM.SS.ss     (first two dots separate the fields, degrees)
//! ```
//!
//! Plain decimal degrees are accepted as well. A batch of values is either
//! all sexagesimal or all numeric; the first element decides which.

use crate::error::CatalogError;

/// Fractional digits of the seconds field when rendering RA.
const RA_FRAC_DIGITS: u32 = 4;
/// Fractional digits of the seconds field when rendering Dec.
const DEC_FRAC_DIGITS: u32 = 3;

/// Convert a batch of RA tokens to decimal degrees.
///
/// If the first token parses as a number the whole batch is read as degrees,
/// otherwise every token must be `HH:MM:SS`.
pub fn parse_ra<S: AsRef<str>>(values: &[S]) -> Result<Vec<f64>, CatalogError> {
    parse_batch(values, ra_to_degrees)
}

/// Convert a batch of Dec tokens to decimal degrees.
///
/// Same batch rule as [`parse_ra`]; sexagesimal tokens are `DD.MM.SS`.
pub fn parse_dec<S: AsRef<str>>(values: &[S]) -> Result<Vec<f64>, CatalogError> {
    parse_batch(values, dec_to_degrees)
}

fn parse_batch<S: AsRef<str>>(
    values: &[S],
    sexagesimal: fn(&str) -> Result<f64, CatalogError>,
) -> Result<Vec<f64>, CatalogError> {
    let Some(first) = values.first() else {
        return Ok(Vec::new());
    };

    if first.as_ref().trim().parse::<f64>().is_ok() {
        values
            .iter()
            .map(|v| {
                let v = v.as_ref().trim();
                v.parse::<f64>()
                    .map_err(|_| CatalogError::angle_format(format!("expected degrees, got '{v}'")))
            })
            .collect()
    } else {
        values.iter().map(|v| sexagesimal(v.as_ref())).collect()
    }
}

/// Convert a single `HH:MM:SS.ss` token to degrees.
pub fn ra_to_degrees(token: &str) -> Result<f64, CatalogError> {
    let token = token.trim();
    let [h, m, s] = three_fields(token, token.split(':'))?;
    Ok((h + m / 60.0 + s / 3600.0) * 15.0)
}

/// Convert a single `DD.MM.SS.ss` token to degrees.
///
/// Only the first two dots separate fields; anything after the second dot is
/// the seconds value. The sign of the degree field applies to the whole
/// angle, so `-00.30.00` is -0.5 degrees.
pub fn dec_to_degrees(token: &str) -> Result<f64, CatalogError> {
    let token = token.trim();
    let [d, m, s] = three_fields(token, token.splitn(3, '.'))?;
    let magnitude = d.abs() + m / 60.0 + s / 3600.0;
    if token.starts_with('-') {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

fn three_fields<'a>(
    token: &str,
    parts: impl Iterator<Item = &'a str>,
) -> Result<[f64; 3], CatalogError> {
    let fields: Vec<&str> = parts.collect();
    if fields.len() != 3 {
        return Err(CatalogError::angle_format(format!(
            "'{token}' does not have three fields"
        )));
    }
    let mut out = [0.0; 3];
    for (slot, field) in out.iter_mut().zip(&fields) {
        *slot = field
            .trim()
            .parse()
            .map_err(|_| CatalogError::angle_format(format!("'{token}'")))?;
    }
    Ok(out)
}

/// Render degrees as `HH:MM:SS.ssss`, wrapped into [0h, 24h).
pub fn format_ra(degrees: f64) -> String {
    let scale = 10_i64.pow(RA_FRAC_DIGITS);
    let per_day = 24 * 3600 * scale;
    let wrapped = degrees.rem_euclid(360.0);
    // Round once on the smallest unit so carries propagate into minutes/hours
    let ticks = ((wrapped / 15.0 * 3600.0) * scale as f64).round() as i64 % per_day;

    let frac = ticks % scale;
    let secs = ticks / scale;
    format!(
        "{:02}:{:02}:{:02}.{:0width$}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        frac,
        width = RA_FRAC_DIGITS as usize
    )
}

/// Render degrees as `±DD.MM.SS.sss`.
pub fn format_dec(degrees: f64) -> String {
    let scale = 10_i64.pow(DEC_FRAC_DIGITS);
    let sign = if degrees < 0.0 { '-' } else { '+' };
    let ticks = (degrees.abs() * 3600.0 * scale as f64).round() as i64;

    let frac = ticks % scale;
    let secs = ticks / scale;
    format!(
        "{sign}{:02}.{:02}.{:02}.{:0width$}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        frac,
        width = DEC_FRAC_DIGITS as usize
    )
}

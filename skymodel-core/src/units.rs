//! Physical units carried by catalog columns.
//!
//! Columns remember the unit their values are stored in. Writers convert
//! back to the canonical unit of each column before emitting text, so a
//! column scaled to arcmin or mJy by a caller still round-trips.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Unit of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Degree,
    Arcmin,
    Arcsec,
    Radian,
    Jansky,
    MilliJansky,
    Hertz,
    KiloHertz,
    MegaHertz,
    GigaHertz,
    RadianPerSquareMetre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Angle,
    FluxDensity,
    Frequency,
    RotationMeasure,
}

impl Unit {
    fn dimension(self) -> Dimension {
        match self {
            Unit::Degree | Unit::Arcmin | Unit::Arcsec | Unit::Radian => Dimension::Angle,
            Unit::Jansky | Unit::MilliJansky => Dimension::FluxDensity,
            Unit::Hertz | Unit::KiloHertz | Unit::MegaHertz | Unit::GigaHertz => {
                Dimension::Frequency
            }
            Unit::RadianPerSquareMetre => Dimension::RotationMeasure,
        }
    }

    /// Size of one of this unit in the base unit of its dimension
    /// (degree, Jy, Hz, rad/m^2).
    fn scale(self) -> f64 {
        match self {
            Unit::Degree => 1.0,
            Unit::Arcmin => 1.0 / 60.0,
            Unit::Arcsec => 1.0 / 3600.0,
            Unit::Radian => 180.0 / std::f64::consts::PI,
            Unit::Jansky => 1.0,
            Unit::MilliJansky => 1e-3,
            Unit::Hertz => 1.0,
            Unit::KiloHertz => 1e3,
            Unit::MegaHertz => 1e6,
            Unit::GigaHertz => 1e9,
            Unit::RadianPerSquareMetre => 1.0,
        }
    }

    /// Multiplicative factor converting values in `self` to values in `target`.
    ///
    /// Returns `None` when the two units measure different quantities.
    pub fn factor_to(self, target: Unit) -> Option<f64> {
        if self.dimension() != target.dimension() {
            return None;
        }
        Some(self.scale() / target.scale())
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Degree => "deg",
            Unit::Arcmin => "arcmin",
            Unit::Arcsec => "arcsec",
            Unit::Radian => "rad",
            Unit::Jansky => "Jy",
            Unit::MilliJansky => "mJy",
            Unit::Hertz => "Hz",
            Unit::KiloHertz => "kHz",
            Unit::MegaHertz => "MHz",
            Unit::GigaHertz => "GHz",
            Unit::RadianPerSquareMetre => "rad/m^2",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deg" | "degree" | "degrees" => Ok(Unit::Degree),
            "arcmin" => Ok(Unit::Arcmin),
            "arcsec" => Ok(Unit::Arcsec),
            "rad" | "radian" | "radians" => Ok(Unit::Radian),
            "Jy" | "jy" => Ok(Unit::Jansky),
            "mJy" | "mjy" => Ok(Unit::MilliJansky),
            "Hz" | "hz" => Ok(Unit::Hertz),
            "kHz" | "khz" => Ok(Unit::KiloHertz),
            "MHz" | "mhz" => Ok(Unit::MegaHertz),
            "GHz" | "ghz" => Ok(Unit::GigaHertz),
            "rad/m^2" | "rad/m2" => Ok(Unit::RadianPerSquareMetre),
            other => Err(CatalogError::invalid_value("unit", other)),
        }
    }
}

//! The fixed allow-list of sky model columns.
//!
//! Every column a sky model may carry is listed in [`COLUMNS`] together with
//! its lowercase alias, canonical unit, built-in default and value kind. The
//! header parser and the writers both go through this table.

use std::fmt;

use crate::units::Unit;

/// Maximum stored length of `Name`, `Type` and `Patch` values.
pub const MAX_TEXT_LEN: usize = 50;

/// Canonical identifier of an allowed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    Name,
    Type,
    Patch,
    Ra,
    Dec,
    I,
    Q,
    U,
    V,
    MajorAxis,
    MinorAxis,
    Orientation,
    IShapelet,
    QShapelet,
    UShapelet,
    VShapelet,
    Category,
    RotationMeasure,
    PolarizationAngle,
    PolarizedFraction,
    ReferenceWavelength,
    ReferenceFrequency,
    SpectralIndex,
}

/// Storage kind of a column, chosen once from the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    FloatList,
}

/// A format-level or built-in default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Scalar(f64),
    List(Vec<f64>),
}

/// Built-in default of a column as listed in [`COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuiltinDefault {
    None,
    Scalar(f64),
    List(&'static [f64]),
}

impl BuiltinDefault {
    pub fn to_default(self) -> Option<DefaultValue> {
        match self {
            BuiltinDefault::None => None,
            BuiltinDefault::Scalar(v) => Some(DefaultValue::Scalar(v)),
            BuiltinDefault::List(v) => Some(DefaultValue::List(v.to_vec())),
        }
    }
}

/// One row of the allow-list.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub alias: &'static str,
    pub name: &'static str,
    pub unit: Option<Unit>,
    pub default: BuiltinDefault,
    pub kind: ColumnKind,
}

const fn spec(
    id: ColumnId,
    alias: &'static str,
    name: &'static str,
    unit: Option<Unit>,
    default: BuiltinDefault,
    kind: ColumnKind,
) -> ColumnSpec {
    ColumnSpec {
        id,
        alias,
        name,
        unit,
        default,
        kind,
    }
}

use BuiltinDefault as D;
use ColumnKind as K;

pub static COLUMNS: &[ColumnSpec] = &[
    spec(ColumnId::Name, "name", "Name", None, D::None, K::Text),
    spec(ColumnId::Type, "type", "Type", None, D::None, K::Text),
    spec(ColumnId::Patch, "patch", "Patch", None, D::None, K::Text),
    spec(ColumnId::Ra, "ra", "Ra", Some(Unit::Degree), D::None, K::Float),
    spec(ColumnId::Dec, "dec", "Dec", Some(Unit::Degree), D::None, K::Float),
    spec(ColumnId::I, "i", "I", Some(Unit::Jansky), D::Scalar(0.0), K::Float),
    spec(ColumnId::Q, "q", "Q", Some(Unit::Jansky), D::Scalar(0.0), K::Float),
    spec(ColumnId::U, "u", "U", Some(Unit::Jansky), D::Scalar(0.0), K::Float),
    spec(ColumnId::V, "v", "V", Some(Unit::Jansky), D::Scalar(0.0), K::Float),
    spec(ColumnId::MajorAxis, "majoraxis", "MajorAxis", Some(Unit::Arcsec), D::Scalar(0.0), K::Float),
    spec(ColumnId::MinorAxis, "minoraxis", "MinorAxis", Some(Unit::Arcsec), D::Scalar(0.0), K::Float),
    spec(ColumnId::Orientation, "orientation", "Orientation", Some(Unit::Degree), D::Scalar(0.0), K::Float),
    spec(ColumnId::IShapelet, "ishapelet", "IShapelet", None, D::None, K::Text),
    spec(ColumnId::QShapelet, "qshapelet", "QShapelet", None, D::None, K::Text),
    spec(ColumnId::UShapelet, "ushapelet", "UShapelet", None, D::None, K::Text),
    spec(ColumnId::VShapelet, "vshapelet", "VShapelet", None, D::None, K::Text),
    spec(ColumnId::Category, "category", "Category", None, D::Scalar(2.0), K::Float),
    spec(ColumnId::RotationMeasure, "rotationmeasure", "RotationMeasure", Some(Unit::RadianPerSquareMetre), D::Scalar(0.0), K::Float),
    spec(ColumnId::PolarizationAngle, "polarizationangle", "PolarizationAngle", Some(Unit::Radian), D::Scalar(0.0), K::Float),
    spec(ColumnId::PolarizedFraction, "polarizedfraction", "PolarizedFraction", None, D::Scalar(0.0), K::Float),
    spec(ColumnId::ReferenceWavelength, "referencewavelength", "ReferenceWavelength", None, D::None, K::Float),
    spec(ColumnId::ReferenceFrequency, "referencefrequency", "ReferenceFrequency", Some(Unit::Hertz), D::Scalar(0.0), K::Float),
    spec(ColumnId::SpectralIndex, "spectralindex", "SpectralIndex", None, D::List(&[0.0]), K::FloatList),
];

impl ColumnId {
    /// Look up a column by its header alias (case-insensitive).
    pub fn from_alias(alias: &str) -> Option<ColumnId> {
        let lower = alias.trim().to_lowercase();
        COLUMNS.iter().find(|c| c.alias == lower).map(|c| c.id)
    }

    pub fn spec(self) -> &'static ColumnSpec {
        // COLUMNS is declared in enum order
        &COLUMNS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn kind(self) -> ColumnKind {
        self.spec().kind
    }

    pub fn canonical_unit(self) -> Option<Unit> {
        self.spec().unit
    }

    pub fn builtin_default(self) -> Option<DefaultValue> {
        self.spec().default.to_default()
    }

    /// Whether stored values are truncated to [`MAX_TEXT_LEN`] characters.
    pub fn is_bounded_text(self) -> bool {
        matches!(self, ColumnId::Name | ColumnId::Type | ColumnId::Patch)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Truncate a text value to [`MAX_TEXT_LEN`] characters.
pub fn bounded_text(value: &str) -> String {
    value.chars().take(MAX_TEXT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_in_enum_order() {
        for (i, spec) in COLUMNS.iter().enumerate() {
            assert_eq!(spec.id as usize, i, "{} out of order", spec.name);
            assert_eq!(spec.alias, spec.name.to_lowercase());
        }
    }

    #[test]
    fn test_from_alias_case_insensitive() {
        assert_eq!(ColumnId::from_alias("RA"), Some(ColumnId::Ra));
        assert_eq!(ColumnId::from_alias(" spectralIndex "), Some(ColumnId::SpectralIndex));
        assert_eq!(ColumnId::from_alias("flux"), None);
    }

    #[test]
    fn test_builtin_defaults() {
        assert_eq!(ColumnId::Name.builtin_default(), None);
        assert_eq!(ColumnId::Category.builtin_default(), Some(DefaultValue::Scalar(2.0)));
        assert_eq!(
            ColumnId::SpectralIndex.builtin_default(),
            Some(DefaultValue::List(vec![0.0]))
        );
    }

    #[test]
    fn test_bounded_text() {
        let long = "x".repeat(80);
        assert_eq!(bounded_text(&long).len(), MAX_TEXT_LEN);
        assert_eq!(bounded_text("3C196"), "3C196");
    }
}

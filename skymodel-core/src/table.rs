//! In-memory columnar sky model.
//!
//! A [`CatalogTable`] is an ordered list of [`Column`]s of equal length plus
//! [`CatalogMeta`]: the format-level defaults declared in the header and the
//! reference position of every patch.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::angle::{dec_to_degrees, ra_to_degrees};
use crate::columns::{ColumnId, ColumnKind, DefaultValue, bounded_text};
use crate::error::CatalogError;
use crate::units::Unit;

/// Values of one column. `None` marks an unset cell (blank in the file).
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
    /// Spectral-index style lists; every row has the same length.
    FloatList(Vec<Vec<f64>>),
}

impl ColumnData {
    fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => ColumnData::Text(Vec::new()),
            ColumnKind::Float => ColumnData::Float(Vec::new()),
            ColumnKind::FloatList => ColumnData::FloatList(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::FloatList(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Float(_) => "numeric",
            ColumnData::FloatList(_) => "list",
        }
    }
}

/// A single scalar or list value assigned to a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Float(f64),
    List(Vec<f64>),
}

impl CellValue {
    /// Parse a literal for the given column, following its allow-list kind.
    ///
    /// `Ra` and `Dec` accept sexagesimal as well as degrees. List literals may
    /// be written `[a, b]` or `a;b`.
    pub fn parse_for(id: ColumnId, literal: &str) -> Result<CellValue, CatalogError> {
        let literal = literal.trim();
        match id.kind() {
            ColumnKind::Text => Ok(CellValue::Text(literal.to_string())),
            ColumnKind::Float => {
                if let Ok(v) = literal.parse::<f64>() {
                    return Ok(CellValue::Float(v));
                }
                match id {
                    ColumnId::Ra => ra_to_degrees(literal).map(CellValue::Float),
                    ColumnId::Dec => dec_to_degrees(literal).map(CellValue::Float),
                    _ => Err(CatalogError::invalid_value(id.name(), literal)),
                }
            }
            ColumnKind::FloatList => {
                let inner = literal.trim_matches(|c| c == '[' || c == ']');
                inner
                    .split([',', ';'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<f64>()
                            .map_err(|_| CatalogError::invalid_value(id.name(), literal))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(CellValue::List)
            }
        }
    }
}

/// A named column with its unit and fill value.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub unit: Option<Unit>,
    /// Value substituted for unset cells: the header default if one was
    /// declared, else the allow-list default.
    pub fill: Option<DefaultValue>,
    pub data: ColumnData,
}

impl Column {
    /// Create a column with the canonical unit and built-in fill value.
    pub fn new(id: ColumnId, data: ColumnData) -> Result<Self, CatalogError> {
        let expected = ColumnData::empty(id.kind());
        if std::mem::discriminant(&expected) != std::mem::discriminant(&data) {
            return Err(CatalogError::ColumnKind {
                column: id.name(),
                expected: expected.kind_name(),
            });
        }
        Ok(Self {
            id,
            unit: id.canonical_unit(),
            fill: id.builtin_default(),
            data,
        })
    }

    /// A column of `rows` unset cells. List columns get zero lists of `width`.
    pub fn unset(id: ColumnId, rows: usize, width: usize) -> Self {
        let data = match id.kind() {
            ColumnKind::Text => ColumnData::Text(vec![None; rows]),
            ColumnKind::Float => ColumnData::Float(vec![None; rows]),
            ColumnKind::FloatList => ColumnData::FloatList(vec![vec![0.0; width]; rows]),
        };
        Self {
            id,
            unit: id.canonical_unit(),
            fill: id.builtin_default(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the per-row lists of a list column, 0 otherwise.
    pub fn list_width(&self) -> usize {
        match &self.data {
            ColumnData::FloatList(v) => v.first().map_or_else(
                || match &self.fill {
                    Some(DefaultValue::List(d)) => d.len(),
                    _ => 0,
                },
                Vec::len,
            ),
            _ => 0,
        }
    }

    pub fn text(&self, row: usize) -> Option<&str> {
        match &self.data {
            ColumnData::Text(v) => v.get(row)?.as_deref(),
            _ => None,
        }
    }

    pub fn float(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Float(v) => *v.get(row)?,
            _ => None,
        }
    }

    /// Numeric value of a cell, falling back to the column's fill value.
    pub fn float_or_fill(&self, row: usize) -> Option<f64> {
        self.float(row).or(match self.fill {
            Some(DefaultValue::Scalar(v)) => Some(v),
            _ => None,
        })
    }

    pub fn list(&self, row: usize) -> Option<&[f64]> {
        match &self.data {
            ColumnData::FloatList(v) => v.get(row).map(Vec::as_slice),
            _ => None,
        }
    }

    /// Pad every list (and a list fill value) with trailing zeros to `width`.
    pub fn pad_lists(&mut self, width: usize) {
        if let ColumnData::FloatList(rows) = &mut self.data {
            for row in rows.iter_mut() {
                row.resize(width.max(row.len()), 0.0);
            }
        }
        if let Some(DefaultValue::List(fill)) = &mut self.fill {
            fill.resize(width.max(fill.len()), 0.0);
        }
    }

    fn extend_unset(&mut self, rows: usize) {
        let width = self.list_width();
        match &mut self.data {
            ColumnData::Text(v) => v.extend(std::iter::repeat_n(None, rows)),
            ColumnData::Float(v) => v.extend(std::iter::repeat_n(None, rows)),
            ColumnData::FloatList(v) => v.extend(std::iter::repeat_n(vec![0.0; width], rows)),
        }
    }

    fn extend_from(&mut self, mut other: Column) -> Result<(), CatalogError> {
        if let (Some(from), Some(to)) = (other.unit, self.unit) {
            if from != to {
                other.convert_unit(to);
            }
        }
        match (&mut self.data, other.data) {
            (ColumnData::Text(a), ColumnData::Text(b)) => a.extend(b),
            (ColumnData::Float(a), ColumnData::Float(b)) => a.extend(b),
            (ColumnData::FloatList(a), ColumnData::FloatList(b)) => {
                let width = a.first().map_or(0, Vec::len).max(b.first().map_or(0, Vec::len));
                a.extend(b);
                for row in a.iter_mut() {
                    row.resize(width, 0.0);
                }
                if let Some(DefaultValue::List(fill)) = &mut self.fill {
                    fill.resize(width.max(fill.len()), 0.0);
                }
            }
            (data, _) => {
                return Err(CatalogError::ColumnKind {
                    column: self.id.name(),
                    expected: data.kind_name(),
                });
            }
        }
        Ok(())
    }

    /// Rescale numeric values into `target`. No-op for incompatible units.
    pub fn convert_unit(&mut self, target: Unit) {
        let Some(current) = self.unit else {
            return;
        };
        let Some(factor) = current.factor_to(target) else {
            log::warn!(
                "Cannot convert column {} from {current} to {target}",
                self.id
            );
            return;
        };
        if let ColumnData::Float(values) = &mut self.data {
            for v in values.iter_mut().flatten() {
                *v *= factor;
            }
        }
        if let Some(DefaultValue::Scalar(v)) = &mut self.fill {
            *v *= factor;
        }
        self.unit = Some(target);
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        fn retain<T>(v: &mut Vec<T>, keep: &[bool]) {
            let mut i = 0;
            v.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
        match &mut self.data {
            ColumnData::Text(v) => retain(v, keep),
            ColumnData::Float(v) => retain(v, keep),
            ColumnData::FloatList(v) => retain(v, keep),
        }
    }

    fn set_all(&mut self, value: &CellValue, rows: usize) -> Result<(), CatalogError> {
        match (&mut self.data, value) {
            (ColumnData::Text(v), CellValue::Text(s)) => {
                let s = if self.id.is_bounded_text() {
                    bounded_text(s)
                } else {
                    s.clone()
                };
                *v = vec![Some(s); rows];
            }
            (ColumnData::Float(v), CellValue::Float(x)) => *v = vec![Some(*x); rows],
            (ColumnData::FloatList(v), CellValue::List(list)) => {
                *v = vec![list.clone(); rows];
                if let Some(DefaultValue::List(fill)) = &mut self.fill {
                    fill.resize(list.len().max(fill.len()), 0.0);
                }
            }
            (data, _) => {
                return Err(CatalogError::ColumnKind {
                    column: self.id.name(),
                    expected: data.kind_name(),
                });
            }
        }
        Ok(())
    }
}

/// How a patch's reference position is derived from its member rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchPosition {
    /// Midpoint of the RA and Dec extents of the members.
    Mid,
    /// Plain mean of member positions.
    Mean,
    /// Mean weighted by Stokes I.
    WeightedMean,
}

/// Catalog-level metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogMeta {
    /// Defaults declared in the FORMAT header, keyed by column.
    pub defaults: BTreeMap<ColumnId, DefaultValue>,
    /// Reference position (RA, Dec in degrees) of every patch.
    pub patch_positions: BTreeMap<String, (f64, f64)>,
}

/// An ordered set of equal-length columns plus metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    columns: Vec<Column>,
    row_count: usize,
    pub meta: CatalogMeta,
}

impl CatalogTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, checking that every column has the same length.
    pub fn from_columns(columns: Vec<Column>, meta: CatalogMeta) -> Result<Self, CatalogError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            row_count,
            meta,
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_ids(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.columns.iter().map(|c| c.id)
    }

    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn has_column(&self, id: ColumnId) -> bool {
        self.column_index(id).is_some()
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    /// Append a column, replacing any existing column with the same id.
    ///
    /// The first column added to an empty table sets the row count.
    pub fn push_column(&mut self, column: Column) -> Result<(), CatalogError> {
        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        if column.len() != self.row_count {
            return Err(CatalogError::LengthMismatch {
                column: column.id.name(),
                expected: self.row_count,
                found: column.len(),
            });
        }
        match self.column_index(column.id) {
            Some(i) => self.columns[i] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Insert a column at `index` (clamped to the column count).
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<(), CatalogError> {
        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        if column.len() != self.row_count {
            return Err(CatalogError::LengthMismatch {
                column: column.id.name(),
                expected: self.row_count,
                found: column.len(),
            });
        }
        self.take_column(column.id);
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        Ok(())
    }

    /// Remove a column, returning it along with its former position.
    pub fn take_column(&mut self, id: ColumnId) -> Option<(usize, Column)> {
        let index = self.column_index(id)?;
        Some((index, self.columns.remove(index)))
    }

    pub fn texts(&self, id: ColumnId) -> Option<&[Option<String>]> {
        match &self.column(id)?.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn floats(&self, id: ColumnId) -> Option<&[Option<f64>]> {
        match &self.column(id)?.data {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn lists(&self, id: ColumnId) -> Option<&[Vec<f64>]> {
        match &self.column(id)?.data {
            ColumnData::FloatList(v) => Some(v),
            _ => None,
        }
    }

    /// Source names, one per row.
    pub fn names(&self) -> Vec<Option<&str>> {
        match self.texts(ColumnId::Name) {
            Some(names) => names.iter().map(Option::as_deref).collect(),
            None => vec![None; self.row_count],
        }
    }

    /// Overwrite the name of one row (bounded to the text limit).
    pub fn set_name(&mut self, row: usize, name: &str) {
        if let Some(Column {
            data: ColumnData::Text(names),
            ..
        }) = self.column_mut(ColumnId::Name)
        {
            if let Some(slot) = names.get_mut(row) {
                *slot = Some(bounded_text(name));
            }
        }
    }

    /// Position of every row in degrees; `None` where RA or Dec is unset.
    pub fn positions(&self) -> Vec<Option<(f64, f64)>> {
        let (Some(ra), Some(dec)) = (self.column(ColumnId::Ra), self.column(ColumnId::Dec)) else {
            return vec![None; self.row_count];
        };
        let to_deg = |c: &Column| {
            c.unit
                .and_then(|u| u.factor_to(Unit::Degree))
                .unwrap_or(1.0)
        };
        let (fra, fdec) = (to_deg(ra), to_deg(dec));
        (0..self.row_count)
            .map(|i| Some((ra.float(i)? * fra, dec.float(i)? * fdec)))
            .collect()
    }

    /// Whether rows are grouped into patches.
    pub fn has_patches(&self) -> bool {
        self.has_column(ColumnId::Patch)
    }

    /// Row indices of every patch, in first-seen order. Rows without a patch
    /// value are collected under `None`.
    pub fn patch_groups(&self) -> Vec<(Option<String>, Vec<usize>)> {
        let Some(patches) = self.texts(ColumnId::Patch) else {
            return vec![(None, (0..self.row_count).collect())];
        };
        let mut order: Vec<(Option<String>, Vec<usize>)> = Vec::new();
        let mut slot: HashMap<Option<&str>, usize> = HashMap::new();
        for (row, patch) in patches.iter().enumerate() {
            let key = patch.as_deref();
            let i = *slot.entry(key).or_insert_with(|| {
                order.push((patch.clone(), Vec::new()));
                order.len() - 1
            });
            order[i].1.push(row);
        }
        order
    }

    /// Append the rows of `other`. Columns missing on either side are filled
    /// with unset cells; metadata of `self` wins on conflicts.
    pub fn append(&mut self, other: CatalogTable) -> Result<(), CatalogError> {
        let own_rows = self.row_count;
        let other_rows = other.row_count;

        for column in &mut self.columns {
            if !other.columns.iter().any(|c| c.id == column.id) {
                column.extend_unset(other_rows);
            }
        }

        for column in other.columns {
            match self.columns.iter_mut().find(|c| c.id == column.id) {
                Some(existing) => existing.extend_from(column)?,
                None => {
                    let mut padded = Column::unset(column.id, own_rows, column.list_width());
                    padded.unit = column.unit;
                    padded.fill = column.fill.clone();
                    padded.extend_from(column)?;
                    self.columns.push(padded);
                }
            }
        }

        for (id, default) in other.meta.defaults {
            self.meta.defaults.entry(id).or_insert(default);
        }
        for (patch, pos) in other.meta.patch_positions {
            self.meta.patch_positions.entry(patch).or_insert(pos);
        }

        self.row_count = own_rows + other_rows;
        Ok(())
    }

    /// Remove the given rows. Out-of-range indices are ignored.
    pub fn remove_rows(&mut self, rows: &BTreeSet<usize>) {
        if rows.is_empty() {
            return;
        }
        let keep: Vec<bool> = (0..self.row_count).map(|i| !rows.contains(&i)).collect();
        for column in &mut self.columns {
            column.retain_rows(&keep);
        }
        self.row_count = keep.iter().filter(|&&k| k).count();
    }

    /// Set a value on every row for each named column, creating columns that
    /// do not exist yet.
    pub fn set_column_values(&mut self, values: &[(ColumnId, CellValue)]) -> Result<(), CatalogError> {
        for (id, value) in values {
            if !self.has_column(*id) {
                let width = match value {
                    CellValue::List(l) => l.len(),
                    _ => 0,
                };
                self.columns.push(Column::unset(*id, self.row_count, width));
            }
            let rows = self.row_count;
            if let Some(column) = self.column_mut(*id) {
                column.set_all(value, rows)?;
            }
            log::debug!("Set {id} on {rows} rows");
        }
        Ok(())
    }

    /// Put every row into one patch called `name`.
    pub fn group_single(&mut self, name: &str) -> Result<(), CatalogError> {
        let column = Column::new(
            ColumnId::Patch,
            ColumnData::Text(vec![Some(bounded_text(name)); self.row_count]),
        )?;
        self.meta.patch_positions.clear();
        // Patch conventionally follows Name and Type
        let index = self
            .column_index(ColumnId::Type)
            .or(self.column_index(ColumnId::Name))
            .map_or(0, |i| i + 1);
        self.insert_column(index, column)?;
        self.update_patch_positions(PatchPosition::Mid);
        Ok(())
    }

    /// Drop patch grouping: the Patch column and all patch positions.
    pub fn ungroup(&mut self) {
        self.take_column(ColumnId::Patch);
        self.meta.patch_positions.clear();
    }

    /// Recompute the reference position of every patch from its members.
    ///
    /// Positions of patches that no longer have rows are discarded.
    pub fn update_patch_positions(&mut self, method: PatchPosition) {
        if !self.has_patches() {
            return;
        }
        let positions = self.positions();
        let flux: Vec<f64> = match self.column(ColumnId::I) {
            Some(c) => (0..self.row_count)
                .map(|i| c.float_or_fill(i).unwrap_or(0.0))
                .collect(),
            None => vec![0.0; self.row_count],
        };

        let mut updated = BTreeMap::new();
        for (patch, rows) in self.patch_groups() {
            let Some(patch) = patch else {
                continue;
            };
            let members: Vec<(f64, f64, f64)> = rows
                .iter()
                .filter_map(|&r| positions[r].map(|(ra, dec)| (ra, dec, flux[r])))
                .collect();
            if let Some(pos) = patch_position(&members, method) {
                updated.insert(patch, pos);
            }
        }
        log::debug!("Updated positions of {} patches", updated.len());
        self.meta.patch_positions = updated;
    }

    /// Convert every column to its canonical unit.
    pub fn normalize_units(&mut self) {
        for column in &mut self.columns {
            if let Some(target) = column.id.canonical_unit() {
                if column.unit.is_some_and(|u| u != target) {
                    log::debug!("Converting column {} to {target}", column.id);
                    column.convert_unit(target);
                }
            }
        }
    }
}

fn patch_position(members: &[(f64, f64, f64)], method: PatchPosition) -> Option<(f64, f64)> {
    if members.is_empty() {
        return None;
    }
    let n = members.len() as f64;
    let mean = || {
        let (ra, dec) = members
            .iter()
            .fold((0.0, 0.0), |(a, b), &(ra, dec, _)| (a + ra, b + dec));
        (ra / n, dec / n)
    };
    match method {
        PatchPosition::Mid => {
            let (mut ra_min, mut ra_max) = (f64::INFINITY, f64::NEG_INFINITY);
            let (mut dec_min, mut dec_max) = (f64::INFINITY, f64::NEG_INFINITY);
            for &(ra, dec, _) in members {
                ra_min = ra_min.min(ra);
                ra_max = ra_max.max(ra);
                dec_min = dec_min.min(dec);
                dec_max = dec_max.max(dec);
            }
            Some(((ra_min + ra_max) / 2.0, (dec_min + dec_max) / 2.0))
        }
        PatchPosition::Mean => Some(mean()),
        PatchPosition::WeightedMean => {
            let total: f64 = members.iter().map(|m| m.2).sum();
            if total == 0.0 {
                return Some(mean());
            }
            let (ra, dec) = members
                .iter()
                .fold((0.0, 0.0), |(a, b), &(ra, dec, w)| (a + ra * w, b + dec * w));
            Some((ra / total, dec / total))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> ColumnData {
        ColumnData::Text(values.iter().map(|s| Some(s.to_string())).collect())
    }

    fn floats(values: &[f64]) -> ColumnData {
        ColumnData::Float(values.iter().copied().map(Some).collect())
    }

    fn sample() -> CatalogTable {
        CatalogTable::from_columns(
            vec![
                Column::new(ColumnId::Name, text(&["a", "b", "c"])).unwrap(),
                Column::new(ColumnId::Type, text(&["POINT", "POINT", "GAUSSIAN"])).unwrap(),
                Column::new(ColumnId::Patch, text(&["p1", "p2", "p1"])).unwrap(),
                Column::new(ColumnId::Ra, floats(&[10.0, 50.0, 12.0])).unwrap(),
                Column::new(ColumnId::Dec, floats(&[20.0, 60.0, 24.0])).unwrap(),
                Column::new(ColumnId::I, floats(&[1.0, 2.0, 3.0])).unwrap(),
            ],
            CatalogMeta::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = CatalogTable::from_columns(
            vec![
                Column::new(ColumnId::Name, text(&["a", "b"])).unwrap(),
                Column::new(ColumnId::I, floats(&[1.0])).unwrap(),
            ],
            CatalogMeta::default(),
        );
        assert!(matches!(result, Err(CatalogError::LengthMismatch { .. })));
    }

    #[test]
    fn test_column_kind_checked() {
        assert!(Column::new(ColumnId::I, text(&["x"])).is_err());
    }

    #[test]
    fn test_patch_groups_first_seen_order() {
        let groups = sample().patch_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], (Some("p1".to_string()), vec![0, 2]));
        assert_eq!(groups[1], (Some("p2".to_string()), vec![1]));
    }

    #[test]
    fn test_update_patch_positions_mid() {
        let mut table = sample();
        table.meta.patch_positions.insert("stale".into(), (1.0, 1.0));
        table.update_patch_positions(PatchPosition::Mid);
        assert_eq!(table.meta.patch_positions.len(), 2);
        assert_eq!(table.meta.patch_positions["p1"], (11.0, 22.0));
        assert_eq!(table.meta.patch_positions["p2"], (50.0, 60.0));
    }

    #[test]
    fn test_update_patch_positions_weighted() {
        let mut table = sample();
        table.update_patch_positions(PatchPosition::WeightedMean);
        let (ra, dec) = table.meta.patch_positions["p1"];
        assert!((ra - (10.0 * 1.0 + 12.0 * 3.0) / 4.0).abs() < 1e-12);
        assert!((dec - (20.0 * 1.0 + 24.0 * 3.0) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_single_and_ungroup() {
        let mut table = sample();
        table.ungroup();
        assert!(!table.has_patches());
        assert!(table.meta.patch_positions.is_empty());

        table.group_single("all").unwrap();
        assert_eq!(table.column_index(ColumnId::Patch), Some(2));
        assert_eq!(table.patch_groups().len(), 1);
        assert_eq!(table.meta.patch_positions["all"], (30.0, 40.0));
    }

    #[test]
    fn test_append_fills_missing_columns() {
        let mut a = sample();
        let b = CatalogTable::from_columns(
            vec![
                Column::new(ColumnId::Name, text(&["d"])).unwrap(),
                Column::new(ColumnId::Q, floats(&[0.5])).unwrap(),
            ],
            CatalogMeta::default(),
        )
        .unwrap();
        a.append(b).unwrap();
        assert_eq!(a.row_count(), 4);
        assert_eq!(a.floats(ColumnId::I).unwrap()[3], None);
        assert_eq!(a.floats(ColumnId::Q).unwrap(), &[None, None, None, Some(0.5)]);
        assert_eq!(a.names()[3], Some("d"));
    }

    #[test]
    fn test_append_pads_lists() {
        let lists = |v: Vec<Vec<f64>>| ColumnData::FloatList(v);
        let mut a = CatalogTable::from_columns(
            vec![Column::new(ColumnId::SpectralIndex, lists(vec![vec![-0.7]])).unwrap()],
            CatalogMeta::default(),
        )
        .unwrap();
        let b = CatalogTable::from_columns(
            vec![Column::new(ColumnId::SpectralIndex, lists(vec![vec![-0.8, 0.1]])).unwrap()],
            CatalogMeta::default(),
        )
        .unwrap();
        a.append(b).unwrap();
        assert_eq!(
            a.lists(ColumnId::SpectralIndex).unwrap(),
            &[vec![-0.7, 0.0], vec![-0.8, 0.1]]
        );
    }

    #[test]
    fn test_append_converts_units() {
        let mut a = sample();
        let mut b = CatalogTable::from_columns(
            vec![Column::new(ColumnId::I, floats(&[500.0])).unwrap()],
            CatalogMeta::default(),
        )
        .unwrap();
        b.column_mut(ColumnId::I).unwrap().unit = Some(Unit::MilliJansky);
        a.append(b).unwrap();
        assert_eq!(a.floats(ColumnId::I).unwrap()[3], Some(0.5));
    }

    #[test]
    fn test_remove_rows() {
        let mut table = sample();
        table.remove_rows(&BTreeSet::from([0, 2]));
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.names(), vec![Some("b")]);
    }

    #[test]
    fn test_set_column_values() {
        let mut table = sample();
        table
            .set_column_values(&[
                (ColumnId::I, CellValue::Float(5.0)),
                (ColumnId::ReferenceFrequency, CellValue::Float(1.5e8)),
            ])
            .unwrap();
        assert_eq!(table.floats(ColumnId::I).unwrap(), &[Some(5.0); 3]);
        assert_eq!(
            table.floats(ColumnId::ReferenceFrequency).unwrap(),
            &[Some(1.5e8); 3]
        );
        let err = table.set_column_values(&[(ColumnId::I, CellValue::Text("x".into()))]);
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_cell_literals() {
        assert_eq!(
            CellValue::parse_for(ColumnId::Ra, "01:00:00").unwrap(),
            CellValue::Float(15.0)
        );
        assert_eq!(
            CellValue::parse_for(ColumnId::SpectralIndex, "[-0.7, 0.1]").unwrap(),
            CellValue::List(vec![-0.7, 0.1])
        );
        assert_eq!(
            CellValue::parse_for(ColumnId::SpectralIndex, "-0.7;0.1").unwrap(),
            CellValue::List(vec![-0.7, 0.1])
        );
        assert!(CellValue::parse_for(ColumnId::I, "bright").is_err());
    }

    #[test]
    fn test_normalize_units() {
        let mut table = sample();
        let col = table.column_mut(ColumnId::Ra).unwrap();
        col.unit = Some(Unit::Arcmin);
        table.normalize_units();
        let ra = table.column(ColumnId::Ra).unwrap();
        assert_eq!(ra.unit, Some(Unit::Degree));
        assert!((ra.float(0).unwrap() - 10.0 / 60.0).abs() < 1e-12);
    }
}

//! Concatenation of two sky models with duplicate handling.
//!
//! The merge runs in phases:
//!
//! 1. bring both catalogs to the same patch shape
//! 2. detach the spectral-index column and stack the remaining columns
//! 3. reattach spectral indices by a name-keyed lookup
//! 4. drop duplicates according to [`KeepMatches`]
//! 5. disambiguate names that still repeat
//! 6. recompute patch positions

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use skymodel_core::{CatalogTable, Column, ColumnData, ColumnId, PatchPosition};

use crate::crossmatch::match_positions;
use crate::error::OperationError;

/// Patch name given to an unpatched catalog merged into a patched one.
pub const SINGLE_PATCH_NAME: &str = "Patch";

/// Default match radius in degrees.
pub const DEFAULT_RADIUS: f64 = 0.1;

/// How duplicate sources are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchBy {
    /// Identical `Name` values.
    #[default]
    Name,
    /// Positions within the match radius.
    Position,
}

/// Which copy of a duplicate survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepMatches {
    /// Keep every row.
    #[default]
    All,
    /// Keep the first row of each duplicate group.
    From1,
    /// Drop the first row of each duplicate group.
    From2,
}

impl FromStr for MatchBy {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(MatchBy::Name),
            "position" => Ok(MatchBy::Position),
            _ => Err(OperationError::invalid_option("match_by", s)),
        }
    }
}

impl FromStr for KeepMatches {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(KeepMatches::All),
            "from1" => Ok(KeepMatches::From1),
            "from2" => Ok(KeepMatches::From2),
            _ => Err(OperationError::invalid_option("keep_matches", s)),
        }
    }
}

impl fmt::Display for MatchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchBy::Name => "name",
            MatchBy::Position => "position",
        })
    }
}

impl fmt::Display for KeepMatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeepMatches::All => "all",
            KeepMatches::From1 => "from1",
            KeepMatches::From2 => "from2",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcatenateOptions {
    pub match_by: MatchBy,
    /// Match radius in degrees; only used when matching by position.
    pub radius: f64,
    pub keep: KeepMatches,
}

impl Default for ConcatenateOptions {
    fn default() -> Self {
        Self {
            match_by: MatchBy::default(),
            radius: DEFAULT_RADIUS,
            keep: KeepMatches::default(),
        }
    }
}

/// What a merge did besides stacking rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Rows added from the second catalog.
    pub appended: usize,
    /// Duplicate rows removed.
    pub removed: usize,
    /// Rows given a `_1`/`_2` suffix.
    pub renamed: usize,
}

/// Append `cat2` to `cat1`, resolving duplicates as configured.
///
/// `cat1` is only replaced once the whole merge has succeeded.
pub fn concatenate(
    cat1: &mut CatalogTable,
    cat2: &CatalogTable,
    opts: &ConcatenateOptions,
) -> Result<MergeSummary, OperationError> {
    let mut cat2 = cat2.clone();
    if cat1.has_patches() && !cat2.has_patches() {
        log::debug!("Grouping second catalog into a single patch");
        cat2.group_single(SINGLE_PATCH_NAME)?;
    }
    if cat2.has_patches() && !cat1.has_patches() {
        log::debug!("Ungrouping second catalog");
        cat2.ungroup();
    }

    let mut merged = cat1.clone();
    let n1 = merged.row_count();
    let n2 = cat2.row_count();

    let keys = match opts.match_by {
        MatchBy::Name => DuplicateKeys::Name(
            merged
                .names()
                .into_iter()
                .chain(cat2.names())
                .map(|n| n.map(str::to_string))
                .collect(),
        ),
        MatchBy::Position => {
            DuplicateKeys::Group(position_groups(&merged, &cat2, opts.radius))
        }
    };

    let spectral1 = merged.take_column(ColumnId::SpectralIndex);
    let spectral2 = cat2.take_column(ColumnId::SpectralIndex).map(|(_, c)| c);
    let names1: Vec<Option<String>> = owned_names(&merged);
    let names2: Vec<Option<String>> = owned_names(&cat2);

    merged.append(cat2)?;

    let template = spectral1.as_ref().map(|(_, c)| c).or(spectral2.as_ref());
    if let Some(template) = template {
        let index = spectral1
            .as_ref()
            .map_or(merged.columns().len(), |(i, _)| *i);
        let column = reattach_spectral(
            &merged,
            template,
            (spectral1.as_ref().map(|(_, c)| c), names1.as_slice()),
            (spectral2.as_ref(), names2.as_slice()),
            n1,
        )?;
        merged.insert_column(index, column)?;
    }

    let removed = match opts.keep {
        KeepMatches::All => BTreeSet::new(),
        keep => match &keys {
            DuplicateKeys::Name(k) => duplicate_rows(k, keep),
            DuplicateKeys::Group(k) => duplicate_rows(k, keep),
        },
    };
    merged.remove_rows(&removed);

    let renamed = rename_duplicates(&mut merged);

    if merged.has_patches() {
        merged.update_patch_positions(PatchPosition::Mid);
    }

    let summary = MergeSummary {
        appended: n2,
        removed: removed.len(),
        renamed,
    };
    log::debug!(
        "Merged {n2} rows by {}: {} removed, {} renamed",
        opts.match_by,
        summary.removed,
        summary.renamed
    );
    *cat1 = merged;
    Ok(summary)
}

enum DuplicateKeys {
    Name(Vec<Option<String>>),
    Group(Vec<Option<usize>>),
}

fn owned_names(table: &CatalogTable) -> Vec<Option<String>> {
    table
        .names()
        .into_iter()
        .map(|n| n.map(str::to_string))
        .collect()
}

/// Synthetic match-group ids: catalog-1 rows are their own index, catalog-2
/// rows share the id of a catalog-1 row within `radius`, else get a fresh one.
fn position_groups(cat1: &CatalogTable, cat2: &CatalogTable, radius: f64) -> Vec<Option<usize>> {
    let n1 = cat1.row_count();
    let matches = match_positions(&cat1.positions(), &cat2.positions());
    (0..n1)
        .map(Some)
        .chain(matches.iter().enumerate().map(|(j, m)| match m {
            Some(m) if m.within(radius) => Some(m.index),
            _ => Some(n1 + j),
        }))
        .collect()
}

/// Rows to drop so that each key keeps the configured member.
///
/// `From1` drops all but the first row of a group, `From2` drops only the
/// first. Unset keys never form a group.
fn duplicate_rows<K: Hash + Eq>(keys: &[Option<K>], keep: KeepMatches) -> BTreeSet<usize> {
    let mut groups: HashMap<&K, Vec<usize>> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            groups.entry(key).or_default().push(row);
        }
    }
    let mut remove = BTreeSet::new();
    for rows in groups.values().filter(|rows| rows.len() > 1) {
        match keep {
            KeepMatches::All => {}
            KeepMatches::From1 => remove.extend(&rows[1..]),
            KeepMatches::From2 => {
                remove.insert(rows[0]);
            }
        }
    }
    remove
}

/// Rebuild the spectral-index column for the merged rows.
///
/// Each row takes the list of the first row with the same name in catalog 2
/// if the name is there, else in catalog 1. Only a catalog that carries
/// spectral indices is searched. Rows without a name keep the list they came
/// with.
fn reattach_spectral(
    merged: &CatalogTable,
    template: &Column,
    (spectral1, names1): (Option<&Column>, &[Option<String>]),
    (spectral2, names2): (Option<&Column>, &[Option<String>]),
    n1: usize,
) -> Result<Column, OperationError> {
    let width = spectral1
        .map_or(0, Column::list_width)
        .max(spectral2.map_or(0, Column::list_width));
    let first_rows = |column: Option<&Column>, names: &[Option<String>]| {
        let mut first: HashMap<String, usize> = HashMap::new();
        if column.is_none() {
            return first;
        }
        for (row, name) in names.iter().enumerate() {
            if let Some(name) = name {
                first.entry(name.clone()).or_insert(row);
            }
        }
        first
    };
    let (first1, first2) = (first_rows(spectral1, names1), first_rows(spectral2, names2));
    let list = |column: Option<&Column>, row: usize| {
        let mut list = column.and_then(|c| c.list(row)).map_or_else(Vec::new, <[f64]>::to_vec);
        list.resize(width.max(list.len()), 0.0);
        list
    };

    let lists = merged
        .names()
        .iter()
        .enumerate()
        .map(|(row, name)| match name {
            Some(name) => match (first2.get(*name), first1.get(*name)) {
                (Some(&j), _) => list(spectral2, j),
                (None, Some(&i)) => list(spectral1, i),
                (None, None) => vec![0.0; width],
            },
            None if row < n1 => list(spectral1, row),
            None => list(spectral2, row - n1),
        })
        .collect();

    let mut column = Column::new(ColumnId::SpectralIndex, ColumnData::FloatList(lists))?;
    column.fill = template.fill.clone();
    column.pad_lists(width);
    Ok(column)
}

/// Rename the first two rows of every repeated name to `<name>_1` and
/// `<name>_2`. Returns the number of rows renamed.
fn rename_duplicates(table: &mut CatalogTable) -> usize {
    let mut order: Vec<String> = Vec::new();
    let mut rows: HashMap<String, Vec<usize>> = HashMap::new();
    for (row, name) in table.names().into_iter().enumerate() {
        let Some(name) = name else { continue };
        rows.entry(name.to_string())
            .or_insert_with(|| {
                order.push(name.to_string());
                Vec::new()
            })
            .push(row);
    }

    let mut renamed = 0;
    for name in order {
        let indices = &rows[&name];
        if indices.len() > 1 {
            table.set_name(indices[0], &format!("{name}_1"));
            table.set_name(indices[1], &format!("{name}_2"));
            renamed += 2;
        }
    }
    renamed
}

//! Setting column values on every row.

use skymodel_core::{CatalogTable, CellValue, ColumnId};

use crate::error::OperationError;

/// Set each named column to the given value on every row, creating columns
/// that are missing.
pub fn add(table: &mut CatalogTable, values: &[(ColumnId, CellValue)]) -> Result<(), OperationError> {
    table.set_column_values(values)?;
    log::debug!("Set {} columns on {} rows", values.len(), table.row_count());
    Ok(())
}

/// Resolve `(column alias, literal)` pairs into typed column values.
///
/// Aliases are matched case-insensitively against the allow-list and
/// literals are parsed for the column's kind. Blank literals are skipped.
pub fn parse_column_values<K, V>(pairs: &[(K, V)]) -> Result<Vec<(ColumnId, CellValue)>, OperationError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut values = Vec::with_capacity(pairs.len());
    for (alias, literal) in pairs {
        let (alias, literal) = (alias.as_ref(), literal.as_ref());
        if literal.trim().is_empty() {
            continue;
        }
        let id = ColumnId::from_alias(alias)
            .ok_or_else(|| skymodel_core::CatalogError::unknown_column(alias))?;
        values.push((id, CellValue::parse_for(id, literal)?));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skymodel_core::{CatalogError, CatalogMeta, Column, ColumnData};

    fn table() -> CatalogTable {
        CatalogTable::from_columns(
            vec![
                Column::new(
                    ColumnId::Name,
                    ColumnData::Text(vec![Some("a".into()), Some("b".into())]),
                )
                .unwrap(),
                Column::new(ColumnId::I, ColumnData::Float(vec![Some(1.0), None])).unwrap(),
            ],
            CatalogMeta::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_column_values() {
        let values = parse_column_values(&[
            ("Ra", "01:00:00"),
            ("dec", "-10.5"),
            ("Type", "POINT"),
            ("spectralindex", "[-0.7, 0.1]"),
            ("Q", ""),
        ])
        .unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[0], (ColumnId::Ra, CellValue::Float(15.0)));
        assert_eq!(values[1], (ColumnId::Dec, CellValue::Float(-10.5)));
        assert_eq!(values[2], (ColumnId::Type, CellValue::Text("POINT".into())));
        assert_eq!(
            values[3],
            (ColumnId::SpectralIndex, CellValue::List(vec![-0.7, 0.1]))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_bad_values() {
        let err = parse_column_values(&[("Flux", "1.0")]).unwrap_err();
        assert!(matches!(
            err,
            OperationError::Catalog(CatalogError::UnknownColumn(_))
        ));
        let err = parse_column_values(&[("I", "bright")]).unwrap_err();
        assert!(matches!(
            err,
            OperationError::Catalog(CatalogError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_add_overwrites_and_creates() {
        let mut t = table();
        add(
            &mut t,
            &[
                (ColumnId::I, CellValue::Float(2.0)),
                (ColumnId::ReferenceFrequency, CellValue::Float(1.5e8)),
            ],
        )
        .unwrap();
        assert_eq!(t.floats(ColumnId::I).unwrap(), &[Some(2.0), Some(2.0)]);
        assert_eq!(
            t.floats(ColumnId::ReferenceFrequency).unwrap(),
            &[Some(1.5e8), Some(1.5e8)]
        );
    }

    #[test]
    fn test_add_wrong_kind() {
        let mut t = table();
        let err = add(&mut t, &[(ColumnId::Name, CellValue::Float(1.0))]).unwrap_err();
        assert!(matches!(
            err,
            OperationError::Catalog(CatalogError::ColumnKind { .. })
        ));
    }
}

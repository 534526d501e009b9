//! Data model for makesourcedb/BBS sky models.
//!
//! This crate holds the column allow-list, angle conversion, units and the
//! in-memory [`CatalogTable`]. Reading and writing sky model text lives in
//! `skymodel-format`; cross-matching and merging in `skymodel-lib`.

pub mod angle;
pub mod columns;
pub mod error;
pub mod table;
pub mod units;

pub use angle::{format_dec, format_ra, parse_dec, parse_ra};
pub use columns::{COLUMNS, ColumnId, ColumnKind, ColumnSpec, DefaultValue, MAX_TEXT_LEN};
pub use error::CatalogError;
pub use table::{CatalogMeta, CatalogTable, CellValue, Column, ColumnData, PatchPosition};
pub use units::Unit;

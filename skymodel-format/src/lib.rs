pub mod error;
pub mod export;
pub mod header;
pub mod reader;
pub mod writer;

pub use error::FormatError;
pub use export::{OutputFormat, write_ds9, write_file, write_kvis};
pub use header::{FormatColumn, FormatSpec, find_format_line, parse_format_line};
pub use reader::{is_skymodel, read_skymodel, read_skymodel_file};
pub use writer::{FILL_SENTINEL, format_header, write_skymodel, write_skymodel_file};

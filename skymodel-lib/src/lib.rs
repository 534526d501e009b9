//! Operations on sky models: cross-matching, concatenation and adding
//! column values.

pub mod add;
pub mod crossmatch;
pub mod error;
pub mod merge;

pub use add::{add, parse_column_values};
pub use crossmatch::{SkyMatch, SkyMatcher, angular_separation_deg, match_positions};
pub use error::OperationError;
pub use merge::{ConcatenateOptions, KeepMatches, MatchBy, MergeSummary, concatenate};

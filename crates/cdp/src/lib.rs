//! Customer data lookups used to ground audience generation in real values.

pub mod grounding;
pub mod source;
pub mod types;

pub use grounding::GroundingService;
pub use source::{CustomerDataSource, SqliteDataSource};
pub use types::{ColumnInfo, GroundingContext, GroundingData};

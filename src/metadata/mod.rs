//! Tabular study metadata: the in-memory table and TSV I/O.

pub mod loader;
pub mod table;

pub use loader::{load_metadata, save_metadata};
pub use table::MetadataTable;

//! Dataset source adapters.
//!
//! - `InMemoryDatasetSource` - Datasets registered in memory
//! - `CsvDirectorySource` - CSV files inside an upload directory

mod csv_directory;
mod in_memory;

pub use csv_directory::CsvDirectorySource;
pub use in_memory::InMemoryDatasetSource;

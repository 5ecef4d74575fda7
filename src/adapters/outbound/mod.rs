pub mod file_store;
pub mod geojson_export;
pub mod loggers;
pub mod memory_store;
pub mod postgres_store;

pub use file_store::*;
pub use geojson_export::*;
pub use loggers::*;
pub use memory_store::*;
pub use postgres_store::*;

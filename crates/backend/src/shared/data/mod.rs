pub mod cache;
pub mod dataset;
pub mod ingest;
pub mod source;

pub use dataset::{build_dataset, build_dataset_with, FactTable};
pub use source::{CsvSource, FactSource, GeneratedSource, SourceError};

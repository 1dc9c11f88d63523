use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::cache;
use super::dataset::FactTable;
use super::ingest;

/// Failures that prevent a source from producing any fact table
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("source {0} produced no valid rows")]
    Empty(String),
}

/// Anything that can supply the fact table.
///
/// Implementations hand back rows built through `FactRow::new`, so profit,
/// margin and month are derived the same way for every source.
#[async_trait]
pub trait FactSource: Send + Sync {
    async fn load(&self) -> Result<Arc<FactTable>, SourceError>;

    fn source_name(&self) -> &str;
}

/// Seeded synthetic table, memoized per seed
pub struct GeneratedSource {
    seed: u64,
}

impl GeneratedSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl FactSource for GeneratedSource {
    async fn load(&self) -> Result<Arc<FactTable>, SourceError> {
        Ok(cache::dataset_for_seed(self.seed))
    }

    fn source_name(&self) -> &str {
        "generated"
    }
}

/// CSV file with columns `date,region,product,revenue,cost,units_sold`
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FactSource for CsvSource {
    async fn load(&self) -> Result<Arc<FactTable>, SourceError> {
        let path_label = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| SourceError::Io {
            path: path_label.clone(),
            source,
        })?;

        let report = ingest::ingest_csv(bytes.as_slice())?;
        for rejection in &report.rejected {
            tracing::warn!(
                "Data source {}: skipping line {}: {}",
                path_label,
                rejection.line,
                rejection.reason
            );
        }

        if report.table.is_empty() {
            return Err(SourceError::Empty(path_label));
        }

        tracing::info!(
            "Data source {}: loaded {} rows, rejected {}",
            path_label,
            report.table.len(),
            report.rejected.len()
        );
        Ok(Arc::new(report.table))
    }

    fn source_name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_source_is_shared_per_seed() {
        let source = GeneratedSource::new(1234);
        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 216);
        assert_eq!(source.source_name(), "generated");
    }

    #[tokio::test]
    async fn test_missing_csv_file_is_io_error() {
        let source = CsvSource::new("definitely/not/here/sales.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_csv_source_reads_file() {
        let dir = std::env::temp_dir().join(format!("d402-source-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sales.csv");
        std::fs::write(
            &path,
            "date,region,product,revenue,cost,units_sold\n\
             2023-01-31,North,Product A,20000,12000,300\n\
             2023-01-31,Mars,Product A,20000,12000,300\n\
             2023-02-28,North,Product A,9000000000000000000,6000000000000000000,300\n",
        )
        .unwrap();

        let table = CsvSource::new(&path).load().await.unwrap();
        assert_eq!(table.len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_csv_without_valid_rows_is_empty_error() {
        let dir = std::env::temp_dir().join(format!("d402-source-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sales.csv");
        std::fs::write(&path, "date,region,product,revenue,cost,units_sold\n").unwrap();

        let err = CsvSource::new(&path).load().await.unwrap_err();
        assert!(matches!(err, SourceError::Empty(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

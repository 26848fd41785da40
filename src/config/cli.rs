use crate::domain::model::RawRecord;
use crate::domain::ports::{RecordSource, Storage};
use crate::utils::error::{MigrateError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// Reads the input file once and yields one RawRecord per data row, keyed by
/// the header labels. Any read or parse failure is fatal for the run.
pub struct CsvRecordSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> CsvRecordSource<S> {
    pub fn new(storage: S, path: String) -> Self {
        Self { storage, path }
    }
}

#[async_trait]
impl<S: Storage> RecordSource for CsvRecordSource<S> {
    async fn records(&self) -> Result<Vec<RawRecord>> {
        let bytes = self
            .storage
            .read_file(&self.path)
            .await
            .map_err(|e| ingest_error(&self.path, e))?;

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| ingest_error(&self.path, e))?
            .clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| ingest_error(&self.path, e))?;
            let mut data = HashMap::new();
            for (label, field) in headers.iter().zip(row.iter()) {
                data.insert(
                    label.to_string(),
                    serde_json::Value::String(field.to_string()),
                );
            }
            records.push(RawRecord { data });
        }

        Ok(records)
    }
}

fn ingest_error(path: &str, cause: impl std::fmt::Display) -> MigrateError {
    MigrateError::IngestError {
        message: format!("{}: {}", path, cause),
    }
}

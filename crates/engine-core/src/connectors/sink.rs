use async_trait::async_trait;
use connectors::file::csv::{error::FileError, sink::CsvSink};
use model::records::row::RowData;
use std::{io, path::PathBuf};

/// Persists one window's rows under `file_name` and returns where they landed.
#[async_trait]
pub trait RowSink: Send + Sync {
    async fn write_rows(
        &self,
        rows: &[RowData],
        headers: &[String],
        file_name: &str,
    ) -> Result<PathBuf, FileError>;
}

/// File I/O runs on the blocking pool so the runtime thread stays free.
#[async_trait]
impl RowSink for CsvSink {
    async fn write_rows(
        &self,
        rows: &[RowData],
        headers: &[String],
        file_name: &str,
    ) -> Result<PathBuf, FileError> {
        let sink = self.clone();
        let rows = rows.to_vec();
        let headers = headers.to_vec();
        let file_name = file_name.to_string();

        tokio::task::spawn_blocking(move || sink.write_rows(&rows, &headers, &file_name))
            .await
            .map_err(|err| FileError::IoError(io::Error::other(err)))?
    }
}

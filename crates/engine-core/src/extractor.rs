use crate::{
    connectors::{sink::RowSink, source::AggregateSource},
    error::ExtractError,
};
use async_trait::async_trait;
use connectors::file::csv::naming::FileNaming;
use model::window::Window;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a successful window attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowReport {
    /// The query returned no rows. Nothing was written.
    Empty,
    Exported { rows: usize, path: PathBuf },
}

impl WindowReport {
    pub fn rows(&self) -> usize {
        match self {
            WindowReport::Empty => 0,
            WindowReport::Exported { rows, .. } => *rows,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            WindowReport::Empty => None,
            WindowReport::Exported { path, .. } => Some(path),
        }
    }
}

/// One full attempt at a window: query and, when rows exist, export.
#[async_trait]
pub trait WindowExtractor: Send + Sync {
    async fn extract(&self, window: &Window) -> Result<WindowReport, ExtractError>;
}

/// Queries `source` and hands non-empty results to `sink`.
///
/// Rows are never cached between attempts: a failed write means the window is
/// queried again on the next attempt.
pub struct ExportingExtractor<S, K> {
    source: S,
    sink: K,
    naming: FileNaming,
    headers: Vec<String>,
}

impl<S, K> ExportingExtractor<S, K>
where
    S: AggregateSource,
    K: RowSink,
{
    pub fn new(source: S, sink: K, naming: FileNaming, headers: Vec<String>) -> Self {
        ExportingExtractor {
            source,
            sink,
            naming,
            headers,
        }
    }
}

#[async_trait]
impl<S, K> WindowExtractor for ExportingExtractor<S, K>
where
    S: AggregateSource,
    K: RowSink,
{
    async fn extract(&self, window: &Window) -> Result<WindowReport, ExtractError> {
        let rows = self.source.run_aggregate_window(window).await?;
        if rows.is_empty() {
            debug!(%window, "Window returned no rows");
            return Ok(WindowReport::Empty);
        }

        let file_name = self.naming.file_name(window);
        let path = self
            .sink
            .write_rows(&rows, &self.headers, &file_name)
            .await?;

        Ok(WindowReport::Exported {
            rows: rows.len(),
            path,
        })
    }
}

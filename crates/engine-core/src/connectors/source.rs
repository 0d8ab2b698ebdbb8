use async_trait::async_trait;
use connectors::sql::{base::error::DbError, postgres::adapter::PgAdapter};
use model::{records::row::RowData, window::Window};

/// Runs the aggregate query for one window. An empty result is not an error.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    async fn run_aggregate_window(&self, window: &Window) -> Result<Vec<RowData>, DbError>;
}

#[async_trait]
impl AggregateSource for PgAdapter {
    async fn run_aggregate_window(&self, window: &Window) -> Result<Vec<RowData>, DbError> {
        self.aggregate_window(window.start, window.end).await
    }
}

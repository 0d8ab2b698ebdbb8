use crate::sql::{
    base::error::{ConnectorError, DbError},
    postgres::{
        row::DbRow,
        utils::{CertificateCheck, connect_client},
    },
};
use chrono::NaiveDate;
use model::records::{measurement::MEASUREMENT_ENTITY, row::RowData};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

const QUERY_AGGREGATE_WINDOW_SQL: &str = include_str!("sql/aggregate_window.sql");
const QUERY_PING_SQL: &str = "SELECT 1";

/// Single Postgres client owned for the lifetime of an extraction run.
#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
}

impl PgAdapter {
    pub async fn connect(url: &str, check: CertificateCheck) -> Result<Self, ConnectorError> {
        let client = Arc::new(RwLock::new(connect_client(url, check).await?));
        Ok(PgAdapter { client })
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        let client = self.client.read().await;
        let row = client.query_one(QUERY_PING_SQL, &[]).await?;
        let val: i32 = row.try_get(0)?;
        if val != 1 {
            return Err(DbError::Unknown(format!(
                "ping returned unexpected result: {val}"
            )));
        }
        Ok(())
    }

    /// Daily per-device averages for measurements captured in `[start, end)`.
    pub async fn aggregate_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RowData>, DbError> {
        debug!(%start, %end, "Running aggregate window query");

        let client = self.client.read().await;
        let rows = client
            .query(QUERY_AGGREGATE_WINDOW_SQL, &[&start, &end])
            .await?;

        rows.iter()
            .map(|row| DbRow::new(row).to_row_data(MEASUREMENT_ENTITY))
            .collect()
    }
}

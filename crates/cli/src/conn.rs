use crate::error::CliError;
use async_trait::async_trait;
use connectors::sql::postgres::adapter::PgAdapter;
use engine_config::settings::connection::ConnectionSettings;
use tracing::{error, info};

/// Trait for "pinging" a data source
#[async_trait]
pub trait ConnectionPinger {
    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

/// Postgres pinger
pub struct PostgresConnectionPinger {
    pub settings: ConnectionSettings,
}

#[async_trait]
impl ConnectionPinger for PostgresConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        info!("Pinging Postgres at '{}'", self.settings);

        let check = self.settings.certificate_check();
        let adapter = PgAdapter::connect(&self.settings.conn_str(), check)
            .await
            .map_err(|e| {
                error!("Postgres connection to '{}' failed: {}", self.settings, e);
                CliError::Connection(e)
            })?;

        adapter.ping().await.map_err(|e| {
            error!("Postgres ping query on '{}' failed: {}", self.settings, e);
            CliError::Postgres(e)
        })?;

        info!("Postgres ping to '{}' succeeded", self.settings);
        Ok(())
    }
}

use crate::{error::RunError, execution::observer::TracingObserver};
use connectors::{file::csv::sink::CsvSink, sql::postgres::adapter::PgAdapter};
use engine_config::settings::{ExtractionSettings, WindowSettings};
use engine_core::{
    clock::{Clock, FixedClock, SystemClock},
    error::ExtractionError,
    extractor::{ExportingExtractor, WindowExtractor},
    metrics::{Metrics, MetricsSnapshot},
    observer::CompositeObserver,
    window::controller::WindowController,
};
use model::{records::measurement::measurement_headers, window::ExtractionCursor};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// What a finished run covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cursor: ExtractionCursor,
    pub attempts: u64,
    pub metrics: MetricsSnapshot,
}

/// Connects to the source and walks the configured range, writing one CSV per
/// non-empty window.
pub async fn run(
    settings: ExtractionSettings,
    cancel: CancellationToken,
) -> Result<RunSummary, RunError> {
    info!(connection = %settings.connection, "Connecting to source database");
    let adapter = PgAdapter::connect(
        &settings.connection.conn_str(),
        settings.connection.certificate_check(),
    )
        .await
        .map_err(ExtractionError::from)?;

    info!(
        output_dir = %settings.output_dir.display(),
        "Writing exports"
    );
    let extractor = ExportingExtractor::new(
        adapter,
        CsvSink::new(&settings.output_dir),
        settings.naming.clone(),
        measurement_headers(),
    );

    run_with(&settings.window, extractor, cancel).await
}

/// Runs the window controller over any extractor, with console logging and
/// metrics attached.
pub async fn run_with<E: WindowExtractor>(
    window: &WindowSettings,
    extractor: E,
    cancel: CancellationToken,
) -> Result<RunSummary, RunError> {
    let policy = window.policy;
    let clock: Arc<dyn Clock> = match window.until {
        Some(until) => Arc::new(FixedClock::at_date(until)),
        None => Arc::new(SystemClock),
    };

    let metrics = Metrics::new();
    let observer = CompositeObserver::new()
        .with(Arc::new(TracingObserver))
        .with(Arc::new(metrics.clone()));

    info!(
        epoch = %policy.epoch(),
        until = %clock.now().date_naive(),
        initial_window_days = policy.initial_window_days(),
        min_window_days = policy.min_window_days(),
        shrink_factor = policy.shrink_factor(),
        retry_limit = policy.retry_limit(),
        "Starting extraction"
    );

    let controller = WindowController::new(policy, extractor)
        .with_observer(Arc::new(observer))
        .with_clock(clock)
        .with_cancellation(cancel);

    let result = controller.run().await;
    let snapshot = metrics.snapshot();
    info!(
        windows = snapshot.windows_succeeded,
        files = snapshot.files_written,
        empty_windows = snapshot.empty_windows,
        rows = snapshot.rows_exported,
        failed_attempts = snapshot.failed_attempts,
        shrinks = snapshot.shrinks,
        "Extraction finished"
    );

    let outcome = result?;
    Ok(RunSummary {
        cursor: outcome.cursor,
        attempts: outcome.attempts,
        metrics: snapshot,
    })
}

use crate::{
    conn::{ConnectionPinger, PostgresConnectionPinger},
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use commands::Commands;
use engine_config::settings::{
    ExtractionSettings, WindowSettings, connection::ConnectionSettings,
};
use engine_core::{
    clock::{Clock, FixedClock, SystemClock},
    window::plan::WindowPlan,
};
use engine_runtime::execution::executor;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "chunkwise",
    version,
    about = "Adaptive windowed export of daily measurement aggregates from PostgreSQL to CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let shutdown = ShutdownCoordinator::new(CancellationToken::new());

    let result = execute(cli.command, &shutdown).await;
    exit_code(&result, shutdown.is_shutdown_requested()).into()
}

fn exit_code(result: &Result<(), CliError>, shutdown_requested: bool) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(err) if err.is_shutdown() || shutdown_requested => {
            warn!("{err}");
            ExitCode::ShutdownRequested
        }
        Err(err) => {
            error!("{err}");
            ExitCode::GeneralError
        }
    }
}

async fn execute(command: Commands, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    match command {
        Commands::Extract { args } => {
            let env = args.env()?;
            let settings = ExtractionSettings::from_env(&env, &args.overrides())?;

            shutdown.register_handlers();
            let summary = executor::run(settings, shutdown.cancel_token()).await?;

            info!(
                next_start = %summary.cursor.current_start,
                window_days = summary.cursor.window_days,
                "Extraction complete"
            );
            output::print_summary(&summary)?;
        }
        Commands::Windows { args, json } => {
            let env = args.env()?;
            let settings = WindowSettings::from_env(&env, &args.overrides())?;
            let naming = ExtractionSettings::naming_from_env(&env, &args.overrides());

            let clock: Box<dyn Clock> = match settings.until {
                Some(until) => Box::new(FixedClock::at_date(until)),
                None => Box::new(SystemClock),
            };
            let windows: Vec<_> = WindowPlan::new(&settings.policy, clock.now()).collect();
            output::print_plan(&windows, &naming, json)?;
        }
        Commands::TestConn { env_file, conn_str } => {
            let env = commands::load_env(env_file.as_ref())?;
            let settings = ConnectionSettings::from_env(&env, conn_str.as_deref())?;
            PostgresConnectionPinger { settings }.ping().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use engine_config::settings::error::SettingsError;
    use engine_core::error::ExtractionError;
    use engine_runtime::error::RunError;

    fn cancelled() -> CliError {
        CliError::Runner(RunError::Extraction(ExtractionError::Cancelled {
            resume_from: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        }))
    }

    fn misconfigured() -> CliError {
        CliError::Settings(SettingsError::Missing("DB_HOST or HOST".into()))
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_u8(), 0);
        assert_eq!(ExitCode::GeneralError.as_u8(), 1);
        assert_eq!(ExitCode::ShutdownRequested.as_u8(), 130);
    }

    #[test]
    fn test_cancelled_run_is_a_shutdown() {
        assert!(cancelled().is_shutdown());
        assert!(!misconfigured().is_shutdown());
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(&Ok(()), false), ExitCode::Success);
        assert_eq!(exit_code(&Ok(()), true), ExitCode::Success);
        assert_eq!(exit_code(&Err(cancelled()), false), ExitCode::ShutdownRequested);
        assert_eq!(exit_code(&Err(misconfigured()), false), ExitCode::GeneralError);
        // A signal that lands while another error is surfacing still exits 130.
        assert_eq!(exit_code(&Err(misconfigured()), true), ExitCode::ShutdownRequested);
    }
}

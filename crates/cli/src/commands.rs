use crate::error::CliError;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use engine_config::{env::EnvManager, settings::SettingsOverrides};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Export daily measurement aggregates, one CSV per window
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },
    /// Print the windows a failure-free run would attempt, without touching the database
    Windows {
        #[command(flatten)]
        args: ExtractArgs,

        #[arg(long, help = "Print the plan as JSON instead of a table")]
        json: bool,
    },
    /// Test the PostgreSQL connection
    TestConn {
        #[arg(long, help = "Path to a .env file loaded on top of the process environment")]
        env_file: Option<PathBuf>,

        /// Connection string; defaults to the configured database
        #[arg(long)]
        conn_str: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    #[arg(long, help = "Path to a .env file loaded on top of the process environment")]
    pub env_file: Option<PathBuf>,

    #[arg(long, value_parser = parse_date, help = "First day to extract (YYYY-MM-DD)")]
    pub epoch: Option<NaiveDate>,

    #[arg(long, value_parser = parse_date, help = "Stop before this day instead of today (YYYY-MM-DD)")]
    pub until: Option<NaiveDate>,

    #[arg(long, help = "Window size in days to start with")]
    pub initial_window_days: Option<u32>,

    #[arg(long, help = "Smallest window size in days")]
    pub min_window_days: Option<u32>,

    #[arg(long, help = "Divisor applied to the window size when retries run out")]
    pub shrink_factor: Option<u32>,

    #[arg(long, help = "Attempts per window size")]
    pub retry_limit: Option<u32>,

    #[arg(long, help = "Directory for the CSV files")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "File name prefix; an empty string names files by interval only")]
    pub prefix: Option<String>,

    #[arg(long, help = "Connection string, overriding DATABASE_URL and DB_* variables")]
    pub conn_str: Option<String>,
}

impl ExtractArgs {
    pub fn env(&self) -> Result<EnvManager, CliError> {
        load_env(self.env_file.as_ref())
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            epoch: self.epoch,
            until: self.until,
            initial_window_days: self.initial_window_days,
            min_window_days: self.min_window_days,
            shrink_factor: self.shrink_factor,
            retry_limit: self.retry_limit,
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
            conn_str: self.conn_str.clone(),
        }
    }
}

pub fn load_env(env_file: Option<&PathBuf>) -> Result<EnvManager, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }
    Ok(env)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{value}': {e}"))
}

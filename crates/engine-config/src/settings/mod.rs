use crate::env::EnvManager;
use chrono::NaiveDate;
use connection::ConnectionSettings;
use connectors::file::csv::naming::FileNaming;
use engine_core::window::policy::{
    DEFAULT_EPOCH, DEFAULT_INITIAL_WINDOW_DAYS, DEFAULT_MIN_WINDOW_DAYS, DEFAULT_RETRY_LIMIT,
    DEFAULT_SHRINK_FACTOR, WindowPolicy,
};
use error::SettingsError;
use std::path::PathBuf;
use tracing::debug;

pub mod connection;
pub mod error;

pub const DEFAULT_OUTPUT_DIR: &str = "data/chunks";
pub const DEFAULT_FILE_PREFIX: &str = "measurements";

pub const EPOCH_KEY: &str = "CHUNKWISE_EPOCH";
pub const UNTIL_KEY: &str = "CHUNKWISE_UNTIL";
pub const INITIAL_WINDOW_KEY: &str = "CHUNKWISE_INITIAL_WINDOW_DAYS";
pub const MIN_WINDOW_KEY: &str = "CHUNKWISE_MIN_WINDOW_DAYS";
pub const SHRINK_FACTOR_KEY: &str = "CHUNKWISE_SHRINK_FACTOR";
pub const RETRY_LIMIT_KEY: &str = "CHUNKWISE_RETRY_LIMIT";
pub const OUTPUT_DIR_KEY: &str = "CHUNKWISE_OUTPUT_DIR";
pub const FILE_PREFIX_KEY: &str = "CHUNKWISE_FILE_PREFIX";

/// Values given on the command line. Each one, when set, replaces the
/// environment value of the same setting.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub epoch: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub initial_window_days: Option<u32>,
    pub min_window_days: Option<u32>,
    pub shrink_factor: Option<u32>,
    pub retry_limit: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub conn_str: Option<String>,
}

/// Window walk parameters: the validated policy plus an optional fixed end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSettings {
    pub policy: WindowPolicy,
    /// Replaces the wall clock as "now" when set.
    pub until: Option<NaiveDate>,
}

impl WindowSettings {
    pub fn from_env(
        env: &EnvManager,
        overrides: &SettingsOverrides,
    ) -> Result<Self, SettingsError> {
        let epoch = pick(overrides.epoch, || date_var(env, EPOCH_KEY))?.unwrap_or(DEFAULT_EPOCH);
        let until = pick(overrides.until, || date_var(env, UNTIL_KEY))?;

        let policy = WindowPolicy::new(
            epoch,
            pick(overrides.initial_window_days, || u32_var(env, INITIAL_WINDOW_KEY))?
                .unwrap_or(DEFAULT_INITIAL_WINDOW_DAYS),
            pick(overrides.min_window_days, || u32_var(env, MIN_WINDOW_KEY))?
                .unwrap_or(DEFAULT_MIN_WINDOW_DAYS),
            pick(overrides.shrink_factor, || u32_var(env, SHRINK_FACTOR_KEY))?
                .unwrap_or(DEFAULT_SHRINK_FACTOR),
            pick(overrides.retry_limit, || u32_var(env, RETRY_LIMIT_KEY))?
                .unwrap_or(DEFAULT_RETRY_LIMIT),
        )?;

        Ok(WindowSettings { policy, until })
    }
}

/// Everything an extraction run needs, resolved and validated.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub connection: ConnectionSettings,
    pub window: WindowSettings,
    pub output_dir: PathBuf,
    pub naming: FileNaming,
}

impl ExtractionSettings {
    pub fn from_env(
        env: &EnvManager,
        overrides: &SettingsOverrides,
    ) -> Result<Self, SettingsError> {
        let window = WindowSettings::from_env(env, overrides)?;
        let connection = ConnectionSettings::from_env(env, overrides.conn_str.as_deref())?;

        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| env.first_of(&[OUTPUT_DIR_KEY]).map(|(_, v)| PathBuf::from(v)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let settings = ExtractionSettings {
            connection,
            window,
            output_dir,
            naming: Self::naming_from_env(env, overrides),
        };
        debug!(?settings, "Resolved extraction settings");
        Ok(settings)
    }

    /// File naming scheme. An explicitly empty prefix selects interval-only names.
    pub fn naming_from_env(env: &EnvManager, overrides: &SettingsOverrides) -> FileNaming {
        let prefix = overrides
            .prefix
            .clone()
            .or_else(|| env.get(FILE_PREFIX_KEY).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_string());
        FileNaming::from_prefix(Some(&prefix))
    }
}

fn pick<T>(
    explicit: Option<T>,
    fallback: impl FnOnce() -> Result<Option<T>, SettingsError>,
) -> Result<Option<T>, SettingsError> {
    match explicit {
        Some(value) => Ok(Some(value)),
        None => fallback(),
    }
}

fn u32_var(env: &EnvManager, key: &str) -> Result<Option<u32>, SettingsError> {
    env.first_of(&[key])
        .map(|(_, value)| {
            value.parse().map_err(|_| SettingsError::InvalidNumber {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .transpose()
}

fn date_var(env: &EnvManager, key: &str) -> Result<Option<NaiveDate>, SettingsError> {
    env.first_of(&[key])
        .map(|(_, value)| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| SettingsError::InvalidDate {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::error::PolicyError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn db_env(extra: &[(&str, &str)]) -> EnvManager {
        let mut vars = vec![
            ("DB_HOST", "localhost"),
            ("DB_NAME", "safecast"),
            ("DB_USER", "reader"),
        ];
        vars.extend_from_slice(extra);
        EnvManager::from_vars(vars)
    }

    #[test]
    fn test_defaults() {
        let settings =
            ExtractionSettings::from_env(&db_env(&[]), &SettingsOverrides::default()).unwrap();

        assert_eq!(settings.window.policy, WindowPolicy::default());
        assert_eq!(settings.window.until, None);
        assert_eq!(settings.output_dir, PathBuf::from("data/chunks"));
        assert_eq!(settings.naming, FileNaming::default());
    }

    #[test]
    fn test_environment_values() {
        let env = db_env(&[
            (EPOCH_KEY, "2020-01-01"),
            (UNTIL_KEY, "2020-01-10"),
            (INITIAL_WINDOW_KEY, "30"),
            (MIN_WINDOW_KEY, "2"),
            (SHRINK_FACTOR_KEY, "3"),
            (RETRY_LIMIT_KEY, "5"),
            (OUTPUT_DIR_KEY, "/tmp/out"),
            (FILE_PREFIX_KEY, ""),
        ]);

        let settings = ExtractionSettings::from_env(&env, &SettingsOverrides::default()).unwrap();
        let policy = settings.window.policy;

        assert_eq!(policy.epoch(), date(2020, 1, 1));
        assert_eq!(policy.initial_window_days(), 30);
        assert_eq!(policy.min_window_days(), 2);
        assert_eq!(policy.shrink_factor(), 3);
        assert_eq!(policy.retry_limit(), 5);
        assert_eq!(settings.window.until, Some(date(2020, 1, 10)));
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.naming, FileNaming::IntervalOnly);
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let env = db_env(&[(INITIAL_WINDOW_KEY, "30"), (FILE_PREFIX_KEY, "env")]);
        let overrides = SettingsOverrides {
            initial_window_days: Some(7),
            prefix: Some("daily".into()),
            ..Default::default()
        };

        let settings = ExtractionSettings::from_env(&env, &overrides).unwrap();

        assert_eq!(settings.window.policy.initial_window_days(), 7);
        assert_eq!(
            settings.naming,
            FileNaming::Prefixed {
                prefix: "daily".into()
            }
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let env = db_env(&[(RETRY_LIMIT_KEY, "three")]);
        let err = WindowSettings::from_env(&env, &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidNumber { ref key, .. } if key == RETRY_LIMIT_KEY));

        let env = db_env(&[(EPOCH_KEY, "01/01/2020")]);
        let err = WindowSettings::from_env(&env, &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidDate { .. }));

        let overrides = SettingsOverrides {
            initial_window_days: Some(1),
            min_window_days: Some(2),
            ..Default::default()
        };
        let err = WindowSettings::from_env(&db_env(&[]), &overrides).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Policy(PolicyError::InitialBelowMinimum { initial: 1, min: 2 })
        ));

        let overrides = SettingsOverrides {
            shrink_factor: Some(1),
            ..Default::default()
        };
        let err = WindowSettings::from_env(&db_env(&[]), &overrides).unwrap_err();
        assert!(matches!(err, SettingsError::Policy(PolicyError::ShrinkFactorTooSmall(1))));
    }

    #[test]
    fn test_window_settings_need_no_connection() {
        let env = EnvManager::from_vars([(EPOCH_KEY, "2021-03-01")]);
        let settings = WindowSettings::from_env(&env, &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.policy.epoch(), date(2021, 3, 1));
    }
}

//! Runtime configuration resolution.
//!
//! Values come from explicit arguments first, then `ROSTER_*` environment
//! variables, then built-in defaults. The roster API itself never reads the
//! environment; only hosts call into this module.

use crate::logging::{default_log_level, LogLevel, LoggingConfig, LoggingError};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ROSTER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ROSTER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ROSTER_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "employees.db";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// Logging stays off when no directory is configured.
    pub log_dir: Option<PathBuf>,
}

impl RosterConfig {
    /// Resolves with explicit overrides taking precedence over environment.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_level: Option<&str>,
        log_dir: Option<PathBuf>,
    ) -> Result<Self, LoggingError> {
        Self::resolve_with(db_path, log_level, log_dir, process_env)
    }

    fn resolve_with(
        db_path: Option<PathBuf>,
        log_level: Option<&str>,
        log_dir: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, LoggingError> {
        let db_path = db_path_with(db_path, &env);

        let log_level = match log_level
            .map(str::to_string)
            .or_else(|| lookup(&env, LOG_LEVEL_ENV))
        {
            Some(raw) => LogLevel::parse(&raw)?,
            None => default_log_level(),
        };

        let log_dir = log_dir.or_else(|| lookup(&env, LOG_DIR_ENV).map(PathBuf::from));

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }

    /// Logging settings, when a log directory is configured.
    pub fn logging(&self) -> Option<LoggingConfig> {
        self.log_dir
            .as_ref()
            .map(|dir| LoggingConfig::new(self.log_level, dir.clone()))
    }
}

/// Resolves only the database path; logging variables are not read.
pub fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    db_path_with(explicit, process_env)
}

fn db_path_with(explicit: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    explicit
        .or_else(|| lookup(&env, DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME))
}

fn lookup(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::{
        db_path_with, RosterConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV,
    };
    use crate::logging::{default_log_level, LogLevel};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = RosterConfig::resolve_with(None, None, None, env_of(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert!(config.logging().is_none());
    }

    #[test]
    fn environment_fills_missing_values_and_blank_is_ignored() {
        let env = env_of(&[
            (DB_PATH_ENV, " /data/roster.db "),
            (LOG_LEVEL_ENV, "WARN"),
            (LOG_DIR_ENV, "   "),
        ]);
        let config = RosterConfig::resolve_with(None, None, None, env).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/roster.db"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let env = env_of(&[(DB_PATH_ENV, "/env.db"), (LOG_LEVEL_ENV, "error")]);
        let config = RosterConfig::resolve_with(
            Some(PathBuf::from("/explicit.db")),
            Some("trace"),
            Some(PathBuf::from("/var/log/roster")),
            env,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/explicit.db"));
        assert_eq!(config.log_level, LogLevel::Trace);
        let logging = config.logging().unwrap();
        assert_eq!(logging.log_dir, PathBuf::from("/var/log/roster"));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = RosterConfig::resolve_with(None, Some("loud"), None, env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn db_path_resolution_ignores_logging_variables() {
        let env = env_of(&[(DB_PATH_ENV, "/env.db"), (LOG_LEVEL_ENV, "loud")]);
        assert_eq!(db_path_with(None, &env), PathBuf::from("/env.db"));
        assert_eq!(
            db_path_with(Some(PathBuf::from("/explicit.db")), &env),
            PathBuf::from("/explicit.db")
        );
        assert_eq!(
            db_path_with(None, env_of(&[])),
            PathBuf::from(DEFAULT_DB_FILE_NAME)
        );
    }
}

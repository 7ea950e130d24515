//! Run configuration: CLI flag, then environment (`.env` honoured), then defaults.

use std::path::PathBuf;

use crate::domain::{DEFAULT_ROLLING_WINDOW, DEFAULT_TOP_N, DashboardConfig, clamp_top_n};
use crate::error::AppError;

pub const ENV_CSV: &str = "SALES_CSV";
pub const ENV_TOP_N: &str = "SALES_TOP_N";
pub const ENV_ROLLING_WINDOW: &str = "SALES_ROLLING_WINDOW";

/// Dataset read when neither `--file` nor `SALES_CSV` is given.
pub const DEFAULT_CSV: &str = "sales_data.csv";

/// Values supplied on the command line (each optional).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub csv_path: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub rolling_window: Option<usize>,
}

/// Resolve the config from flags and the process environment.
pub fn resolve(overrides: &ConfigOverrides) -> Result<DashboardConfig, AppError> {
    dotenvy::dotenv().ok();
    resolve_with(overrides, |key| std::env::var(key).ok())
}

/// Resolve the config with an explicit environment lookup.
pub fn resolve_with<F>(overrides: &ConfigOverrides, env: F) -> Result<DashboardConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let csv_path = overrides
        .csv_path
        .clone()
        .or_else(|| env(ENV_CSV).filter(|s| !s.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV));

    let top_n = match overrides.top_n {
        Some(n) => n,
        None => env_usize(&env, ENV_TOP_N)?.unwrap_or(DEFAULT_TOP_N),
    };

    let rolling_window = match overrides.rolling_window {
        Some(w) => w,
        None => env_usize(&env, ENV_ROLLING_WINDOW)?.unwrap_or(DEFAULT_ROLLING_WINDOW),
    };
    if rolling_window == 0 {
        return Err(AppError::input("Rolling window must be >= 1."));
    }

    Ok(DashboardConfig {
        csv_path,
        top_n: clamp_top_n(top_n),
        rolling_window,
    })
}

fn env_usize<F>(env: &F, key: &str) -> Result<Option<usize>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = env(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<usize>()
        .map(Some)
        .map_err(|_| AppError::input(format!("Invalid {key}='{raw}' (expected a non-negative integer).")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = resolve_with(&ConfigOverrides::default(), env_of(&[])).unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from(DEFAULT_CSV));
        assert_eq!(cfg.top_n, DEFAULT_TOP_N);
        assert_eq!(cfg.rolling_window, DEFAULT_ROLLING_WINDOW);
    }

    #[test]
    fn flags_beat_environment() {
        let overrides = ConfigOverrides {
            csv_path: Some(PathBuf::from("flag.csv")),
            top_n: Some(15),
            rolling_window: None,
        };
        let env = env_of(&[(ENV_CSV, "env.csv"), (ENV_TOP_N, "6"), (ENV_ROLLING_WINDOW, "3")]);
        let cfg = resolve_with(&overrides, env).unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from("flag.csv"));
        assert_eq!(cfg.top_n, 15);
        assert_eq!(cfg.rolling_window, 3);
    }

    #[test]
    fn top_n_from_env_is_clamped() {
        let cfg = resolve_with(&ConfigOverrides::default(), env_of(&[(ENV_TOP_N, "50")])).unwrap();
        assert_eq!(cfg.top_n, 20);
    }

    #[test]
    fn bad_env_number_is_usage_error() {
        let err = resolve_with(&ConfigOverrides::default(), env_of(&[(ENV_TOP_N, "ten")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn zero_window_is_rejected() {
        let overrides = ConfigOverrides {
            rolling_window: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(resolve_with(&overrides, env_of(&[])).is_err());
    }
}

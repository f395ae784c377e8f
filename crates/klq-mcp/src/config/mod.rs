//! Data path and coercion policy resolution.

use std::path::PathBuf;

use klq::NumericCoercion;

/// Environment variable naming the data path.
pub const DATA_ENV: &str = "KLQ_DATA";

/// Environment variable selecting `strict` or `lenient` numeric comparison.
pub const NUMERIC_ENV: &str = "KLQ_NUMERIC";

/// Resolve the data path: explicit flag, then `KLQ_DATA`, then `./data`,
/// then `~/.klq/data`.
pub fn resolve_data_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(DATA_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    let cwd_data = PathBuf::from("data");
    if cwd_data.exists() {
        return cwd_data;
    }

    home_dir().join(".klq").join("data")
}

/// Resolve the numeric policy: `--strict`, then `KLQ_NUMERIC`, then lenient.
pub fn resolve_coercion(strict_flag: bool) -> NumericCoercion {
    if strict_flag {
        return NumericCoercion::Strict;
    }
    match std::env::var(NUMERIC_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring {NUMERIC_ENV}: {e}");
            NumericCoercion::Lenient
        }),
        Err(_) => NumericCoercion::Lenient,
    }
}

/// Home directory, falling back to the working directory.
pub fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

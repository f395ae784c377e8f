//! Table loading, reloading, and engine access.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use klq::{Engine, EngineConfig, NumericCoercion, TableRegistry};

use crate::types::McpResult;

/// Owns the engine over one data path.
pub struct QuerySession {
    engine: Engine,
    data_path: Option<PathBuf>,
    loaded_at: Instant,
}

impl QuerySession {
    /// Load tables from `path`. A missing path yields an empty registry.
    pub fn open(path: &Path, numeric: NumericCoercion) -> McpResult<Self> {
        let registry = load_registry(path)?;
        tracing::info!(
            "Session ready: {} tables, {} rows, numeric comparison {}",
            registry.len(),
            registry.total_rows(),
            numeric
        );
        Ok(Self {
            engine: Engine::with_config(registry, EngineConfig { numeric }),
            data_path: Some(path.to_path_buf()),
            loaded_at: Instant::now(),
        })
    }

    /// Wrap an already-built registry.
    pub fn from_registry(registry: TableRegistry, config: EngineConfig) -> Self {
        Self {
            engine: Engine::with_config(registry, config),
            data_path: None,
            loaded_at: Instant::now(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn registry(&self) -> &Arc<TableRegistry> {
        self.engine.registry()
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Seconds since the tables were last loaded.
    pub fn age_secs(&self) -> u64 {
        self.loaded_at.elapsed().as_secs()
    }

    pub fn set_numeric(&mut self, numeric: NumericCoercion) {
        self.engine.set_numeric(numeric);
    }

    /// Re-read the data path, keeping the current configuration.
    pub fn reload(&mut self) -> McpResult<()> {
        let Some(path) = self.data_path.clone() else {
            return Ok(());
        };
        self.load(&path)
    }

    /// Replace the tables with those at `path`.
    pub fn load(&mut self, path: &Path) -> McpResult<()> {
        let registry = load_registry(path)?;
        self.engine = Engine::with_config(registry, self.engine.config());
        self.data_path = Some(path.to_path_buf());
        self.loaded_at = Instant::now();
        Ok(())
    }
}

fn load_registry(path: &Path) -> McpResult<TableRegistry> {
    if !path.exists() {
        tracing::warn!(
            "Data path {} does not exist; starting with no tables",
            path.display()
        );
        return Ok(TableRegistry::new());
    }
    Ok(TableRegistry::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            QuerySession::open(&dir.path().join("nope"), NumericCoercion::Lenient).unwrap();
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_from_registry_has_no_path() {
        let registry = TableRegistry::new().with_table("t", vec![]);
        let mut session = QuerySession::from_registry(registry, EngineConfig::default());
        assert!(session.data_path().is_none());
        session.reload().unwrap();
        assert_eq!(session.registry().names(), vec!["t"]);
    }

    #[test]
    fn test_reload_picks_up_new_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"[{"x": 1}]"#).unwrap();
        let mut session = QuerySession::open(dir.path(), NumericCoercion::Strict).unwrap();
        assert_eq!(session.registry().names(), vec!["a"]);

        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        session.reload().unwrap();
        assert_eq!(session.registry().names(), vec!["a", "b"]);
        assert_eq!(session.engine().config().numeric, NumericCoercion::Strict);
    }
}

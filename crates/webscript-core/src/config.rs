/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Engine configuration.
//!
//! The configuration is read-only once an engine holds it. A process can
//! install one configuration at startup with [`EngineConfig::install`];
//! engines built with [`ScriptEngine::default`](crate::ScriptEngine) pick it
//! up through [`EngineConfig::global`].
//!
//! ```toml
//! libraries = ["table", "string", "math"]
//! prelude = true
//! timeout_ms = 5000
//! memory_limit = 16777216
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mlua::StdLib;
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::ConfigError;

static GLOBAL: OnceCell<Arc<EngineConfig>> = OnceCell::new();

/// A Lua standard library that may be exposed to document code.
///
/// `debug` is deliberately absent: it can escape every other restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LuaLibrary {
    Coroutine,
    Table,
    Io,
    Os,
    String,
    Utf8,
    Math,
    Package,
}

impl LuaLibrary {
    fn std_lib(self) -> StdLib {
        match self {
            LuaLibrary::Coroutine => StdLib::COROUTINE,
            LuaLibrary::Table => StdLib::TABLE,
            LuaLibrary::Io => StdLib::IO,
            LuaLibrary::Os => StdLib::OS,
            LuaLibrary::String => StdLib::STRING,
            LuaLibrary::Utf8 => StdLib::UTF8,
            LuaLibrary::Math => StdLib::MATH,
            LuaLibrary::Package => StdLib::PACKAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Standard libraries loaded into every Lua state.
    pub libraries: Vec<LuaLibrary>,
    /// Install the `int`, `float` and `html` helper tables.
    pub prelude: bool,
    /// Wall-clock limit per invocation. `0` disables the limit.
    pub timeout_ms: Option<u64>,
    /// Lua heap limit in bytes.
    pub memory_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            libraries: vec![
                LuaLibrary::Coroutine,
                LuaLibrary::Table,
                LuaLibrary::String,
                LuaLibrary::Utf8,
                LuaLibrary::Math,
            ],
            prelude: true,
            timeout_ms: Some(10_000),
            memory_limit: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Install the process-wide configuration. Fails if one is already set.
    pub fn install(self) -> Result<(), ConfigError> {
        GLOBAL
            .set(Arc::new(self))
            .map_err(|_| ConfigError::AlreadyInstalled)
    }

    /// The installed configuration, or the defaults if none was installed.
    pub fn global() -> Arc<EngineConfig> {
        GLOBAL
            .get()
            .cloned()
            .unwrap_or_else(|| Arc::new(EngineConfig::default()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub(crate) fn std_lib(&self) -> StdLib {
        self.libraries
            .iter()
            .fold(StdLib::NONE, |libs, lib| libs | lib.std_lib())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.prelude);
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.memory_limit, None);
        assert_eq!(config.libraries.len(), 5);
        assert!(!config.libraries.contains(&LuaLibrary::Io));
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
libraries = ["table", "string", "os"]
prelude = false
timeout_ms = 250
memory_limit = 1048576
"#,
        )
        .unwrap();
        assert_eq!(
            config.libraries,
            vec![LuaLibrary::Table, LuaLibrary::String, LuaLibrary::Os]
        );
        assert!(!config.prelude);
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.memory_limit, Some(1_048_576));
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let config = EngineConfig::from_toml_str("timeout_ms = 0").unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_unknown_library_is_rejected() {
        let err = EngineConfig::from_toml_str(r#"libraries = ["debug"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = EngineConfig::from_toml_str("sandbox = true").unwrap_err();
        assert!(err.to_string().contains("sandbox"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webscript.toml");
        std::fs::write(&path, "prelude = false\n").unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert!(!config.prelude);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_std_lib_union() {
        let config = EngineConfig {
            libraries: vec![LuaLibrary::Table, LuaLibrary::Math],
            ..EngineConfig::default()
        };
        assert_eq!(config.std_lib(), StdLib::TABLE | StdLib::MATH);
    }

    #[test]
    fn test_install_once() {
        // The only test in this crate that installs a global configuration.
        let installed = EngineConfig {
            timeout_ms: Some(1234),
            ..EngineConfig::default()
        };
        installed.clone().install().unwrap();
        assert_eq!(*EngineConfig::global(), installed);
        assert!(matches!(
            EngineConfig::default().install(),
            Err(ConfigError::AlreadyInstalled)
        ));
    }
}

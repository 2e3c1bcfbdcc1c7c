use std::env;

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Settings of a [`QueryEngine`](crate::engine::QueryEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cache compiled literal statements.
    pub cache_enabled: bool,
    /// Maximum number of cached statements.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Reads `QUILL_CACHE_ENABLED` (`true`/`false`/`1`/`0`) and
    /// `QUILL_CACHE_CAPACITY`; unset or unparsable values keep the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache_enabled = env::var("QUILL_CACHE_ENABLED")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.cache_enabled);
        let cache_capacity = env::var("QUILL_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.cache_capacity);
        Self {
            cache_enabled,
            cache_capacity,
        }
    }

    pub fn without_cache() -> Self {
        Self {
            cache_enabled: false,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

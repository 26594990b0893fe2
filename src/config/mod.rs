use crate::source::SourceKind;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub netease: BackendConfig,
    pub kugou: BackendConfig,
    pub http: HttpConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the self-hosted API instance
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct StoreConfig {
    /// Source selected on startup
    pub default_source: SourceKind,
}

impl Default for Config {
    fn default() -> Self {
        defaults()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            user_agent: format!("tunestore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// Each backend section has its own default port, so missing sections are
// filled from `defaults()` after parsing.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    netease: Option<BackendConfig>,
    kugou: Option<BackendConfig>,
    http: HttpConfig,
    store: StoreConfig,
}

pub fn defaults() -> Config {
    Config {
        netease: BackendConfig {
            base_url: "http://localhost:3000".to_string(),
        },
        kugou: BackendConfig {
            base_url: "http://localhost:3002".to_string(),
        },
        http: HttpConfig::default(),
        store: StoreConfig::default(),
    }
}

pub fn parse(raw: &str) -> anyhow::Result<Config> {
    let raw = toml::from_str::<RawConfig>(raw).context("parse config toml")?;
    let d = defaults();
    Ok(Config {
        netease: raw.netease.unwrap_or(d.netease),
        kugou: raw.kugou.unwrap_or(d.kugou),
        http: raw.http,
        store: raw.store,
    })
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "tunestore", "tunestore")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Read the config file, falling back to [`defaults`] when it does not exist.
/// Nothing is ever written back.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(defaults());
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_deployment() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.netease.base_url, "http://localhost:3000");
        assert_eq!(cfg.kugou.base_url, "http://localhost:3002");
        assert_eq!(cfg.http.timeout_ms, 5000);
        assert_eq!(cfg.store.default_source, SourceKind::NetEase);
    }

    #[test]
    fn test_partial_override() {
        let cfg = parse(
            r#"
[kugou]
base_url = "http://music.lan:4000"

[http]
timeout_ms = 1500

[store]
default_source = "kugou"
"#,
        )
        .unwrap();
        assert_eq!(cfg.netease, defaults().netease);
        assert_eq!(cfg.kugou.base_url, "http://music.lan:4000");
        assert_eq!(cfg.http.timeout_ms, 1500);
        assert!(cfg.http.user_agent.starts_with("tunestore/"));
        assert_eq!(cfg.store.default_source, SourceKind::KuGou);
    }

    #[test]
    fn test_unknown_source_rejected() {
        assert!(parse("[store]\ndefault_source = \"spotify\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("tunestore-does-not-exist/config.toml");
        let cfg = load(Some(path.as_path())).unwrap();
        assert_eq!(cfg.kugou.base_url, "http://localhost:3002");
        assert!(!path.exists());
    }
}

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::Credentials;

/// Root configuration structure, deserialized from `.modlicense/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub throttle: ThrottleConfig,
    pub modules: ModulesConfig,
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout. A timeout counts as a failed candidate URL.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 10,
            user_agent: format!("modlicense/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fixed sleeps that keep request rates polite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Sleep before each candidate license file name.
    pub file_delay_ms: u64,
    /// Sleep before each GitHub tree listing. Authenticated requests are
    /// limited to 5000 per hour.
    pub api_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        ThrottleConfig {
            file_delay_ms: 1000,
            api_delay_ms: 2 * 1230,
        }
    }
}

impl ThrottleConfig {
    /// No sleeping at all.
    #[cfg(test)]
    pub fn none() -> Self {
        ThrottleConfig {
            file_delay_ms: 0,
            api_delay_ms: 0,
        }
    }

    pub fn file_delay(&self) -> Duration {
        Duration::from_millis(self.file_delay_ms)
    }

    pub fn api_delay(&self) -> Duration {
        Duration::from_millis(self.api_delay_ms)
    }
}

/// Which modules are looked up.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Append the Go standard library (`github.com/golang/go`) to the list.
    pub include_stdlib: bool,
    /// Module paths that are never looked up.
    pub skip: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        ModulesConfig {
            include_stdlib: true,
            skip: Vec::new(),
        }
    }
}

/// Read-only settings threaded through lookup and fetching.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub throttle: ThrottleConfig,
    github: Option<Credentials>,
}

impl Settings {
    pub fn new(throttle: ThrottleConfig, github: Option<Credentials>) -> Self {
        Settings { throttle, github }
    }

    /// GitHub credentials, only when both username and token are present.
    pub fn github_credentials(&self) -> Option<&Credentials> {
        self.github.as_ref().filter(|c| c.is_set())
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.modlicense/config.toml`
/// 3. `~/.config/modlicense/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".modlicense").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("modlicense").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

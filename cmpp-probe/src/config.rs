//! Configuration for the probe.

use std::path::Path;
use std::time::Duration;

use cmpp_core::ConnectionInfo;
use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Gateway address and socket timeouts.
    pub gateway: GatewayConfig,
    /// SP account used for the connect authenticator.
    pub account: AccountConfig,
    /// Frame limits.
    pub limits: LimitsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Gateway address and socket timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Socket read timeout in milliseconds (0 = block forever).
    pub read_timeout_ms: u64,
    /// Socket write timeout in milliseconds (0 = block forever).
    pub write_timeout_ms: u64,
}

/// SP account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// SP enterprise code, at most 6 characters.
    pub source_addr: String,
    pub shared_secret: String,
}

/// Frame limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest frame accepted from the gateway, header included. Capped at
    /// `cmpp_core::MAX_FRAME_SIZE`.
    pub max_frame_size: usize,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 7890,
            connect_timeout_ms: 5_000,
            read_timeout_ms: 10_000,
            write_timeout_ms: 10_000,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_frame_size: cmpp_core::MAX_FRAME_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ProbeConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Build the connection target, mapping `0` timeouts to "none".
    pub fn connection_info(&self) -> ConnectionInfo {
        let gw = &self.gateway;
        ConnectionInfo::new(gw.host.clone(), gw.port)
            .with_connect_timeout(Duration::from_millis(gw.connect_timeout_ms.max(1)))
            .with_read_timeout(optional_ms(gw.read_timeout_ms))
            .with_write_timeout(optional_ms(gw.write_timeout_ms))
    }
}

fn optional_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

// ── Tests ────────────────────────────────────────────────────────

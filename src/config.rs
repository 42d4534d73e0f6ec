//! Startup configuration: a JSON file plus env overrides for the secrets.
//!
//! Resolution order for the file:
//! 1) `$CONFIG_PATH`
//! 2) `config/bot.json`
//! 3) `config/bot.example.json` (first-run fallback)
//!
//! Changing configuration requires a restart; there is no hot reload.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dedup::DEFAULT_WINDOW_CAPACITY;
use crate::signal::DEFAULT_BIG_THRESHOLD;

const ENV_PATH: &str = "CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Display labels published with every report.
    pub symbol: String,
    pub timeframe: String,
    pub game: String,

    /// Boundary between SMALL and BIG outcomes.
    pub big_threshold: u8,
    /// Capacity of the duplicate-round window.
    pub dedup_window: usize,

    /// NDJSON stream endpoint for live rounds.
    pub stream_url: Option<String>,
    /// Optional history endpoint polled once at startup.
    pub history_url: Option<String>,
    pub reconnect_delay_secs: u64,

    pub send_to_web: bool,
    pub web_push_url: Option<String>,
    pub web_api_key: Option<String>,

    pub send_to_telegram: bool,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    /// Optional liveness endpoint; disabled when unset.
    pub update_status_url: Option<String>,
    pub heartbeat_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: "WinGo".to_string(),
            timeframe: "30s".to_string(),
            game: "WinGo_30S".to_string(),
            big_threshold: DEFAULT_BIG_THRESHOLD,
            dedup_window: DEFAULT_WINDOW_CAPACITY,
            stream_url: None,
            history_url: None,
            reconnect_delay_secs: 2,
            send_to_web: true,
            web_push_url: None,
            web_api_key: None,
            send_to_telegram: false,
            telegram_bot_token: None,
            telegram_chat_id: None,
            update_status_url: None,
            heartbeat_secs: 60,
        }
    }
}

impl Config {
    /// Load from an explicit path, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let mut cfg: Config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config at {}", path.display()))?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load using `$CONFIG_PATH` + file fallbacks; built-in defaults when
    /// no file exists at all.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("CONFIG_PATH points to non-existent path"));
        }
        for candidate in ["config/bot.json", "config/bot.example.json"] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        let mut cfg = Config::default();
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Env wins over the file for endpoints and credentials, so secrets can
    /// stay out of the committed config.
    fn apply_env_overrides(&mut self) {
        for (var, slot) in [
            ("STREAM_URL", &mut self.stream_url),
            ("HISTORY_URL", &mut self.history_url),
            ("WEB_PUSH_URL", &mut self.web_push_url),
            ("WEB_API_KEY", &mut self.web_api_key),
            ("TELEGRAM_BOT_TOKEN", &mut self.telegram_bot_token),
            ("TELEGRAM_CHAT_ID", &mut self.telegram_chat_id),
            ("UPDATE_STATUS_URL", &mut self.update_status_url),
        ] {
            if let Ok(v) = std::env::var(var) {
                if !v.trim().is_empty() {
                    *slot = Some(v);
                }
            }
        }
    }
}

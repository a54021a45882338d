//! Process configuration, read from the environment (and `.env` when present).

use std::env;
use std::fmt;

use crate::error::Error;

const DEFAULT_SYMBOL: &str = "USDTARS";
const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/ws";

#[derive(Debug, Clone)]
pub struct Config {
    /// MotherDuck access token
    pub motherduck_token: String,
    /// Exchange credentials, handed to the feed as-is
    pub credentials: Credentials,
    /// Symbol whose depth stream is recorded
    pub symbol: String,
    /// Base websocket url of the exchange's raw streams
    pub stream_url: String,
    /// Wipe the table before subscribing, on top of the wipe at shutdown
    pub clear_on_start: bool,
}

/// Exchange API credentials. Neither field is validated locally.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let motherduck_token = non_empty("MOTHERDUCK_TOKEN")
            .ok_or_else(|| Error::config("MOTHERDUCK_TOKEN is required"))?;

        let clear_on_start = match non_empty("DEPTH_CLEAR_ON_START") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::config(format!("Invalid DEPTH_CLEAR_ON_START: {raw}"))
            })?,
        };

        Ok(Self {
            motherduck_token,
            credentials: Credentials {
                api_key: lookup("BINANCE_API_KEY"),
                api_secret: lookup("BINANCE_API_SECRET"),
            },
            symbol: non_empty("DEPTH_SYMBOL").unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            stream_url: non_empty("BINANCE_STREAM_URL")
                .unwrap_or_else(|| DEFAULT_STREAM_URL.to_string()),
            clear_on_start,
        })
    }

    /// Connection string understood by DuckDB's MotherDuck extension.
    pub fn database_url(&self) -> String {
        format!("md:?token={}", self.motherduck_token)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

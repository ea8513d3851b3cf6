use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use crate::connection::{ConnectionConfig, MONGODB_URI_VAR};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_COMMENTS_COLLECTION: &str = "comments";
pub const DEFAULT_COMMENTS_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentsSettings {
    pub collection: String,
    pub limit: u32,
}

impl Default for CommentsSettings {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COMMENTS_COLLECTION.to_string(),
            limit: DEFAULT_COMMENTS_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub connection: ConnectionConfig,
    pub comments: CommentsSettings,
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let limit = parse_or(&lookup, "COMMENTS_LIMIT", DEFAULT_COMMENTS_LIMIT)?;
        if limit == 0 {
            bail!("COMMENTS_LIMIT must be at least 1");
        }

        Ok(Self {
            host: parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            connection: ConnectionConfig::new(lookup(MONGODB_URI_VAR)),
            comments: CommentsSettings {
                collection: lookup("COMMENTS_COLLECTION")
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_COMMENTS_COLLECTION.to_string()),
                limit,
            },
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

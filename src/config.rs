use std::env;
use std::fmt::Display;
use std::str::FromStr;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE_NAME: &str = "traveltime";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// When unset the server runs on the in-memory store.
    pub mongodb_uri: Option<String>,
    pub database_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_uri = lookup("MONGODB_URI").filter(|uri| !uri.trim().is_empty());
        if mongodb_uri.is_none() {
            log::warn!("MONGODB_URI not set, data will only be kept in memory");
        }

        AppConfig {
            host: lookup("HOST").unwrap_or_else(|| HOST.to_string()),
            port: parse_or_default(&lookup, "PORT", PORT),
            mongodb_uri,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| DATABASE_NAME.to_string()),
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            log::warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
        None => default,
    }
}

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(Error::config_error(format!("unknown RIDE_STORE: {}", s))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub store: StoreKind,
    /// Only read when `store` is `Postgres`.
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("RIDE_STORE") {
            Some(value) => value.parse()?,
            None => StoreKind::Postgres,
        };

        let database_url = match (store, lookup("DATABASE_URL")) {
            (_, Some(url)) => url,
            (StoreKind::Memory, None) => String::new(),
            (StoreKind::Postgres, None) => {
                return Err(Error::config_error("DATABASE_URL must be set"))
            }
        };

        let max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", &lookup, DEFAULT_MAX_CONNECTIONS)?;

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => parse("BIND_ADDR", &value)?,
            None => parse("BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };

        Ok(Self {
            store,
            database_url,
            max_connections,
            bind_addr,
        })
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config_error(format!("invalid {} value: {}", key, value)))
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, Error>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => parse(key, &value),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("DATABASE_URL", "postgresql://localhost/rides")]).unwrap();

        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(err.is_internal());

        let config = load(&[("RIDE_STORE", "memory")]).unwrap();
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn invalid_values() {
        assert!(load(&[("RIDE_STORE", "redis")]).is_err());
        assert!(load(&[("RIDE_STORE", "memory"), ("BIND_ADDR", "nowhere")]).is_err());
        assert!(load(&[("RIDE_STORE", "memory"), ("DATABASE_MAX_CONNECTIONS", "-1")]).is_err());
    }
}

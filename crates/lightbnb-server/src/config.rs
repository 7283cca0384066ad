use std::path::PathBuf;

use anyhow::{Context, Result};
use lightbnb_db::{DEFAULT_READERS, PoolConfig};

pub struct Config {
    pub pool: PoolConfig,
    pub users_fixture: Option<PathBuf>,
    pub properties_fixture: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = lookup("LIGHTBNB_DB_PATH").unwrap_or_else(|| "lightbnb.db".into());
        let readers: usize = match lookup("LIGHTBNB_DB_READERS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("LIGHTBNB_DB_READERS is not a number: {v}"))?,
            None => DEFAULT_READERS,
        };

        Ok(Self {
            pool: PoolConfig {
                path: path.into(),
                readers: readers.max(1),
            },
            users_fixture: lookup("LIGHTBNB_USERS_FIXTURE").map(PathBuf::from),
            properties_fixture: lookup("LIGHTBNB_PROPERTIES_FIXTURE").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.pool.path, PathBuf::from("lightbnb.db"));
        assert_eq!(config.pool.readers, DEFAULT_READERS);
        assert!(config.users_fixture.is_none());
        assert!(config.properties_fixture.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config(&[
            ("LIGHTBNB_DB_PATH", "/tmp/bnb.db"),
            ("LIGHTBNB_DB_READERS", "0"),
            ("LIGHTBNB_USERS_FIXTURE", "json/users.json"),
        ])
        .unwrap();
        assert_eq!(config.pool.path, PathBuf::from("/tmp/bnb.db"));
        assert_eq!(config.pool.readers, 1);
        assert_eq!(config.users_fixture, Some(PathBuf::from("json/users.json")));
    }

    #[test]
    fn bad_reader_count_is_rejected() {
        assert!(config(&[("LIGHTBNB_DB_READERS", "many")]).is_err());
    }
}

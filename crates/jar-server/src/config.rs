use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

/// Longest accepted login lifetime: ten years.
pub const MAX_SESSION_TTL_HOURS: u32 = 10 * 365 * 24;

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_ttl_hours: u32,
    pub static_dir: PathBuf,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let session_ttl_hours: u32 = var("JAR_SESSION_TTL_HOURS", "24")
            .parse()
            .context("Invalid JAR_SESSION_TTL_HOURS")?;
        ensure!(
            (1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours),
            "Invalid JAR_SESSION_TTL_HOURS: must be between 1 and {}",
            MAX_SESSION_TTL_HOURS
        );

        Ok(Self {
            host: var("JAR_HOST", "0.0.0.0"),
            port: var("JAR_PORT", "5000")
                .parse()
                .context("Invalid JAR_PORT")?,
            db_path: var("JAR_DB_PATH", "jar.db").into(),
            session_ttl_hours,
            static_dir: var("JAR_STATIC_DIR", "static").into(),
            secure_cookies: var("JAR_SECURE_COOKIES", "false")
                .parse()
                .context("Invalid JAR_SECURE_COOKIES")?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:5000");
        assert_eq!(config.db_path, PathBuf::from("jar.db"));
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("JAR_HOST", "127.0.0.1"),
            ("JAR_PORT", "8080"),
            ("JAR_SESSION_TTL_HOURS", "2"),
            ("JAR_SECURE_COOKIES", "true"),
        ])
        .unwrap();
        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert_eq!(config.session_ttl_hours, 2);
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_bad_port_is_reported() {
        let err = config_from(&[("JAR_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("JAR_PORT"));
    }

    #[test]
    fn test_bad_ttl_is_reported() {
        for bad in ["-1", "0", "87601", "2400000000", "a day"] {
            let err = config_from(&[("JAR_SESSION_TTL_HOURS", bad)]).unwrap_err();
            assert!(err.to_string().contains("JAR_SESSION_TTL_HOURS"), "{bad}");
        }
        let longest = MAX_SESSION_TTL_HOURS.to_string();
        let config = config_from(&[("JAR_SESSION_TTL_HOURS", &longest)]).unwrap();
        assert_eq!(config.session_ttl_hours, MAX_SESSION_TTL_HOURS);
    }
}

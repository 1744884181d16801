use anyhow::Context;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Keep only this many messages of history. Unbounded when unset.
    pub history_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            history_limit: None,
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT` and `CHAT_HISTORY_LIMIT`, picking up `.env` if present.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port.trim().parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
        }
        if let Some(limit) = get("CHAT_HISTORY_LIMIT") {
            let limit: usize = limit.trim().parse()
                .with_context(|| format!("CHAT_HISTORY_LIMIT must be a number, got {limit:?}"))?;
            anyhow::ensure!(limit > 0, "CHAT_HISTORY_LIMIT must be positive");
            config.history_limit = Some(limit);
        }

        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_everything() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("CHAT_HISTORY_LIMIT", "500"),
        ])).unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.history_limit, Some(500));
    }

    #[test]
    fn bad_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn zero_history_limit() {
        assert!(Config::from_lookup(lookup(&[("CHAT_HISTORY_LIMIT", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CHAT_HISTORY_LIMIT", "-3")])).is_err());
    }
}

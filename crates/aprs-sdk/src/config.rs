//! APRS-IS transport configuration.
//!
//! Built from environment variables at startup; CLI flags override
//! individual fields afterwards.

/// Software identifier sent in every login line.
pub const APRSIS_SW_VERSION: &str = concat!("aprs-rs ", env!("CARGO_PKG_VERSION"));

const DEFAULT_SERVERS: &str = "rotate.aprs.net,noam.aprs2.net";
const DEFAULT_FILTER_PORT: u16 = 14580;
const DEFAULT_RX_PORT: u16 = 8080;
const DEFAULT_URL: &str = "http://srvr.aprs-is.net:8080";
const DEFAULT_RECV_BUFFER: usize = 1024;

/// Where and how to reach APRS-IS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AprsIsConfig {
    /// Servers tried in order. An entry may carry its own `host:port`.
    pub servers: Vec<String>,
    /// Port of the filtered TCP feed (default `14580`).
    pub filter_port: u16,
    /// Port accepting UDP submissions (default `8080`).
    pub rx_port: u16,
    /// URL accepting HTTP submissions.
    pub url: String,
    /// Read chunk size for TCP links (default `1024`).
    pub recv_buffer: usize,
    /// Software identifier for the login line.
    pub software: String,
}

impl AprsIsConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable              | Default                            | Description                  |
    /// |-----------------------|------------------------------------|------------------------------|
    /// | `APRSIS_SERVERS`      | `rotate.aprs.net,noam.aprs2.net`   | Comma-separated server list  |
    /// | `APRSIS_FILTER_PORT`  | `14580`                            | Filtered TCP feed port       |
    /// | `APRSIS_RX_PORT`      | `8080`                             | UDP submit port              |
    /// | `APRSIS_URL`          | `http://srvr.aprs-is.net:8080`     | HTTP submit URL              |
    /// | `RECV_BUFFER`         | `1024`                             | TCP read chunk size          |
    ///
    /// Unparsable numbers fall back to their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let servers = lookup("APRSIS_SERVERS").unwrap_or_else(|| DEFAULT_SERVERS.to_string());
        let servers = servers
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            servers,
            filter_port: lookup("APRSIS_FILTER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FILTER_PORT),
            rx_port: lookup("APRSIS_RX_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RX_PORT),
            url: lookup("APRSIS_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
            recv_buffer: lookup("RECV_BUFFER")
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_RECV_BUFFER),
            software: APRSIS_SW_VERSION.to_string(),
        }
    }

    /// `host:port` for each server, using `port` where the entry has none.
    pub(crate) fn addresses(&self, port: u16) -> Vec<String> {
        self.servers
            .iter()
            .map(|server| {
                if server.contains(':') {
                    server.clone()
                } else {
                    format!("{server}:{port}")
                }
            })
            .collect()
    }
}

impl Default for AprsIsConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults() {
        let cfg = AprsIsConfig::default();
        assert_eq!(cfg.servers, vec!["rotate.aprs.net", "noam.aprs2.net"]);
        assert_eq!(cfg.filter_port, 14580);
        assert_eq!(cfg.rx_port, 8080);
        assert_eq!(cfg.url, "http://srvr.aprs-is.net:8080");
        assert_eq!(cfg.recv_buffer, 1024);
        assert!(cfg.software.starts_with("aprs-rs "));
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("APRSIS_SERVERS", " first.example , second.example:10152 ,"),
            ("APRSIS_FILTER_PORT", "not-a-port"),
            ("APRSIS_RX_PORT", "18080"),
            ("RECV_BUFFER", "0"),
        ]);
        let cfg = AprsIsConfig::from_lookup(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(cfg.servers, vec!["first.example", "second.example:10152"]);
        assert_eq!(cfg.filter_port, 14580);
        assert_eq!(cfg.rx_port, 18080);
        assert_eq!(cfg.recv_buffer, 1024);
        assert_eq!(
            cfg.addresses(cfg.filter_port),
            vec!["first.example:14580", "second.example:10152"]
        );
    }
}

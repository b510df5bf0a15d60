//! Server identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::schema::ServerConfig;

/// A configured backend server, identified by host and port.
///
/// Health is not stored here; the registry owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl From<&ServerConfig> for Server {
    fn from(config: &ServerConfig) -> Self {
        Self::new(config.host.clone(), config.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Server::new("10.6.30.132", 9090).to_string(), "10.6.30.132:9090");
    }

    #[test]
    fn test_from_config() {
        let config = ServerConfig {
            host: "hbase-1".to_string(),
            port: 9091,
        };
        assert_eq!(Server::from(&config), Server::new("hbase-1", 9091));
    }
}

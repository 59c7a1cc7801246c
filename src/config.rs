//! Server configuration.
//!
//! The command line takes exactly one positional argument, the TCP port.
//! Everything else is fixed at its default: the relay only ever binds the
//! loopback address.

use crate::{DEFAULT_HOST, MAX_CLIENTS, MAX_MESSAGE_SIZE, READ_CHUNK_SIZE};
use thiserror::Error;

/// Errors produced while building a [`Config`] from arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Anything other than a single argument was given
    #[error("Wrong number of arguments")]
    WrongArgumentCount,

    /// The argument is not a valid port number
    #[error("invalid port number: {0:?}")]
    InvalidPort(String),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on (0 picks an ephemeral port)
    pub port: u16,
    /// Maximum number of simultaneously admitted clients
    pub max_clients: usize,
    /// Maximum size of a client's unterminated line
    pub max_message_size: usize,
    /// Size of the buffer each read burst is received into
    pub read_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 0,
            max_clients: MAX_CLIENTS,
            max_message_size: MAX_MESSAGE_SIZE,
            read_chunk_size: READ_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Parses configuration from command-line arguments.
    ///
    /// `args` must not include the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let port = match (args.next(), args.next()) {
            (Some(port), None) => port,
            _ => return Err(ConfigError::WrongArgumentCount),
        };

        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        Ok(Config {
            port,
            ..Config::default()
        })
    }

    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_port_argument() {
        let config = Config::from_args(args(&["4242"])).unwrap();
        assert_eq!(config.port, 4242);
        assert_eq!(config.bind_address(), "127.0.0.1:4242");
        assert_eq!(config.max_clients, MAX_CLIENTS);
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            Config::from_args(args(&[])),
            Err(ConfigError::WrongArgumentCount)
        );
    }

    #[test]
    fn test_too_many_arguments() {
        assert_eq!(
            Config::from_args(args(&["4242", "extra"])),
            Err(ConfigError::WrongArgumentCount)
        );
    }

    #[test]
    fn test_invalid_port() {
        assert_eq!(
            Config::from_args(args(&["http"])),
            Err(ConfigError::InvalidPort("http".to_string()))
        );
        assert!(matches!(
            Config::from_args(args(&["70000"])),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_wrong_count_message() {
        assert_eq!(
            ConfigError::WrongArgumentCount.to_string(),
            "Wrong number of arguments"
        );
    }
}

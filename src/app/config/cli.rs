use super::{ConfigError, LogLevel};
use crate::buffer::DEFAULT_HISTORY_CAPACITY;
use crate::listener::DEFAULT_MAX_DATAGRAM_SIZE;
use crate::sender::DEFAULT_API_URL;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Address both listeners bind to
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub listen_host: String,

    /// Syslog UDP port
    #[arg(long, env = "UDP_PORT", default_value = "514")]
    pub udp_port: u16,

    /// Syslog TCP port
    #[arg(long, env = "TCP_PORT", default_value = "514")]
    pub tcp_port: u16,

    /// Quarantine decision service endpoint
    #[arg(long, env = "QUARANTINE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Upper bound on one quarantine call, in seconds
    #[arg(long, env = "QUARANTINE_TIMEOUT_SECS", default_value = "5")]
    pub timeout_secs: u64,

    /// Number of recent lines kept in memory
    #[arg(long, env = "HISTORY_CAPACITY", default_value = "100")]
    pub history_capacity: usize,

    /// Largest UDP datagram read in one piece
    #[arg(long, env = "MAX_DATAGRAM_SIZE", default_value = "8192")]
    pub max_datagram_size: usize,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Extra `target=level` tracing directives
    #[arg(long = "log-directive", env = "LOG_DIRECTIVES", value_delimiter = ',')]
    pub log_directives: Vec<String>,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Derived from `timeout_secs`
    #[serde(skip)]
    #[arg(skip)]
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: "0.0.0.0".to_string(),
            udp_port: 514,
            tcp_port: 514,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 5,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            log_level: LogLevel::Info,
            log_directives: Vec::new(),
            config_file: None,
            timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Parse CLI arguments (clap falls back to the environment for each flag).
    /// When a config file is named, its values fill every flag that was not
    /// given on the command line or through the environment.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Config::command().try_get_matches_from(args)?;
        let config = Config::from_arg_matches(&matches)?;

        let mut config = match config.config_file.clone() {
            Some(path) => {
                let base = Self::load_file(&path)?;
                config.merged_over(base, &matches)
            }
            None => config,
        };

        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(path)?;
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Keep values set on the command line or in the environment; take the
    /// rest from `base`.
    fn merged_over(self, base: Config, matches: &ArgMatches) -> Config {
        let set = |id: &str| is_explicit(matches, id);
        Config {
            listen_host: pick(set("listen_host"), self.listen_host, base.listen_host),
            udp_port: pick(set("udp_port"), self.udp_port, base.udp_port),
            tcp_port: pick(set("tcp_port"), self.tcp_port, base.tcp_port),
            api_url: pick(set("api_url"), self.api_url, base.api_url),
            timeout_secs: pick(set("timeout_secs"), self.timeout_secs, base.timeout_secs),
            history_capacity: pick(
                set("history_capacity"),
                self.history_capacity,
                base.history_capacity,
            ),
            max_datagram_size: pick(
                set("max_datagram_size"),
                self.max_datagram_size,
                base.max_datagram_size,
            ),
            log_level: pick(set("log_level"), self.log_level, base.log_level),
            log_directives: pick(
                set("log_directives"),
                self.log_directives,
                base.log_directives,
            ),
            config_file: self.config_file,
            timeout: self.timeout,
        }
    }

    pub fn post_process(&mut self) {
        self.timeout = Duration::from_secs(self.timeout_secs);
    }

    pub fn listen_ip(&self) -> Result<IpAddr, ConfigError> {
        self.listen_host.parse().map_err(|e| {
            ConfigError::InvalidConfig(format!(
                "Invalid listen host '{}': {e}",
                self.listen_host
            ))
        })
    }

    pub fn udp_bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.listen_ip()?, self.udp_port))
    }

    pub fn tcp_bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.listen_ip()?, self.tcp_port))
    }
}

fn is_explicit(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn pick<T>(explicit: bool, value: T, base: T) -> T {
    if explicit { value } else { base }
}

use super::{Config, ConfigError};
use url::Url;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid API URL '{}': {}", self.api_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must be an absolute http(s) URL: '{}'",
                self.api_url
            )));
        }

        self.listen_ip()?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidConfig(
                "History capacity must be greater than 0".to_string(),
            ));
        }

        if self.max_datagram_size == 0 || self.max_datagram_size > usize::from(u16::MAX) {
            return Err(ConfigError::InvalidConfig(format!(
                "Max datagram size must be between 1 and {}, got {}",
                u16::MAX,
                self.max_datagram_size
            )));
        }

        Ok(())
    }
}

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ServerError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen: String,
    /// Upper bound on the handling time of one request.
    pub request_timeout_secs: u64,
    /// Largest request body buffered for statistics and JSON decoding.
    pub max_body_bytes: usize,
    /// Largest accepted `limit` parameter.
    pub max_limit: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8081".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            max_limit: 1_000_000,
        }
    }
}

impl ServerConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        let config: ServerConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.request_timeout_secs == 0 {
            return Err(ServerError::InvalidConfig(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ServerError::InvalidConfig(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_limit < 1 {
            return Err(ServerError::InvalidConfig(
                "max_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
listen: "127.0.0.1:9000"
request_timeout_secs: 5
max_body_bytes: 4096
max_limit: 500
"#;
        let config: ServerConfig =
            serde_yaml::from_str(yaml).expect("Failed to deserialize config");
        assert_eq!(config.listen, "127.0.0.1:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_body_bytes, 4096);
        assert_eq!(config.max_limit, 500);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ServerConfig = serde_yaml::from_str("max_limit: 10").unwrap();
        assert_eq!(config.listen, "0.0.0.0:8081");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_limit, 10);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ServerConfig {
            request_timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ServerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen: \"127.0.0.1:0\"").unwrap();
        writeln!(file, "max_body_bytes: 0").unwrap();
        assert!(ServerConfig::load(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen: \"127.0.0.1:0\"").unwrap();
        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.listen, "127.0.0.1:0");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServerConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ServerError::ReadConfig { .. }));
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub points: PointsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

/// Hosted backend (auth + data API) connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. https://xyzcompany.supabase.co
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Where the OAuth provider sends the browser back to
    pub oauth_redirect_url: String,
    #[serde(default = "default_oauth_provider")]
    pub oauth_provider: String,
    #[serde(default = "default_oauth_scopes")]
    pub oauth_scopes: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: i64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointsConfig {
    /// Minimum seconds between successful claims
    #[serde(default = "default_claim_cooldown")]
    pub claim_cooldown_secs: i64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            claim_cooldown_secs: default_claim_cooldown(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_oauth_provider() -> String {
    "discord".to_string()
}

fn default_oauth_scopes() -> String {
    "identify email".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_session_ttl() -> i64 {
    86_400 // 24 hours
}

fn default_sweep_interval() -> u64 {
    300 // 5 minutes
}

fn default_claim_cooldown() -> i64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        // Validate backend config
        if self.backend.url.is_empty() {
            bail!("backend url must not be empty");
        }

        if !self.backend.url.starts_with("http://") && !self.backend.url.starts_with("https://") {
            bail!("backend url must start with http:// or https://");
        }

        if self.backend.anon_key.is_empty() {
            bail!("anon_key must not be empty");
        }

        if self.backend.oauth_redirect_url.is_empty() {
            bail!("oauth_redirect_url must not be empty");
        }

        if self.backend.oauth_provider.is_empty() {
            bail!("oauth_provider must not be empty");
        }

        if self.backend.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        // Validate session config
        if self.session.ttl_seconds <= 0 {
            bail!("session ttl_seconds must be greater than 0");
        }

        if self.session.sweep_interval_seconds == 0 {
            bail!("sweep_interval_seconds must be greater than 0");
        }

        // Validate that the session TTL is greater than the sweep interval
        if self.session.ttl_seconds <= self.session.sweep_interval_seconds as i64 {
            bail!(
                "session ttl_seconds ({}) must be greater than sweep_interval_seconds ({})",
                self.session.ttl_seconds,
                self.session.sweep_interval_seconds
            );
        }

        // Validate points config
        if self.points.claim_cooldown_secs < 0 {
            bail!("claim_cooldown_secs must be non-negative");
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_CONFIG: &str = r#"
        [server]
        port = 8080

        [backend]
        url = "https://example.supabase.co"
        anon_key = "anon-test-key"
        oauth_redirect_url = "https://welder.host/auth"

        [logging]
        level = "info"
        format = "json"
    "#;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let (_dir, path) = write_config(MINIMAL_CONFIG);
        let config = Config::from_file(&path).expect("Failed to load config");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.oauth_provider, "discord");
        assert_eq!(config.backend.oauth_scopes, "identify email");
        assert_eq!(config.session.ttl_seconds, 86_400);
        assert_eq!(config.session.sweep_interval_seconds, 300);
        assert_eq!(config.points.claim_cooldown_secs, 5);
    }

    #[test]
    fn test_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/config.toml");
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let content = MINIMAL_CONFIG.replace("port = 8080", "port = 0");
        let (_dir, path) = write_config(&content);
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_bad_backend_url_rejected() {
        let content = MINIMAL_CONFIG.replace(
            "url = \"https://example.supabase.co\"",
            "url = \"example.supabase.co\"",
        );
        let (_dir, path) = write_config(&content);
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_ttl_must_exceed_sweep_interval() {
        let content = format!(
            "{}\n[session]\nttl_seconds = 60\nsweep_interval_seconds = 300\n",
            MINIMAL_CONFIG
        );
        let (_dir, path) = write_config(&content);
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let content = MINIMAL_CONFIG.replace("level = \"info\"", "level = \"verbose\"");
        let (_dir, path) = write_config(&content);
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_cooldown_override() {
        let content = format!("{}\n[points]\nclaim_cooldown_secs = 10\n", MINIMAL_CONFIG);
        let (_dir, path) = write_config(&content);
        let config = Config::from_file(&path).expect("Failed to load config");
        assert_eq!(config.points.claim_cooldown_secs, 10);
    }
}

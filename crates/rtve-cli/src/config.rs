//! Settings file for the scraper
//!
//! Every key is optional; anything left out falls back to the library
//! defaults. Command-line flags take precedence over the file.
//!
//! ```toml
//! user_agent = "Mozilla/5.0 (compatible; DiscopolisBot/1.0)"
//! download_delay_secs = 3.0
//! timeout_secs = 30
//! listing_url = "https://www.rtve.es/play/audios/moduloRadio/1936/emisiones"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use rtve_core::ClientConfig;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub download_delay_secs: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub listing_url: Option<String>,
    pub api_url: Option<String>,
}

impl Settings {
    /// Read settings from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if let Some(delay) = self.download_delay_secs {
            if let Err(e) = Duration::try_from_secs_f64(delay) {
                bail!("download_delay_secs must be a non-negative number of seconds, got {}: {}", delay, e);
            }
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, delay: Option<f64>, user_agent: Option<String>) -> Result<Self> {
        if delay.is_some() {
            self.download_delay_secs = delay;
        }
        if user_agent.is_some() {
            self.user_agent = user_agent;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            accept_language: self
                .accept_language
                .clone()
                .unwrap_or(defaults.accept_language),
            download_delay: self
                .download_delay_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .unwrap_or(defaults.download_delay),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_settings_use_library_defaults() {
        let settings = Settings::parse("").unwrap();
        let config = settings.client_config();
        let defaults = ClientConfig::default();
        assert_eq!(config.user_agent, defaults.user_agent);
        assert_eq!(config.download_delay, defaults.download_delay);
        assert_eq!(config.timeout_secs, defaults.timeout_secs);
    }

    #[test]
    fn test_parse_full_settings() {
        let settings = Settings::parse(
            r#"
            user_agent = "TestBot/0.1"
            accept_language = "en"
            download_delay_secs = 0.5
            timeout_secs = 10
            api_url = "http://localhost/api"
            "#,
        )
        .unwrap();

        let config = settings.client_config();
        assert_eq!(config.user_agent, "TestBot/0.1");
        assert_eq!(config.accept_language, "en");
        assert_eq!(config.download_delay, Duration::from_millis(500));
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(settings.api_url.as_deref(), Some("http://localhost/api"));
        assert_eq!(settings.listing_url, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::parse("concurrent_requests = 8").is_err());
    }

    #[test]
    fn test_negative_delay_rejected() {
        assert!(Settings::parse("download_delay_secs = -1.0").is_err());
        assert!(Settings::default().with_overrides(Some(-2.0), None).is_err());
    }

    #[test]
    fn test_out_of_range_delay_rejected() {
        assert!(Settings::parse("download_delay_secs = 1e20").is_err());
        assert!(Settings::parse("download_delay_secs = nan").is_err());
        assert!(Settings::default().with_overrides(Some(1e20), None).is_err());
        assert!(Settings::default().with_overrides(Some(f64::INFINITY), None).is_err());
    }

    #[test]
    fn test_client_config_ignores_unrepresentable_delay() {
        let settings = Settings {
            download_delay_secs: Some(1e20),
            ..Settings::default()
        };
        assert_eq!(
            settings.client_config().download_delay,
            ClientConfig::default().download_delay
        );
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::parse("download_delay_secs = 3.0\nuser_agent = \"A\"")
            .unwrap()
            .with_overrides(Some(1.0), None)
            .unwrap();
        assert_eq!(settings.download_delay_secs, Some(1.0));
        assert_eq!(settings.user_agent.as_deref(), Some("A"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.timeout_secs, Some(5));
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/rtve.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}

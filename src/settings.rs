use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::session::{SESSION_COOKIE_NAME, SESSION_COOKIE_PATH, SESSION_SCOPED_MAX_AGE};

/// Name of the settings file looked up in the working and config directories
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionSettings {
    pub application: ApplicationSettings,
    pub cookie: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Comma-separated origins allowed to send credentialed requests
    pub cors_origins: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub name: String,
    /// Cookie lifetime in seconds. Negative means a session cookie.
    pub max_age_seconds: i64,
    /// Only send the cookie over TLS. Required when `same_site` is `None`.
    pub secure: bool,
    /// `Strict`, `Lax`, `None`, or empty to omit the attribute
    pub same_site: String,
    pub path: String,
    pub domain: Option<String>,
    pub http_only: bool,
    /// Base64-encode the session identifier in the cookie value
    pub base64_encoding: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_string(),
            max_age_seconds: SESSION_SCOPED_MAX_AGE,
            secure: true, // Required for cross-domain
            same_site: "None".to_string(),
            path: SESSION_COOKIE_PATH.to_string(),
            domain: None,
            http_only: false,
            base64_encoding: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SessionSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - Logger initialization fails
    pub fn load() -> Result<Self> {
        Self::load_env_file();

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        settings
            .logger_builder()
            .try_init()
            .context("Failed to initialize logger")?;

        Ok(settings)
    }

    /// Logger configured from `RUST_LOG`, falling back to `logging.level`
    #[must_use]
    pub fn logger_builder(&self) -> env_logger::Builder {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.logging.level.as_str()),
        )
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `SESSION_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed
    fn load_base_settings() -> Result<Self> {
        let mut settings = Self::default();

        if let Some(loaded) = Self::load_from_dir(Path::new("."))? {
            settings = loaded;
        }

        if let Ok(config_dir) = std::env::var("SESSION_CONFIG_DIR") {
            match Self::load_from_dir(Path::new(&config_dir))? {
                Some(loaded) => settings = loaded,
                None => log::info!(
                    "SESSION_CONFIG_DIR set but no {SETTINGS_FILE} found in: {config_dir}"
                ),
            }
        }

        Ok(settings)
    }

    /// Load `Settings.toml` from a directory, `None` if the file does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let toml_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Self = basic_toml::from_str(&toml_content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::info!("Loaded settings from {}", path.display());
        Ok(Some(settings))
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_cookie_env_overrides(&mut settings.cookie);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for application settings
    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        apply_parsed_env_override("PORT", &mut app_settings.port);
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    /// Apply environment overrides for cookie settings
    pub fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(name) = std::env::var("COOKIE_NAME") {
            cookie_settings.name = name;
        }
        apply_parsed_env_override("COOKIE_MAX_AGE", &mut cookie_settings.max_age_seconds);
        apply_parsed_env_override("COOKIE_SECURE", &mut cookie_settings.secure);
        if let Ok(same_site) = std::env::var("COOKIE_SAME_SITE") {
            cookie_settings.same_site = same_site;
        }
        if let Ok(path) = std::env::var("COOKIE_PATH") {
            cookie_settings.path = path;
        }
        if let Ok(domain) = std::env::var("COOKIE_DOMAIN") {
            cookie_settings.domain = Some(domain).filter(|domain| !domain.is_empty());
        }
        apply_parsed_env_override("COOKIE_HTTP_ONLY", &mut cookie_settings.http_only);
        apply_parsed_env_override("COOKIE_BASE64", &mut cookie_settings.base64_encoding);
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                if line.trim_start().starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Parse an environment variable into `target`, leaving it untouched when
/// unset or unparsable
fn apply_parsed_env_override<T: std::str::FromStr>(env_var: &str, target: &mut T) {
    if let Ok(value_str) = std::env::var(env_var) {
        match value_str.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => log::warn!("Ignoring unparsable {env_var}={value_str}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Helper function to clean all relevant environment variables for tests
    fn clean_env_vars() {
        for var in [
            "COOKIE_NAME",
            "COOKIE_MAX_AGE",
            "COOKIE_SECURE",
            "COOKIE_SAME_SITE",
            "COOKIE_PATH",
            "COOKIE_DOMAIN",
            "COOKIE_HTTP_ONLY",
            "COOKIE_BASE64",
            "PORT",
            "CORS_ORIGINS",
            "RUST_LOG",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_cookie_defaults_match_cross_domain_policy() {
        let cookie = CookieSettings::default();
        assert_eq!(cookie.name, "JSESSIONID");
        assert_eq!(cookie.max_age_seconds, -1);
        assert!(cookie.secure);
        assert_eq!(cookie.same_site, "None");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.domain, None);
    }

    #[test]
    #[serial]
    fn test_cookie_env_overrides() {
        clean_env_vars();

        std::env::set_var("COOKIE_SECURE", "false");
        std::env::set_var("COOKIE_SAME_SITE", "Lax");
        std::env::set_var("COOKIE_MAX_AGE", "1800");
        std::env::set_var("COOKIE_DOMAIN", "example.com");

        let mut cookie = CookieSettings::default();
        SessionSettings::apply_cookie_env_overrides(&mut cookie);

        assert!(!cookie.secure);
        assert_eq!(cookie.same_site, "Lax");
        assert_eq!(cookie.max_age_seconds, 1800);
        assert_eq!(cookie.domain, Some("example.com".to_string()));
        assert_eq!(cookie.name, "JSESSIONID"); // Should remain unchanged

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_unparsable_env_override_is_ignored() {
        clean_env_vars();

        std::env::set_var("COOKIE_SECURE", "maybe");
        std::env::set_var("PORT", "not-a-port");

        let mut settings = SessionSettings::default();
        SessionSettings::apply_env_overrides(&mut settings);

        assert!(settings.cookie.secure);
        assert_eq!(settings.application.port, 8080);

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_logging_level_from_file_applies_to_logger() {
        clean_env_vars();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "[logging]\nlevel = \"debug\"\n").unwrap();
        let mut settings = SessionSettings::load_from_dir(dir.path()).unwrap().unwrap();
        SessionSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.logger_builder().build().filter(), log::LevelFilter::Debug);

        std::env::set_var("RUST_LOG", "warn");
        SessionSettings::apply_env_overrides(&mut settings);
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logger_builder().build().filter(), log::LevelFilter::Warn);

        clean_env_vars();
    }

    #[test]
    fn test_load_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SessionSettings::load_from_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_from_dir_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            "[application]\nport = 9090\n\n[cookie]\nsecure = false\nsame_site = \"Lax\"\n",
        )
        .unwrap();

        let settings = SessionSettings::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(settings.application.port, 9090);
        assert_eq!(settings.application.host, "0.0.0.0");
        assert!(!settings.cookie.secure);
        assert_eq!(settings.cookie.same_site, "Lax");
        assert_eq!(settings.cookie.name, "JSESSIONID");
    }

    #[test]
    fn test_load_from_dir_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "[cookie\nsecure = ").unwrap();
        assert!(SessionSettings::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let mut settings = SessionSettings::default();
        settings.application.cors_origins =
            "https://app.example.com, https://admin.example.com,".to_string();
        assert_eq!(
            settings.get_cors_origins(),
            vec![
                "https://app.example.com".to_string(),
                "https://admin.example.com".to_string()
            ]
        );
        assert_eq!(settings.get_bind_address(), "0.0.0.0:8080");
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub mail: MailConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub migrate_on_start: bool,
}

/// Where `GET /api/projects` reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// The `project` table, populated by the seeder.
    Database,
    /// The JSON fixture, re-read on every request.
    StaticFile,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Database => write!(f, "database"),
            CatalogSource::StaticFile => write!(f, "static_file"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    pub fixture_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,
    pub server: String,
    pub port: u16,
    /// STARTTLS upgrade on a plain connection.
    pub use_tls: bool,
    /// TLS from the first byte (SMTPS, usually port 465). Takes precedence
    /// over `use_tls`.
    pub use_ssl: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_sender: Option<String>,
    pub recipient: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./portfolio.db".to_string(),
            max_connections: 10,
            connection_timeout_seconds: 30,
            migrate_on_start: true,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Database,
            fixture_path: PathBuf::from("data/projects.json"),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server: "smtp.gmail.com".to_string(),
            port: 587,
            use_tls: true,
            use_ssl: false,
            username: None,
            password: None,
            default_sender: None,
            recipient: None,
            timeout_seconds: 60,
        }
    }
}

impl MailConfig {
    /// The address notifications are sent from: the configured default
    /// sender, or the SMTP username when no sender is set.
    pub fn sender(&self) -> Option<&str> {
        let non_blank = |s: &&str| !s.trim().is_empty();
        self.default_sender
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.username.as_deref().filter(non_blank))
    }
}

/// Conventional unprefixed variables, mapped onto config keys. These win
/// over `APP__*` variables so existing deployments keep working.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("CATALOG_SOURCE", "catalog.source"),
    ("PROJECTS_FIXTURE", "catalog.fixture_path"),
    ("MAIL_ENABLED", "mail.enabled"),
    ("MAIL_SERVER", "mail.server"),
    ("MAIL_PORT", "mail.port"),
    ("MAIL_USE_TLS", "mail.use_tls"),
    ("MAIL_USE_SSL", "mail.use_ssl"),
    ("MAIL_USERNAME", "mail.username"),
    ("MAIL_PASSWORD", "mail.password"),
    ("MAIL_DEFAULT_SENDER", "mail.default_sender"),
    ("MAIL_RECIPIENT", "mail.recipient"),
];

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Builds the configuration with `lookup` resolving the unprefixed
    /// variables in [`ENV_OVERRIDES`].
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        for &(var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, lookup(var))?;
        }

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max connections must be greater than 0".to_string(),
            ));
        }

        if self.catalog.source == CatalogSource::StaticFile
            && self.catalog.fixture_path.as_os_str().is_empty()
        {
            return Err(ConfigError::Message(
                "Static catalog requires a fixture path".to_string(),
            ));
        }

        if self.mail.enabled {
            self.validate_mail()?;
        }

        Ok(())
    }

    fn validate_mail(&self) -> Result<(), ConfigError> {
        let required = [
            ("MAIL_SERVER", Some(self.mail.server.as_str())),
            ("MAIL_USERNAME", self.mail.username.as_deref()),
            ("MAIL_PASSWORD", self.mail.password.as_deref()),
            ("MAIL_RECIPIENT", self.mail.recipient.as_deref()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Message(format!(
                "Mail is enabled but {} not set",
                missing.join(", ")
            )));
        }

        if self.mail.sender().is_none() {
            return Err(ConfigError::Message(
                "Mail is enabled but no sender address is available".to_string(),
            ));
        }

        if self.mail.port == 0 {
            return Err(ConfigError::Message("Mail port cannot be 0".to_string()));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn mail_ready() -> AppConfig {
        let mut config = AppConfig::default();
        config.mail.enabled = true;
        config.mail.username = Some("me@example.com".to_string());
        config.mail.password = Some("app-password".to_string());
        config.mail.recipient = Some("inbox@example.com".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite:./portfolio.db");
        assert_eq!(config.catalog.source, CatalogSource::Database);
        assert!(!config.mail.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mail_requires_credentials_when_enabled() {
        let mut config = AppConfig::default();
        config.mail.enabled = true;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("MAIL_USERNAME"));
        assert!(err.contains("MAIL_RECIPIENT"));

        assert!(mail_ready().validate().is_ok());

        let mut blank = mail_ready();
        blank.mail.password = Some("   ".to_string());
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_sender_falls_back_to_username() {
        let mut config = mail_ready();
        assert_eq!(config.mail.sender(), Some("me@example.com"));

        config.mail.default_sender = Some("Portfolio <noreply@example.com>".to_string());
        assert_eq!(config.mail.sender(), Some("Portfolio <noreply@example.com>"));
    }

    #[test]
    fn test_blank_sender_falls_back_to_username() {
        let mut config = mail_ready();
        config.mail.default_sender = Some(String::new());
        assert_eq!(config.mail.sender(), Some("me@example.com"));

        config.mail.username = Some(" ".to_string());
        assert_eq!(config.mail.sender(), None);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");

        config.server.host = "0.0.0.0".to_string();
        config.server.port = 5000;
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_load_applies_conventional_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "9090"),
            ("CATALOG_SOURCE", "static_file"),
            ("MAIL_ENABLED", "true"),
            ("MAIL_PORT", "465"),
            ("MAIL_USE_TLS", "false"),
            ("MAIL_USE_SSL", "true"),
            ("MAIL_USERNAME", "me@example.com"),
            ("MAIL_PASSWORD", "secret"),
            ("MAIL_RECIPIENT", "inbox@example.com"),
        ]);

        let config = AppConfig::load_with(|key| vars.get(key).map(|v| v.to_string()))
            .expect("Should load configuration");

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.catalog.source, CatalogSource::StaticFile);
        assert!(config.mail.enabled);
        assert_eq!(config.mail.port, 465);
        assert!(config.mail.use_ssl);
        assert!(!config.mail.use_tls);
        assert_eq!(config.mail.sender(), Some("me@example.com"));
    }

    #[test]
    fn test_load_without_variables_uses_defaults() {
        let config = AppConfig::load_with(|_| None).expect("Should load configuration");

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database.url, "sqlite:./portfolio.db");
        assert_eq!(config.catalog.source, CatalogSource::Database);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(!config.mail.enabled);
        assert!(config.mail.username.is_none());
    }

    #[test]
    fn test_load_fails_fast_on_incomplete_mail() {
        let err = AppConfig::load_with(|key| match key {
            "MAIL_ENABLED" => Some("true".to_string()),
            _ => None,
        })
        .unwrap_err()
        .to_string();

        assert!(err.contains("MAIL_USERNAME"), "unexpected error: {}", err);
        assert!(err.contains("MAIL_RECIPIENT"), "unexpected error: {}", err);
    }
}

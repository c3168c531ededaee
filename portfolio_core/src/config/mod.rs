pub mod settings;

pub use settings::{AppConfig, CatalogConfig, CatalogSource, CorsConfig, DatabaseConfig, MailConfig, ServerConfig};

pub mod connection;
pub mod migrations;
pub mod repository;

pub use connection::{DatabaseManager, get_database_pool, get_database_pool_with_config};
pub use migrations::{MigrationManager, run_migrations};
pub use repository::{MessageRepository, MessageStore, ProjectRepository, SeedReport};

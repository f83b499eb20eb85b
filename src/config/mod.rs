/// Database connection and schema creation
pub mod database;

/// Settings from config.toml and credentials from the environment
pub mod settings;

pub use settings::{AppConfig, ClassifierConfig, Credentials};

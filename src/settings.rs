use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Runtime settings. Defaults are overridden by `TRIVIA_*` variables, which
/// may come from a `.env` file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_path: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env(Environment::with_prefix("TRIVIA"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_path", "trivia.db")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

//! Runtime configuration.
//!
//! Settings come from `blogd.toml` in the working directory, overridden
//! by `BLOGD_`-prefixed environment variables. The password salt is the
//! one setting with no default: every stored credential is derived from
//! it, so starting without one is a configuration error, not a
//! degradable condition.

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file read from the working directory.
pub const CONFIG_FILE: &str = "blogd.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BLOGD_";

fn default_database() -> String {
    "blogd.db".to_owned()
}

/// Process-wide settings loaded once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database connection string or SQLite path.
    #[serde(default = "default_database")]
    pub database: String,
    /// Secret salt mixed into every stored password hash.
    pub password_salt: String,
}

/// Startup-fatal configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed or a required key is absent.
    #[error("configuration error: {0}")]
    Load(#[from] figment::Error),
    /// The salt was supplied but empty.
    #[error("password_salt must be non-empty")]
    EmptySalt,
}

impl AppConfig {
    /// Load from the default file and environment providers.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when extraction fails or the salt is
    /// missing or empty.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The provider stack: file first, environment on top.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract and validate from an explicit provider stack.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when extraction fails or the salt is
    /// missing or empty.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        if config.password_salt.is_empty() {
            return Err(ConfigError::EmptySalt);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn env_config_loading() {
        Jail::expect_with(|j| {
            j.set_env("BLOGD_DATABASE", "env.db");
            j.set_env("BLOGD_PASSWORD_SALT", "pepper");
            let cfg = AppConfig::from_figment(AppConfig::figment()).expect("load");
            assert_eq!(cfg.database, "env.db");
            assert_eq!(cfg.password_salt, "pepper");
            Ok(())
        });
    }

    #[rstest]
    fn database_defaults_when_unset() {
        Jail::expect_with(|j| {
            j.set_env("BLOGD_PASSWORD_SALT", "pepper");
            let cfg = AppConfig::from_figment(AppConfig::figment()).expect("load");
            assert_eq!(cfg.database, "blogd.db");
            Ok(())
        });
    }

    #[rstest]
    fn env_overrides_file() {
        Jail::expect_with(|j| {
            j.create_file(CONFIG_FILE, "database = \"file.db\"\npassword_salt = \"a\"")?;
            j.set_env("BLOGD_DATABASE", "env.db");
            let cfg = AppConfig::from_figment(AppConfig::figment()).expect("load");
            assert_eq!(cfg.database, "env.db");
            assert_eq!(cfg.password_salt, "a");
            Ok(())
        });
    }

    #[rstest]
    fn missing_salt_is_fatal() {
        Jail::expect_with(|_j| {
            assert!(matches!(
                AppConfig::from_figment(AppConfig::figment()),
                Err(ConfigError::Load(_))
            ));
            Ok(())
        });
    }

    #[rstest]
    fn empty_salt_is_fatal() {
        Jail::expect_with(|j| {
            j.set_env("BLOGD_PASSWORD_SALT", "");
            assert!(matches!(
                AppConfig::from_figment(AppConfig::figment()),
                Err(ConfigError::EmptySalt)
            ));
            Ok(())
        });
    }
}

use serde::{Deserialize, Serialize};
use std::env;

/// Signing key used when nothing else is configured. Production refuses it.
pub const DEVELOPMENT_SECRET_KEY: &str = "secret-dev";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_work_factor: u32,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SECRET_KEY must be set to a non-default value in production")]
    InsecureSecretKey,

    #[error("BCRYPT_WORK_FACTOR must be between 4 and 31, got {0}")]
    InvalidWorkFactor(u32),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // JOBLY_API_PORT wins over the generic PORT
        if let Some(port) = env::var("JOBLY_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("JOBLY_API_HOST") {
            self.api.host = v;
        }

        if let Ok(v) = env::var("SECRET_KEY") {
            if !v.is_empty() {
                self.security.secret_key = v;
            }
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("BCRYPT_WORK_FACTOR") {
            self.security.bcrypt_work_factor = v.parse().unwrap_or(self.security.bcrypt_work_factor);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Checks settings that must hold before the server accepts traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment == Environment::Production
            && self.security.secret_key == DEVELOPMENT_SECRET_KEY
        {
            return Err(ConfigError::InsecureSecretKey);
        }
        let cost = self.security.bcrypt_work_factor;
        if !(4..=31).contains(&cost) {
            return Err(ConfigError::InvalidWorkFactor(cost));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            security: SecurityConfig {
                secret_key: DEVELOPMENT_SECRET_KEY.to_string(),
                jwt_expiry_hours: 24 * 7,
                bcrypt_work_factor: 12,
                cors_origins: vec![],
            },
        }
    }

    /// Cheap hashing and an in-memory store.
    pub fn test() -> Self {
        Self {
            environment: Environment::Test,
            database: DatabaseConfig {
                url: None,
                max_connections: 2,
                connection_timeout: 5,
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            security: SecurityConfig {
                secret_key: DEVELOPMENT_SECRET_KEY.to_string(),
                jwt_expiry_hours: 1,
                bcrypt_work_factor: 4,
                cors_origins: vec![],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            security: SecurityConfig {
                secret_key: DEVELOPMENT_SECRET_KEY.to_string(),
                jwt_expiry_hours: 4,
                bcrypt_work_factor: 12,
                cors_origins: vec![],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.database.url.is_none());
        assert_eq!(config.security.bcrypt_work_factor, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_uses_cheap_hashing() {
        let config = AppConfig::test();
        assert_eq!(config.security.bcrypt_work_factor, 4);
        assert_eq!(config.bind_addr(), "127.0.0.1:0");
    }

    #[test]
    fn production_rejects_development_secret() {
        let mut config = AppConfig::production();
        assert!(matches!(config.validate(), Err(ConfigError::InsecureSecretKey)));

        config.security.secret_key = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_work_factor() {
        let mut config = AppConfig::development();
        config.security.bcrypt_work_factor = 2;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorkFactor(2))));
    }
}

use serde::Deserialize;
use std::env;
use tourism_shared::Masked;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub services: ServicesConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Base URLs of the upstream services, including the `/api/v1` prefix
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub auth_url: String,
    pub catalog_url: String,
    pub booking_url: String,
    /// Static bearer token for service calls
    #[serde(default)]
    pub api_token: Option<String>,
    /// Service account used to log in when no token is configured
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Masked<String>>,
}

/// How upstream calls authenticate
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCredentials {
    Token(String),
    Login { username: String, password: Masked<String> },
    Anonymous,
}

impl ServicesConfig {
    /// A configured token wins over a service account
    pub fn credentials(&self) -> ServiceCredentials {
        match (&self.api_token, &self.username, &self.password) {
            (Some(token), _, _) if !token.trim().is_empty() => ServiceCredentials::Token(token.clone()),
            (_, Some(username), Some(password)) if !username.trim().is_empty() => ServiceCredentials::Login {
                username: username.clone(),
                password: password.clone(),
            },
            _ => ServiceCredentials::Anonymous,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_source")]
    pub default_source: String,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            default_source: default_source(),
        }
    }
}

fn default_currency() -> String { "INR".to_string() }
fn default_source() -> String { "WALK_IN".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TOURISM_SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("TOURISM").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

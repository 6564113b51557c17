//! Credentials and environment selection.
//!
//! Both are fixed at client construction. The environment picks one of two
//! API hosts; sandbox is the default.

use std::fmt;
use std::str::FromStr;

use crate::error::RootError;

pub const PRODUCTION_URL: &str = "https://api.root.co.za/v1/insurance";
pub const SANDBOX_URL: &str = "https://sandbox.root.co.za/v1/insurance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_URL,
            Environment::Sandbox => SANDBOX_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = RootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(RootError::invalid(format!("Unknown environment: {other}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// App credentials used for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    /// May be blank.
    pub app_secret: String,
    pub environment: Environment,
}

impl Credentials {
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            environment,
        }
    }

    /// Read `ROOT_APP_ID`, `ROOT_APP_SECRET` and `ROOT_ENVIRONMENT`.
    ///
    /// Only the app id is required; the secret defaults to blank and the
    /// environment to sandbox.
    pub fn from_env() -> Result<Self, RootError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RootError> {
        let app_id = lookup("ROOT_APP_ID")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RootError::invalid("ROOT_APP_ID is not set"))?;
        let app_secret = lookup("ROOT_APP_SECRET").unwrap_or_default();
        let environment = match lookup("ROOT_ENVIRONMENT") {
            Some(env) if !env.is_empty() => env.parse()?,
            _ => Environment::default(),
        };
        Ok(Self {
            app_id,
            app_secret,
            environment,
        })
    }
}

// The secret stays out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

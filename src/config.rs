//! Configuration management for marketplace page sessions

use crate::session::{TransitionPolicy, WaitPolicy};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MARKETPLACE";

/// Credentials of a named test user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,

    /// Name shown in the account controller once signed in
    #[serde(default)]
    pub name: Option<String>,
}

impl UserCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site under test
    pub base_url: String,

    /// Element resolution budget in milliseconds
    pub wait_timeout_ms: u64,

    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Probe the destination page after every navigation transition
    pub verify_transitions: bool,

    /// WebDriver server endpoint
    pub webdriver_url: String,

    /// Id of an existing WebDriver session to attach to
    pub webdriver_session: Option<String>,

    /// Log level
    pub log_level: String,

    /// Test users by name
    pub users: HashMap<String, UserCredentials>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://marketplace-dev.allizom.org/".to_string(),
            wait_timeout_ms: crate::session::wait::DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: crate::session::wait::DEFAULT_POLL_INTERVAL_MS,
            verify_transitions: true,
            webdriver_url: "http://localhost:4444".to_string(),
            webdriver_session: None,
            log_level: "info".to_string(),
            users: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(base_url) = env::var("MARKETPLACE_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(timeout) = env::var("MARKETPLACE_WAIT_TIMEOUT_MS") {
            config.wait_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid MARKETPLACE_WAIT_TIMEOUT_MS"))?;
        }

        if let Ok(interval) = env::var("MARKETPLACE_POLL_INTERVAL_MS") {
            config.poll_interval_ms = interval
                .parse()
                .map_err(|_| Error::configuration("Invalid MARKETPLACE_POLL_INTERVAL_MS"))?;
        }

        if let Ok(verify) = env::var("MARKETPLACE_VERIFY_TRANSITIONS") {
            config.verify_transitions = verify
                .parse()
                .map_err(|_| Error::configuration("Invalid MARKETPLACE_VERIFY_TRANSITIONS"))?;
        }

        if let Ok(webdriver_url) = env::var("MARKETPLACE_WEBDRIVER_URL") {
            config.webdriver_url = webdriver_url;
        }

        if let Ok(session) = env::var("MARKETPLACE_WEBDRIVER_SESSION") {
            config.webdriver_session = Some(session);
        }

        if let Ok(log_level) = env::var("MARKETPLACE_LOG_LEVEL") {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))
    }

    /// Defaults, then the optional file, then `MARKETPLACE_*` variables
    pub fn layered(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|settings| settings.try_deserialize::<Config>())
            .map_err(|e| Error::configuration(format!("Failed to load config: {}", e)))
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_millis(self.wait_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.verify_transitions {
            TransitionPolicy::Verify
        } else {
            TransitionPolicy::TrustCallSite
        }
    }

    /// Add a user
    pub fn with_user(mut self, name: impl Into<String>, credentials: UserCredentials) -> Self {
        self.users.insert(name.into(), credentials);
        self
    }
}

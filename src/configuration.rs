use std::{env, time};

use config::{Config, ConfigError, Environment, File};
use phonenumber::country;
use secrecy::SecretString;
use url::{ParseError, Url};

use crate::domain::PhoneNumber;
use crate::sms_client::SmsClient;

/// Settings
#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub sms_client: SmsClientSettings,
    pub auth: AuthSettings,
}

impl Settings {
    /// Get settings from configuration files
    pub fn get_config() -> Result<Self, ConfigError> {
        let path = env::current_dir().expect("Failed to determine the current directory");
        let config_dir = path.join("config");

        // Detect the running environment (default: `dev`)
        let env: Env = env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "dev".into())
            .try_into()
            .expect("Failed to parse APP_ENVIRONMENT");

        // Read the configuration from files and environment variables
        Config::builder()
            // Base configuration file
            .add_source(File::from(config_dir.join("base.yaml")).required(true))
            // Environment-specific configuration file
            .add_source(File::from(config_dir.join(env.as_str())).required(true))
            // Environment variables (e.g., `BULKSMS__SMS_CLIENT__AUTH_TOKEN`
            // would set Settings.sms_client.auth_token)
            .add_source(
                Environment::with_prefix("BULKSMS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Application settings
#[derive(Clone, serde::Deserialize)]
pub struct ApplicationSettings {
    pub app_host: String,
    pub app_port: u16,
}

/// SMS client settings
#[derive(Clone, serde::Deserialize)]
pub struct SmsClientSettings {
    pub base_url: String,
    pub account_sid: String,
    pub auth_token: SecretString,
    pub sender_number: String,
    pub default_region: String,
    pub timeout_millis: u64,
}

impl SmsClientSettings {
    /// Build the SMS client
    pub fn client(self) -> SmsClient {
        let base_url = self.base_url().expect("Invalid base URL");
        let sender = self.sender_number().expect("Invalid sender phone number");
        let timeout = self.timeout();
        SmsClient::new(base_url, self.account_sid, self.auth_token, sender, timeout)
    }

    /// Parse base URL
    pub fn base_url(&self) -> Result<Url, ParseError> {
        Url::parse(&self.base_url)
    }

    /// Parse sender phone number
    pub fn sender_number(&self) -> Result<PhoneNumber, String> {
        let region = self.region()?;
        PhoneNumber::parse(&self.sender_number, region).map_err(|e| e.to_string())
    }

    /// Parse default region for phone number normalization
    pub fn region(&self) -> Result<country::Id, String> {
        self.default_region.parse::<country::Id>().map_err(|_| {
            format!(
                "`{}` is not a recognized region code",
                self.default_region
            )
        })
    }

    /// Get configured timeout
    pub const fn timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_millis)
    }
}

/// Basic-auth settings gating the whole UI
#[derive(Clone, serde::Deserialize)]
pub struct AuthSettings {
    pub username: String,
    pub password: SecretString,
}

/// Available runtime environments
pub enum Env {
    Development,
    Production,
}

impl Env {
    /// Represent environment as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "prd",
        }
    }
}

impl TryFrom<String> for Env {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Self::Development),
            "prd" => Ok(Self::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `dev` or `prd`"
            )),
        }
    }
}

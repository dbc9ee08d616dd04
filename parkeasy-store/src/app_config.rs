use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// How long a generated quote stays acceptable
    pub quote_hold_seconds: u64,
    /// Probability that the simulated gateway approves a charge
    pub payment_success_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Reference filter behavior: the parking-type criterion decides
    /// inclusion on its own instead of ANDing with the amenity criterion
    #[serde(default)]
    pub legacy_parking_type_short_circuit: bool,
    #[serde(default = "default_recent_search_cap")]
    pub recent_search_cap: usize,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_recent_search_cap() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of PARKEASY)
            // Eg.. `PARKEASY_SERVER__PORT=8081` would set the server port
            .add_source(config::Environment::with_prefix("PARKEASY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

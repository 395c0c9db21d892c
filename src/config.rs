use std::time::Duration as StdDuration;

use chrono::Duration;
use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::admin::AdminCore;
use crate::registry::RegistryService;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default = "default_auth_ttl")]
    auth_ttl: u32,
    #[serde(default = "default_ledger_timeout")]
    ledger_timeout: u64,
    admin_username: String,
    // secrets
    jwt_secret: String,
    admin_password_hash: String,
}

fn default_auth_ttl() -> u32 {
    15 * 60
}

fn default_ledger_timeout() -> u64 {
    2000
}

impl Config {
    /// Valid lifetime of an admin session in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// How long to wait for the ledger before reporting it unavailable, in milliseconds.
    pub fn ledger_timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.ledger_timeout)
    }

    /// Secret key used to sign session JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// The admin account allowed to manage candidates and tokens.
    pub fn admin(&self) -> AdminCore {
        AdminCore {
            username: self.admin_username.clone(),
            password_hash: self.admin_password_hash.clone(),
        }
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Refuse to start with an admin who could never log in.
        if argon2::verify_encoded(&config.admin_password_hash, b"").is_err() {
            error!("`admin_password_hash` is not a valid argon2 encoded hash");
            return Err(rocket);
        }

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// A fairing that creates the shared [`RegistryService`] and places it into
/// managed state. This depends on the config being available in managed
/// state, and so must be attached after [`ConfigFairing`].
pub struct RegistryFairing;

#[rocket::async_trait]
impl Fairing for RegistryFairing {
    fn info(&self) -> Info {
        Info {
            name: "Registry",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let timeout = match rocket.state::<Config>() {
            Some(config) => config.ledger_timeout(),
            None => {
                error!("Config was not available when creating the registry");
                return Err(rocket);
            }
        };
        info!("Created voting registry, ledger timeout {timeout:?}");
        Ok(rocket.manage(RegistryService::new(timeout)))
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self {
                auth_ttl: default_auth_ttl(),
                ledger_timeout: default_ledger_timeout(),
                admin_username: "rotaract".to_string(),
                jwt_secret: "test-secret".to_string(),
                // Not a real hash; tests needing a login build their own.
                admin_password_hash: String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::Figment;

    use super::*;

    #[test]
    fn defaults_apply() {
        let figment = Figment::new()
            .merge(("admin_username", "rotaract"))
            .merge(("jwt_secret", "secret"))
            .merge(("admin_password_hash", "hash"));
        let config = figment.extract::<Config>().unwrap();
        assert_eq!(config.auth_ttl(), Duration::minutes(15));
        assert_eq!(config.ledger_timeout(), StdDuration::from_secs(2));
        assert_eq!(config.admin().username, "rotaract");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let figment = Figment::new().merge(("admin_username", "rotaract"));
        assert!(figment.extract::<Config>().is_err());
    }
}

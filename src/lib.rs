#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate registry_test;

use rocket::{figment::Figment, Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;

pub use config::Config;

use config::{ConfigFairing, RegistryFairing};
use logging::LoggerFairing;

/// Build the server from `Rocket.toml` and the `ROCKET_*` environment.
pub fn build() -> Rocket<Build> {
    rocket_from_figment(rocket::Config::figment())
}

/// Build the server from an explicit configuration source.
pub fn rocket_from_figment(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(RegistryFairing)
        .attach(LoggerFairing)
}

#[cfg(test)]
pub(crate) fn test_rocket() -> Rocket<Build> {
    use model::admin::{AdminCore, AdminCredentials};

    let admin = AdminCore::try_from(AdminCredentials::example()).unwrap();
    let figment = rocket::Config::figment()
        .merge(("admin_username", admin.username))
        .merge(("admin_password_hash", admin.password_hash))
        .merge(("jwt_secret", "test-secret"))
        .merge(("ledger_timeout", 500));
    rocket_from_figment(figment)
}

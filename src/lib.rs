#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::DatabaseFairing;
use crate::logging::LoggerFairing;
use crate::model::mongodb::SharedStore;

mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

/// The production server: connects to MongoDB on ignite.
pub fn build() -> Rocket<Build> {
    api::mount(
        rocket::build()
            .attach(LoggerFairing)
            .attach(DatabaseFairing),
    )
}

/// A server backed by an existing store, with no database fairing.
pub(crate) fn rocket_for_store(store: SharedStore) -> Rocket<Build> {
    api::mount(rocket::build().attach(LoggerFairing).manage(store))
}

use log::{error, info};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::mongodb::{ensure_indexes_exist, MongoStore, SharedStore};

/// Configuration for the database, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables.
#[derive(Debug, Deserialize)]
pub struct DbConfig {
    // secrets
    db_uri: String,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "events_db".to_string()
}

impl DbConfig {
    /// Name of the database holding the `users`, `events` and `attendance`
    /// collections.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// A fairing that loads the MongoDB config, connects to the database,
/// creates the lookup indexes, and places the resulting store into managed
/// state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");

        // Construct the connection. The driver connects lazily, so nothing
        // has touched the server yet.
        let client = match MongoClient::with_uri_str(&config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(config.db_name());
        info!("Using database {}", config.db_name());

        // Ensure the lookup indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to create collection indexes: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        let store: SharedStore = MongoStore::new(db).into_shared();
        rocket = rocket.manage(store);
        Ok(rocket)
    }
}

use std::sync::Arc;

use database::{DatabaseConnectionInfo, PgDatabase};
use log::{error, info, warn};
use weather::geolocation::{Geolocation, Ip2LocationTable};
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // geolocation
    let config = WebConfig::from_env().expect("invalid web configuration in env.");
    let geolocation: Arc<dyn Geolocation> = match &config.geolocation_db_path {
        Some(path) => {
            let table =
                Ip2LocationTable::from_path(path).expect("could not load geolocation database.");
            info!("loaded {} geolocation ranges from {}", table.len(), path.display());
            Arc::new(table)
        }
        None => {
            warn!("GEOLOCATION_DB_PATH is not set, clients cannot be located.");
            Arc::new(Ip2LocationTable::empty())
        }
    };

    // web server
    if let Err(why) = start_web_server(&config, WebState::new(database, geolocation)).await {
        error!("web server stopped: {}", why);
    }
}

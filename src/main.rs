use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use traveltime_api::{
    config::AppConfig,
    db::{
        memory::InMemoryStore,
        mongo::{create_mongo_client, MongoStore},
        SharedStore,
    },
    routes,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    let store: SharedStore = match &config.mongodb_uri {
        Some(uri) => {
            let client = create_mongo_client(uri)
                .await
                .map_err(std::io::Error::other)?;
            log::info!("Using MongoDB database '{}'", config.database_name);
            let store = MongoStore::new(client, config.database_name.clone());
            store
                .ensure_indexes()
                .await
                .map_err(std::io::Error::other)?;
            Arc::new(store)
        }
        None => Arc::new(InMemoryStore::new()),
    };

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(store.clone()))
            .configure(routes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

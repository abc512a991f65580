use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::db::SharedStore;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(store: web::Data<SharedStore>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let database_result = check_database(&store).await;
    health
        .services
        .insert("database".to_string(), database_result.clone());

    if database_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_database(store: &SharedStore) -> ServiceStatus {
    match store.ping().await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Connected to {} store", store.backend_tag())),
        },
        Err(e) => {
            log::error!("{} health check failed: {}", store.backend_tag(), e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

#![allow(dead_code)]

use actix_web::{web, App};
use std::sync::Arc;

use traveltime_api::db::memory::InMemoryStore;
use traveltime_api::db::{DestinationStore, SharedStore};
use traveltime_api::models::destination::{Destination, DestinationDraft};
use traveltime_api::routes;

pub struct TestApp {
    pub memory: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            memory: Arc::new(InMemoryStore::new()),
        }
    }

    pub fn store(&self) -> SharedStore {
        self.memory.clone()
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.store()))
            .configure(routes::config)
    }

    pub async fn seed_destination(&self, name: &str, base_price: f64) -> Destination {
        self.memory
            .insert_destination(DestinationDraft {
                name: name.to_string(),
                description: Some(format!("A trip to {}", name)),
                image_url: None,
                best_time: None,
                traveler_type: None,
                rating: 4.5,
                base_price,
            })
            .await
            .expect("seeding a destination should succeed")
    }
}

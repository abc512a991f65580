use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::bookings::{
    BookingConfirmation, BookingRequest, EstimateRequest, EstimateResponse,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Error text reported by the server, shown to the user as-is.
    #[error("{0}")]
    Api(String),
}

/// The two booking calls the form controller makes.
#[async_trait]
pub trait TravelApi: Send + Sync {
    async fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResponse, ClientError>;

    async fn book(&self, request: &BookingRequest) -> Result<BookingConfirmation, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;

        read_payload(payload).map_err(|e| {
            log::warn!("POST {} failed with {}: {}", url, status, e);
            e
        })
    }
}

/// Every response carries `success`; failures carry `error`.
fn read_payload<T: DeserializeOwned>(payload: Value) -> Result<T, ClientError> {
    if payload.get("success").and_then(Value::as_bool) != Some(true) {
        let message = payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(ClientError::Api(message));
    }

    serde_json::from_value(payload)
        .map_err(|e| ClientError::Api(format!("Unexpected response: {}", e)))
}

#[async_trait]
impl TravelApi for ApiClient {
    async fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResponse, ClientError> {
        self.post_json("/api/bookings/estimate", request).await
    }

    async fn book(&self, request: &BookingRequest) -> Result<BookingConfirmation, ClientError> {
        self.post_json("/api/bookings", request).await
    }
}

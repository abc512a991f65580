use serde::{Deserialize, Serialize};

use crate::models::serde_helpers::deserialize_optional_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub best_time: Option<String>,
    pub traveler_type: Option<String>,
    pub rating: f64,
    /// Per-traveler cost before any multiplier.
    pub base_price: f64,
}

/// Admin upsert payload: with `id` it updates, without it creates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationInput {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub best_time: Option<String>,
    pub traveler_type: Option<String>,
    pub rating: Option<f64>,
    pub base_price: Option<f64>,
}

/// Validated destination fields, ready to be written by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationDraft {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub best_time: Option<String>,
    pub traveler_type: Option<String>,
    pub rating: f64,
    pub base_price: f64,
}

impl DestinationDraft {
    pub fn into_destination(self, id: String) -> Destination {
        Destination {
            id,
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            best_time: self.best_time,
            traveler_type: self.traveler_type,
            rating: self.rating,
            base_price: self.base_price,
        }
    }
}

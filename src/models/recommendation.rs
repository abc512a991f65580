use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::serde_helpers::deserialize_optional_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub user_id: String,
    /// Free-text destination name, not a destination id.
    pub destination: String,
    pub reason: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub user_id: String,
    pub destination: String,
    pub reason: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl NewRecommendation {
    pub fn into_recommendation(self, id: String) -> Recommendation {
        Recommendation {
            id,
            user_id: self.user_id,
            destination: self.destination,
            reason: self.reason,
            rating: self.rating,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
    pub destination: Option<String>,
    pub reason: Option<String>,
    pub rating: Option<f64>,
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::serde_helpers::deserialize_optional_id;

const TRAVELERS_MESSAGE: &str = "travelers must be a whole number of at least 1";

/// Number of travelers on a trip. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelerCount(u32);

impl TravelerCount {
    pub fn new(count: u32) -> Option<Self> {
        (count >= 1).then_some(TravelerCount(count))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTravelerCount;

impl fmt::Display for InvalidTravelerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TRAVELERS_MESSAGE)
    }
}

impl std::error::Error for InvalidTravelerCount {}

impl FromStr for TravelerCount {
    type Err = InvalidTravelerCount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(TravelerCount::new)
            .ok_or(InvalidTravelerCount)
    }
}

impl TryFrom<&serde_json::Value> for TravelerCount {
    type Error = InvalidTravelerCount;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => {
                let count = if let Some(i) = n.as_u64() {
                    Some(i)
                } else {
                    // 2.0 is fine, 2.5 is not
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                        .map(|f| f as u64)
                };
                count
                    .and_then(|c| u32::try_from(c).ok())
                    .and_then(TravelerCount::new)
                    .ok_or(InvalidTravelerCount)
            }
            serde_json::Value::String(s) => s.parse(),
            _ => Err(InvalidTravelerCount),
        }
    }
}

// Form inputs send the count as text, so both numbers and numeric strings are accepted.
impl<'de> Deserialize<'de> for TravelerCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        TravelerCount::try_from(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for TravelerCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    #[serde(default)]
    pub travelers: Option<TravelerCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_type: Option<String>,
}

/// Where an estimate's base price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseResolution {
    Id,
    Name,
    /// Nothing matched; the default base price was used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub success: bool,
    pub estimated_cost: f64,
    pub base_price: f64,
    pub resolved_by: BaseResolution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub travel_date: Option<String>,
    #[serde(default)]
    pub travelers: Option<TravelerCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub success: bool,
    pub total_cost: f64,
    pub booking_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

/// Booking fields computed by the booking service, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: String,
    pub destination_id: String,
    pub travel_date: NaiveDate,
    pub travelers: u32,
    pub travel_mode: String,
    pub hotel_type: String,
    pub total_cost: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            user_id: self.user_id,
            destination_id: self.destination_id,
            travel_date: self.travel_date,
            travelers: self.travelers,
            travel_mode: self.travel_mode,
            hotel_type: self.hotel_type,
            total_cost: self.total_cost,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub destination_id: String,
    pub travel_date: NaiveDate,
    pub travelers: u32,
    pub travel_mode: String,
    pub hotel_type: String,
    /// Fixed at creation; never recomputed from the destination's later price.
    pub total_cost: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

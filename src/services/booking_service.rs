use chrono::{NaiveDate, Utc};

use crate::db::{BookingStore, DestinationStore, TravelStore};
use crate::error::{ApiError, ApiResult};
use crate::models::bookings::{
    BaseResolution, Booking, BookingRequest, BookingStatus, EstimateRequest, EstimateResponse,
    NewBooking, TravelerCount,
};
use crate::models::serde_helpers::non_blank;
use crate::services::pricing_service::{PricingService, DEFAULT_HOTEL_TYPE, DEFAULT_TRAVEL_MODE};

/// Base price used by estimates when no destination matches.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

const TRAVEL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    pub base_price: f64,
    pub resolved_by: BaseResolution,
}

/// Travel mode and lodging labels as stored and priced, with defaults filled in.
fn trip_labels<'a>(mode: Option<&'a str>, tier: Option<&'a str>) -> (&'a str, &'a str) {
    (
        non_blank(mode).unwrap_or(DEFAULT_TRAVEL_MODE),
        non_blank(tier).unwrap_or(DEFAULT_HOTEL_TYPE),
    )
}

fn required_travelers(travelers: Option<TravelerCount>) -> ApiResult<u32> {
    travelers
        .map(TravelerCount::get)
        .ok_or_else(|| ApiError::invalid_input("Missing required field: travelers"))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> ApiResult<&'a str> {
    non_blank(value)
        .ok_or_else(|| ApiError::invalid_input(format!("Missing required field: {}", field)))
}

pub struct BookingService;

impl BookingService {
    /// Id match first, then the first case-insensitive name match, then the default price.
    pub async fn resolve_estimate_price(
        store: &dyn TravelStore,
        destination_id: Option<&str>,
        destination_name: Option<&str>,
    ) -> ApiResult<ResolvedPrice> {
        let destination_id = non_blank(destination_id);
        let destination_name = non_blank(destination_name);

        if destination_id.is_none() && destination_name.is_none() {
            return Err(ApiError::invalid_input(
                "Missing required field: destinationId or destinationName",
            ));
        }

        if let Some(id) = destination_id {
            if let Some(destination) = store.find_destination(id).await? {
                return Ok(ResolvedPrice {
                    base_price: destination.base_price,
                    resolved_by: BaseResolution::Id,
                });
            }
        }

        if let Some(name) = destination_name {
            if let Some(destination) = store.find_destination_by_name(name).await? {
                return Ok(ResolvedPrice {
                    base_price: destination.base_price,
                    resolved_by: BaseResolution::Name,
                });
            }
        }

        log::info!(
            "No destination matched id={:?} name={:?}, using default base price {}",
            destination_id,
            destination_name,
            DEFAULT_BASE_PRICE
        );
        Ok(ResolvedPrice {
            base_price: DEFAULT_BASE_PRICE,
            resolved_by: BaseResolution::Fallback,
        })
    }

    /// Preview cost. Reads only.
    pub async fn estimate(
        store: &dyn TravelStore,
        request: &EstimateRequest,
    ) -> ApiResult<EstimateResponse> {
        let travelers = required_travelers(request.travelers)?;
        let resolved = Self::resolve_estimate_price(
            store,
            request.destination_id.as_deref(),
            request.destination_name.as_deref(),
        )
        .await?;

        let (mode, tier) = trip_labels(request.travel_mode.as_deref(), request.hotel_type.as_deref());
        let estimated_cost =
            PricingService::calculate_total_cost(resolved.base_price, travelers, mode, tier);

        Ok(EstimateResponse {
            success: true,
            estimated_cost,
            base_price: resolved.base_price,
            resolved_by: resolved.resolved_by,
        })
    }

    /// Prices the trip against the destination's current base price and stores it.
    /// Nothing is written when the destination does not exist.
    pub async fn create_booking(
        store: &dyn TravelStore,
        request: &BookingRequest,
    ) -> ApiResult<Booking> {
        let user_id = required(request.user_id.as_deref(), "userId")?;
        let destination_id = required(request.destination_id.as_deref(), "destinationId")?;
        let travel_date = required(request.travel_date.as_deref(), "travelDate")?;
        let travel_date = NaiveDate::parse_from_str(travel_date, TRAVEL_DATE_FORMAT).map_err(|_| {
            ApiError::invalid_input(format!(
                "travelDate must be a date in YYYY-MM-DD format, got '{}'",
                travel_date
            ))
        })?;
        let travelers = required_travelers(request.travelers)?;

        let destination = store
            .find_destination(destination_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Destination not found"))?;

        let (mode, tier) = trip_labels(request.travel_mode.as_deref(), request.hotel_type.as_deref());
        let total_cost =
            PricingService::calculate_total_cost(destination.base_price, travelers, mode, tier);

        let booking = store
            .insert_booking(NewBooking {
                user_id: user_id.to_string(),
                destination_id: destination.id.clone(),
                travel_date,
                travelers,
                travel_mode: mode.to_string(),
                hotel_type: tier.to_string(),
                total_cost,
                status: BookingStatus::Confirmed,
                created_at: Utc::now(),
            })
            .await?;

        log::info!(
            "Booking {} confirmed for user {} to {} ({} travelers, total {})",
            booking.id,
            booking.user_id,
            destination.name,
            travelers,
            total_cost
        );
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::models::destination::{Destination, DestinationDraft};

    async fn seed(store: &InMemoryStore, name: &str, base_price: f64) -> Destination {
        store
            .insert_destination(DestinationDraft {
                name: name.to_string(),
                description: None,
                image_url: None,
                best_time: None,
                traveler_type: None,
                rating: 4.5,
                base_price,
            })
            .await
            .unwrap()
    }

    fn estimate_request(id: Option<&str>, name: Option<&str>, travelers: u32) -> EstimateRequest {
        EstimateRequest {
            destination_id: id.map(str::to_string),
            destination_name: name.map(str::to_string),
            travelers: TravelerCount::new(travelers),
            travel_mode: Some("rail".to_string()),
            hotel_type: Some("standard".to_string()),
        }
    }

    fn booking_request(destination_id: &str) -> BookingRequest {
        BookingRequest {
            user_id: Some("42".to_string()),
            destination_id: Some(destination_id.to_string()),
            travel_date: Some("2026-11-20".to_string()),
            travelers: TravelerCount::new(2),
            travel_mode: Some("air".to_string()),
            hotel_type: Some("luxury".to_string()),
        }
    }

    #[actix_rt::test]
    async fn test_estimate_by_id_and_by_name_agree() {
        let store = InMemoryStore::new();
        let kyoto = seed(&store, "Kyoto", 100.0).await;

        let by_id = BookingService::estimate(&store, &estimate_request(Some(&kyoto.id), None, 3))
            .await
            .unwrap();
        let by_name = BookingService::estimate(&store, &estimate_request(None, Some("Kyoto"), 3))
            .await
            .unwrap();

        assert_eq!(by_id.estimated_cost, 675.0);
        assert_eq!(by_id.estimated_cost, by_name.estimated_cost);
        assert_eq!(by_id.resolved_by, BaseResolution::Id);
        assert_eq!(by_name.resolved_by, BaseResolution::Name);
    }

    #[actix_rt::test]
    async fn test_unmatched_name_falls_back_to_default_price() {
        let store = InMemoryStore::new();
        seed(&store, "Kyoto", 300.0).await;

        let estimate =
            BookingService::estimate(&store, &estimate_request(None, Some("Atlantis"), 2))
                .await
                .unwrap();

        assert_eq!(estimate.base_price, DEFAULT_BASE_PRICE);
        assert_eq!(estimate.resolved_by, BaseResolution::Fallback);
        assert_eq!(
            estimate.estimated_cost,
            PricingService::calculate_total_cost(DEFAULT_BASE_PRICE, 2, "rail", "standard")
        );
    }

    #[actix_rt::test]
    async fn test_unknown_id_tries_name_before_fallback() {
        let store = InMemoryStore::new();
        seed(&store, "Swiss Alps", 400.0).await;

        let estimate = BookingService::estimate(
            &store,
            &estimate_request(Some("65f000000000000000000000"), Some("alps"), 1),
        )
        .await
        .unwrap();
        assert_eq!(estimate.base_price, 400.0);
        assert_eq!(estimate.resolved_by, BaseResolution::Name);
    }

    #[actix_rt::test]
    async fn test_estimate_requires_a_destination_and_travelers() {
        let store = InMemoryStore::new();

        let err = BookingService::estimate(&store, &estimate_request(None, Some("  "), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let mut request = estimate_request(None, Some("Kyoto"), 1);
        request.travelers = None;
        let err = BookingService::estimate(&store, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[actix_rt::test]
    async fn test_missing_hotel_type_defaults_to_standard() {
        let store = InMemoryStore::new();
        let lima = seed(&store, "Lima", 100.0).await;

        let mut request = estimate_request(Some(&lima.id), None, 1);
        request.travel_mode = None;
        request.hotel_type = None;
        let estimate = BookingService::estimate(&store, &request).await.unwrap();
        assert_eq!(estimate.estimated_cost, 150.0);
    }

    #[actix_rt::test]
    async fn test_booking_stores_priced_total() {
        let store = InMemoryStore::new();
        let bali = seed(&store, "Bali", 240.0).await;

        let booking = BookingService::create_booking(&store, &booking_request(&bali.id))
            .await
            .unwrap();

        assert_eq!(booking.total_cost, 240.0 * 2.0 * 5.0 * 2.5);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.destination_id, bali.id);
        assert_eq!(store.booking_count().await, 1);
    }

    #[actix_rt::test]
    async fn test_booking_unknown_destination_persists_nothing() {
        let store = InMemoryStore::new();

        for id in ["65f000000000000000000000", "not-an-id"] {
            let err = BookingService::create_booking(&store, &booking_request(id))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)));
        }
        assert_eq!(store.booking_count().await, 0);
    }

    #[actix_rt::test]
    async fn test_booking_rejects_bad_date() {
        let store = InMemoryStore::new();
        let bali = seed(&store, "Bali", 240.0).await;

        let mut request = booking_request(&bali.id);
        request.travel_date = Some("next friday".to_string());
        let err = BookingService::create_booking(&store, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(store.booking_count().await, 0);
    }

    #[actix_rt::test]
    async fn test_price_change_does_not_touch_existing_booking() {
        let store = InMemoryStore::new();
        let bali = seed(&store, "Bali", 240.0).await;

        let booking = BookingService::create_booking(&store, &booking_request(&bali.id))
            .await
            .unwrap();

        store
            .update_destination(
                &bali.id,
                DestinationDraft {
                    name: "Bali".to_string(),
                    description: None,
                    image_url: None,
                    best_time: None,
                    traveler_type: None,
                    rating: 4.5,
                    base_price: 999.0,
                },
            )
            .await
            .unwrap();

        let stored = store
            .find_booking(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_cost, booking.total_cost);
    }

    #[actix_rt::test]
    async fn test_concurrent_identical_bookings_are_independent() {
        let store = InMemoryStore::new();
        let bali = seed(&store, "Bali", 240.0).await;
        let request = booking_request(&bali.id);

        let (first, second) = futures::join!(
            BookingService::create_booking(&store, &request),
            BookingService::create_booking(&store, &request)
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_ne!(first.id, second.id);
        assert_eq!(first.total_cost, second.total_cost);
        assert_eq!(store.booking_count().await, 2);
    }
}

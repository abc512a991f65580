use actix_web::{web, HttpResponse};

use crate::db::{BookingStore, SharedStore};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    bookings::{BookingConfirmation, BookingRequest, EstimateRequest},
    DataResponse,
};
use crate::services::booking_service::BookingService;

/*
    POST /api/bookings/estimate
*/
pub async fn estimate(
    store: web::Data<SharedStore>,
    input: web::Json<EstimateRequest>,
) -> ApiResult<HttpResponse> {
    let estimate = BookingService::estimate(store.get_ref().as_ref(), &input).await?;
    Ok(HttpResponse::Ok().json(estimate))
}

/*
    POST /api/bookings
*/
pub async fn create(
    store: web::Data<SharedStore>,
    input: web::Json<BookingRequest>,
) -> ApiResult<HttpResponse> {
    let booking = BookingService::create_booking(store.get_ref().as_ref(), &input).await?;
    Ok(HttpResponse::Ok().json(BookingConfirmation {
        success: true,
        total_cost: booking.total_cost,
        booking_id: booking.id,
    }))
}

/*
    GET /api/bookings/{id}
*/
pub async fn get_by_id(
    store: web::Data<SharedStore>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let booking = store
        .find_booking(&path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;
    Ok(HttpResponse::Ok().json(DataResponse::new(booking)))
}

/*
    GET /api/users/{id}/bookings
*/
pub async fn get_for_user(
    store: web::Data<SharedStore>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let bookings = store.list_bookings_for_user(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(bookings)))
}

use actix_web::{web, HttpResponse};

use crate::db::{DestinationStore, SharedStore};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    destination::{DestinationDraft, DestinationInput},
    serde_helpers::non_blank,
    DataResponse,
};

/*
    GET /api/destinations
*/
pub async fn get_all(store: web::Data<SharedStore>) -> ApiResult<HttpResponse> {
    let destinations = store.list_destinations().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(destinations)))
}

/*
    GET /api/destinations/{id}
*/
pub async fn get_by_id(
    store: web::Data<SharedStore>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let destination = store
        .find_destination(&path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Destination not found"))?;
    Ok(HttpResponse::Ok().json(DataResponse::new(destination)))
}

/*
    POST /api/destinations
    Updates when the payload carries an id, creates otherwise.
*/
pub async fn save(
    store: web::Data<SharedStore>,
    input: web::Json<DestinationInput>,
) -> ApiResult<HttpResponse> {
    let input = input.into_inner();
    let id = input.id.clone();
    let draft = validate(input)?;

    let destination = match id {
        Some(id) => store
            .update_destination(&id, draft)
            .await?
            .ok_or_else(|| ApiError::not_found("Destination not found"))?,
        None => store.insert_destination(draft).await?,
    };

    log::info!("Saved destination {} ({})", destination.id, destination.name);
    Ok(HttpResponse::Ok().json(DataResponse::new(destination)))
}

fn validate(input: DestinationInput) -> ApiResult<DestinationDraft> {
    let name = non_blank(input.name.as_deref())
        .ok_or_else(|| ApiError::invalid_input("Missing required field: name"))?
        .to_string();

    let base_price = match input.base_price {
        Some(price) if price.is_finite() && price > 0.0 => price,
        _ => return Err(ApiError::invalid_input("basePrice must be a positive number")),
    };

    Ok(DestinationDraft {
        name,
        description: input.description,
        image_url: input.image_url,
        best_time: input.best_time,
        traveler_type: input.traveler_type,
        rating: input.rating.filter(|r| r.is_finite()).unwrap_or(0.0),
        base_price,
    })
}

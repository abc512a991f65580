use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::{RecommendationStore, SharedStore};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    recommendation::{NewRecommendation, RecommendationInput},
    serde_helpers::non_blank,
    DataResponse,
};

#[derive(serde::Deserialize)]
pub struct QueryParams {
    user_id: Option<String>,
}

/*
    GET /api/recommendations?user_id=X
*/
pub async fn get_all(
    store: web::Data<SharedStore>,
    params: web::Query<QueryParams>,
) -> ApiResult<HttpResponse> {
    let user_id = non_blank(params.user_id.as_deref());
    let recommendations = store.list_recommendations(user_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(recommendations)))
}

/*
    POST /api/recommendations
*/
pub async fn post(
    store: web::Data<SharedStore>,
    input: web::Json<RecommendationInput>,
) -> ApiResult<HttpResponse> {
    let input = input.into_inner();
    let user_id = non_blank(input.user_id.as_deref())
        .ok_or_else(|| ApiError::invalid_input("Missing required field: userId"))?;
    let destination = non_blank(input.destination.as_deref())
        .ok_or_else(|| ApiError::invalid_input("Missing required field: destination"))?;

    let recommendation = store
        .insert_recommendation(NewRecommendation {
            user_id: user_id.to_string(),
            destination: destination.to_string(),
            reason: input.reason.clone().unwrap_or_default(),
            rating: input.rating.unwrap_or(0.0),
            created_at: Utc::now(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(recommendation)))
}

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::{MessageStore, SharedStore};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    message::{Author, MessageInput, NewMessage},
    serde_helpers::non_blank,
    DataResponse,
};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<usize>,
}

/*
    GET /api/messages?limit=N
    The newest N messages, oldest first.
*/
pub async fn get_recent(
    store: web::Data<SharedStore>,
    params: web::Query<QueryParams>,
) -> ApiResult<HttpResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let mut messages = store.latest_messages(limit).await?;
    messages.reverse();
    Ok(HttpResponse::Ok().json(DataResponse::new(messages)))
}

/*
    POST /api/messages
*/
pub async fn post(
    store: web::Data<SharedStore>,
    input: web::Json<MessageInput>,
) -> ApiResult<HttpResponse> {
    let input = input.into_inner();

    let message_text = non_blank(input.message_text.as_deref())
        .ok_or_else(|| ApiError::invalid_input("Missing required field: messageText"))?
        .to_string();
    let author = Author::resolve(input.user_id.as_deref(), input.message_type.as_deref())
        .ok_or_else(|| ApiError::invalid_input("Missing required field: userId"))?;
    let user_name = non_blank(input.user_name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| match &author {
            Author::Bot => "TravelTime AI".to_string(),
            Author::Human(_) => "User".to_string(),
        });

    let message = store
        .insert_message(NewMessage {
            author,
            user_name,
            message_text,
            created_at: Utc::now(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(message)))
}

/*
    DELETE /api/messages/{id}
*/
pub async fn delete(
    store: web::Data<SharedStore>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !store.delete_message(&id).await? {
        return Err(ApiError::not_found("Message not found"));
    }
    log::info!("Deleted message {}", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

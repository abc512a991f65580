use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::{SharedStore, UserStore};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    user::{LoginInput, RegisterInput, UserProfile},
    DataResponse,
};
use crate::services::account_service::AccountService;

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserProfile,
}

pub async fn register(
    store: web::Data<SharedStore>,
    input: web::Json<RegisterInput>,
) -> ApiResult<HttpResponse> {
    let user = AccountService::register(store.get_ref().as_ref(), &input).await?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}

pub async fn login(
    store: web::Data<SharedStore>,
    input: web::Json<LoginInput>,
) -> ApiResult<HttpResponse> {
    let user = AccountService::login(store.get_ref().as_ref(), &input).await?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}

/*
    GET /api/users
*/
pub async fn list_users(store: web::Data<SharedStore>) -> ApiResult<HttpResponse> {
    let users = store.list_users().await?;
    let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
    Ok(HttpResponse::Ok().json(DataResponse::new(profiles)))
}

/*
    GET /api/users/{id}
*/
pub async fn get_user(
    store: web::Data<SharedStore>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = store
        .find_user(&path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(HttpResponse::Ok().json(DataResponse::new(UserProfile::from(&user))))
}

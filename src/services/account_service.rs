use chrono::Utc;

use crate::db::{TravelStore, UserStore};
use crate::error::{ApiError, ApiResult};
use crate::models::serde_helpers::non_blank;
use crate::models::user::{LoginInput, NewUser, RegisterInput, User, UserRole};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const EMAIL_TAKEN: &str = "Email already exists";

/// Emails are stored and looked up lowercased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AccountService;

impl AccountService {
    pub async fn register(store: &dyn TravelStore, input: &RegisterInput) -> ApiResult<User> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(input.name.as_deref()),
            non_blank(input.email.as_deref()),
            input.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(ApiError::invalid_input("Missing required fields"));
        };

        let email = normalize_email(email);
        if store.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        // A concurrent registration can still win between the lookup and the insert.
        let user = store
            .insert_user_if_absent(NewUser {
                name: name.to_string(),
                email,
                password_hash,
                role: UserRole::User,
                created_at: Utc::now(),
            })
            .await?
            .ok_or_else(|| ApiError::conflict(EMAIL_TAKEN))?;

        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Unknown email and wrong password fail with the same message.
    pub async fn login(store: &dyn TravelStore, input: &LoginInput) -> ApiResult<User> {
        let (Some(email), Some(password)) = (
            non_blank(input.email.as_deref()),
            input.password.as_deref(),
        ) else {
            return Err(ApiError::invalid_input("Missing email or password"));
        };

        let Some(user) = store.find_user_by_email(&normalize_email(email)).await? else {
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        if bcrypt::verify(password, &user.password_hash).unwrap_or(false) {
            Ok(user)
        } else {
            log::warn!("Failed sign-in for user {}", user.id);
            Err(ApiError::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

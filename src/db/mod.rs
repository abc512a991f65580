use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    bookings::{Booking, NewBooking},
    destination::{Destination, DestinationDraft},
    message::{Message, NewMessage},
    recommendation::{NewRecommendation, Recommendation},
    user::{NewUser, User},
};

pub mod memory;
pub mod mongo;

#[async_trait]
pub trait DestinationStore {
    /// All destinations, in insertion order.
    async fn list_destinations(&self) -> ApiResult<Vec<Destination>>;
    async fn find_destination(&self, id: &str) -> ApiResult<Option<Destination>>;
    /// First destination (insertion order) whose name contains `fragment`, ignoring case.
    async fn find_destination_by_name(&self, fragment: &str) -> ApiResult<Option<Destination>>;
    async fn insert_destination(&self, draft: DestinationDraft) -> ApiResult<Destination>;
    /// Returns `None` when no destination has this id.
    async fn update_destination(
        &self,
        id: &str,
        draft: DestinationDraft,
    ) -> ApiResult<Option<Destination>>;
}

/// Bookings are append-only.
#[async_trait]
pub trait BookingStore {
    async fn insert_booking(&self, booking: NewBooking) -> ApiResult<Booking>;
    async fn find_booking(&self, id: &str) -> ApiResult<Option<Booking>>;
    async fn list_bookings_for_user(&self, user_id: &str) -> ApiResult<Vec<Booking>>;
}

#[async_trait]
pub trait UserStore {
    /// Checks the email and inserts in one step. `None` when the email is taken.
    async fn insert_user_if_absent(&self, user: NewUser) -> ApiResult<Option<User>>;
    async fn find_user(&self, id: &str) -> ApiResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;
    /// Newest first.
    async fn list_users(&self) -> ApiResult<Vec<User>>;
}

#[async_trait]
pub trait MessageStore {
    async fn insert_message(&self, message: NewMessage) -> ApiResult<Message>;
    /// The newest `limit` messages, newest first.
    async fn latest_messages(&self, limit: usize) -> ApiResult<Vec<Message>>;
    /// Returns whether a message was removed.
    async fn delete_message(&self, id: &str) -> ApiResult<bool>;
}

#[async_trait]
pub trait RecommendationStore {
    async fn insert_recommendation(
        &self,
        recommendation: NewRecommendation,
    ) -> ApiResult<Recommendation>;
    /// Newest first, optionally restricted to one user.
    async fn list_recommendations(&self, user_id: Option<&str>) -> ApiResult<Vec<Recommendation>>;
}

/// Everything the HTTP layer needs from persistence.
#[async_trait]
pub trait TravelStore:
    DestinationStore + BookingStore + UserStore + MessageStore + RecommendationStore + Send + Sync
{
    fn backend_tag(&self) -> &'static str;
    async fn ping(&self) -> ApiResult<()>;
}

pub type SharedStore = Arc<dyn TravelStore>;

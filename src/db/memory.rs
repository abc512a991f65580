use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::{
    BookingStore, DestinationStore, MessageStore, RecommendationStore, TravelStore, UserStore,
};
use crate::error::ApiResult;
use crate::models::{
    bookings::{Booking, NewBooking},
    destination::{Destination, DestinationDraft},
    message::{Message, NewMessage},
    recommendation::{NewRecommendation, Recommendation},
    user::{NewUser, User},
};

/// Process-local store used by tests and by local runs without `MONGODB_URI`.
/// Collections keep insertion order; ids use the same hex format as MongoDB.
#[derive(Default)]
pub struct InMemoryStore {
    destinations: RwLock<Vec<Destination>>,
    bookings: RwLock<Vec<Booking>>,
    users: RwLock<Vec<User>>,
    messages: RwLock<Vec<Message>>,
    recommendations: RwLock<Vec<Recommendation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }
}

fn next_id() -> String {
    ObjectId::new().to_hex()
}

#[async_trait]
impl DestinationStore for InMemoryStore {
    async fn list_destinations(&self) -> ApiResult<Vec<Destination>> {
        Ok(self.destinations.read().await.clone())
    }

    async fn find_destination(&self, id: &str) -> ApiResult<Option<Destination>> {
        Ok(self
            .destinations
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn find_destination_by_name(&self, fragment: &str) -> ApiResult<Option<Destination>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .destinations
            .read()
            .await
            .iter()
            .find(|d| d.name.to_lowercase().contains(&needle))
            .cloned())
    }

    async fn insert_destination(&self, draft: DestinationDraft) -> ApiResult<Destination> {
        let destination = draft.into_destination(next_id());
        self.destinations.write().await.push(destination.clone());
        Ok(destination)
    }

    async fn update_destination(
        &self,
        id: &str,
        draft: DestinationDraft,
    ) -> ApiResult<Option<Destination>> {
        let mut destinations = self.destinations.write().await;
        match destinations.iter_mut().find(|d| d.id == id) {
            Some(slot) => {
                *slot = draft.into_destination(id.to_string());
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> ApiResult<Booking> {
        let booking = booking.into_booking(next_id());
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: &str) -> ApiResult<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn list_bookings_for_user(&self, user_id: &str) -> ApiResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user_if_absent(&self, user: NewUser) -> ApiResult<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let user = user.into_user(next_id());
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_user(&self, id: &str) -> ApiResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.users.read().await.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn insert_message(&self, message: NewMessage) -> ApiResult<Message> {
        let message = message.into_message(next_id());
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn latest_messages(&self, limit: usize) -> ApiResult<Vec<Message>> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_message(&self, id: &str) -> ApiResult<bool> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() != before)
    }
}

#[async_trait]
impl RecommendationStore for InMemoryStore {
    async fn insert_recommendation(
        &self,
        recommendation: NewRecommendation,
    ) -> ApiResult<Recommendation> {
        let recommendation = recommendation.into_recommendation(next_id());
        self.recommendations
            .write()
            .await
            .push(recommendation.clone());
        Ok(recommendation)
    }

    async fn list_recommendations(&self, user_id: Option<&str>) -> ApiResult<Vec<Recommendation>> {
        Ok(self
            .recommendations
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| user_id.map_or(true, |id| r.user_id == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TravelStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> ApiResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, base_price: f64) -> DestinationDraft {
        DestinationDraft {
            name: name.to_string(),
            description: None,
            image_url: None,
            best_time: None,
            traveler_type: None,
            rating: 0.0,
            base_price,
        }
    }

    #[actix_rt::test]
    async fn test_name_lookup_is_case_insensitive_substring_first_match() {
        let store = InMemoryStore::new();
        let bali = store.insert_destination(draft("Bali Beaches", 800.0)).await.unwrap();
        store.insert_destination(draft("Bali Highlands", 600.0)).await.unwrap();

        let found = store.find_destination_by_name("bali").await.unwrap().unwrap();
        assert_eq!(found.id, bali.id);

        let found = store.find_destination_by_name("HIGHLAND").await.unwrap().unwrap();
        assert_eq!(found.name, "Bali Highlands");

        assert!(store.find_destination_by_name("Oslo").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_update_missing_destination_returns_none() {
        let store = InMemoryStore::new();
        let updated = store
            .update_destination("65f000000000000000000000", draft("Nowhere", 1.0))
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[actix_rt::test]
    async fn test_latest_messages_newest_first() {
        let store = InMemoryStore::new();
        for text in ["one", "two", "three"] {
            store
                .insert_message(NewMessage {
                    author: crate::models::message::Author::Bot,
                    user_name: "TravelTime AI".to_string(),
                    message_text: text.to_string(),
                    created_at: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }

        let latest = store.latest_messages(2).await.unwrap();
        let texts: Vec<_> = latest.iter().map(|m| m.message_text.as_str()).collect();
        assert_eq!(texts, vec!["three", "two"]);

        assert!(store.delete_message(&latest[0].id).await.unwrap());
        assert!(!store.delete_message(&latest[0].id).await.unwrap());
    }
}

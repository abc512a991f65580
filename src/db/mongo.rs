use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::db::{
    BookingStore, DestinationStore, MessageStore, RecommendationStore, TravelStore, UserStore,
};
use crate::error::ApiResult;
use crate::models::{
    bookings::{Booking, BookingStatus, NewBooking},
    destination::{Destination, DestinationDraft},
    message::{Author, Message, NewMessage},
    recommendation::{NewRecommendation, Recommendation},
    user::{NewUser, User, UserRole},
};

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // A failed ping is not fatal; the pool reconnects on demand.
    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
            log::warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(Arc::new(client))
}

/// Malformed ids cannot match any document, so they read as "absent".
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}

fn hex(id: Option<ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize)]
struct DestinationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    best_time: Option<String>,
    traveler_type: Option<String>,
    rating: f64,
    base_price: f64,
}

impl DestinationDocument {
    fn from_draft(id: ObjectId, draft: DestinationDraft) -> Self {
        DestinationDocument {
            id: Some(id),
            name: draft.name,
            description: draft.description,
            image_url: draft.image_url,
            best_time: draft.best_time,
            traveler_type: draft.traveler_type,
            rating: draft.rating,
            base_price: draft.base_price,
        }
    }

    fn into_model(self) -> Destination {
        Destination {
            id: hex(self.id),
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            best_time: self.best_time,
            traveler_type: self.traveler_type,
            rating: self.rating,
            base_price: self.base_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BookingDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    destination_id: String,
    travel_date: NaiveDate,
    travelers: u32,
    travel_mode: String,
    hotel_type: String,
    total_cost: f64,
    status: BookingStatus,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl BookingDocument {
    fn into_model(self) -> Booking {
        Booking {
            id: hex(self.id),
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

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    email: String,
    password: String, // Always hashed
    #[serde(default)]
    role: UserRole,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl UserDocument {
    fn into_model(self) -> User {
        User {
            id: hex(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MessageDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    // None for bot messages
    user_id: Option<String>,
    user_name: String,
    message_text: String,
    message_type: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl MessageDocument {
    fn into_model(self) -> Message {
        let author = match (self.message_type.as_str(), self.user_id) {
            ("user", Some(user_id)) => Author::Human(user_id),
            _ => Author::Bot,
        };
        Message {
            id: hex(self.id),
            author,
            user_name: self.user_name,
            message_text: self.message_text,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RecommendationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    destination_name: String,
    reason: String,
    rating: f64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl RecommendationDocument {
    fn into_model(self) -> Recommendation {
        Recommendation {
            id: hex(self.id),
            user_id: self.user_id,
            destination: self.destination_name,
            reason: self.reason,
            rating: self.rating,
            created_at: self.created_at,
        }
    }
}

pub struct MongoStore {
    client: Arc<Client>,
    database: String,
}

impl MongoStore {
    pub fn new(client: Arc<Client>, database: impl Into<String>) -> Self {
        MongoStore {
            client,
            database: database.into(),
        }
    }

    /// Creates the unique index on `Users.email`. Safe to call on every start.
    pub async fn ensure_indexes(&self) -> ApiResult<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_email).await?;
        log::info!("Ensured unique email index on Users");
        Ok(())
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.database).collection(name)
    }

    fn destinations(&self) -> Collection<DestinationDocument> {
        self.collection("Destinations")
    }

    fn bookings(&self) -> Collection<BookingDocument> {
        self.collection("Bookings")
    }

    fn users(&self) -> Collection<UserDocument> {
        self.collection("Users")
    }

    fn messages(&self) -> Collection<MessageDocument> {
        self.collection("Messages")
    }

    fn recommendations(&self) -> Collection<RecommendationDocument> {
        self.collection("Recommendations")
    }
}

#[async_trait]
impl DestinationStore for MongoStore {
    async fn list_destinations(&self) -> ApiResult<Vec<Destination>> {
        let cursor = self.destinations().find(doc! {}).sort(doc! { "_id": 1 }).await?;
        let documents: Vec<DestinationDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(DestinationDocument::into_model).collect())
    }

    async fn find_destination(&self, id: &str) -> ApiResult<Option<Destination>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let found = self.destinations().find_one(doc! { "_id": oid }).await?;
        Ok(found.map(DestinationDocument::into_model))
    }

    async fn find_destination_by_name(&self, fragment: &str) -> ApiResult<Option<Destination>> {
        let filter = doc! {
            "name": {
                "$regex": regex::escape(fragment),
                "$options": "i"
            }
        };
        let found = self
            .destinations()
            .find_one(filter)
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(found.map(DestinationDocument::into_model))
    }

    async fn insert_destination(&self, draft: DestinationDraft) -> ApiResult<Destination> {
        let document = DestinationDocument::from_draft(ObjectId::new(), draft);
        self.destinations().insert_one(&document).await?;
        Ok(document.into_model())
    }

    async fn update_destination(
        &self,
        id: &str,
        draft: DestinationDraft,
    ) -> ApiResult<Option<Destination>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let document = DestinationDocument::from_draft(oid, draft);
        let result = self
            .destinations()
            .replace_one(doc! { "_id": oid }, &document)
            .await?;
        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(document.into_model()))
    }
}

#[async_trait]
impl BookingStore for MongoStore {
    async fn insert_booking(&self, booking: NewBooking) -> ApiResult<Booking> {
        let document = BookingDocument {
            id: Some(ObjectId::new()),
            user_id: booking.user_id,
            destination_id: booking.destination_id,
            travel_date: booking.travel_date,
            travelers: booking.travelers,
            travel_mode: booking.travel_mode,
            hotel_type: booking.hotel_type,
            total_cost: booking.total_cost,
            status: booking.status,
            created_at: booking.created_at,
        };
        self.bookings().insert_one(&document).await?;
        Ok(document.into_model())
    }

    async fn find_booking(&self, id: &str) -> ApiResult<Option<Booking>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let found = self.bookings().find_one(doc! { "_id": oid }).await?;
        Ok(found.map(BookingDocument::into_model))
    }

    async fn list_bookings_for_user(&self, user_id: &str) -> ApiResult<Vec<Booking>> {
        let cursor = self
            .bookings()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "_id": 1 })
            .await?;
        let documents: Vec<BookingDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(BookingDocument::into_model).collect())
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert_user_if_absent(&self, user: NewUser) -> ApiResult<Option<User>> {
        let document = UserDocument {
            id: Some(ObjectId::new()),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            role: user.role,
            created_at: user.created_at,
        };
        // The unique email index rejects the loser of a concurrent registration.
        match self.users().insert_one(&document).await {
            Ok(_) => Ok(Some(document.into_model())),
            Err(e) if is_duplicate_key(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: &str) -> ApiResult<Option<User>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let found = self.users().find_one(doc! { "_id": oid }).await?;
        Ok(found.map(UserDocument::into_model))
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let found = self.users().find_one(doc! { "email": email }).await?;
        Ok(found.map(UserDocument::into_model))
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        let cursor = self.users().find(doc! {}).sort(doc! { "_id": -1 }).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(UserDocument::into_model).collect())
    }
}

#[async_trait]
impl MessageStore for MongoStore {
    async fn insert_message(&self, message: NewMessage) -> ApiResult<Message> {
        let (user_id, message_type) = match message.author {
            Author::Human(id) => (Some(id), "user"),
            Author::Bot => (None, "bot"),
        };
        let document = MessageDocument {
            id: Some(ObjectId::new()),
            user_id,
            user_name: message.user_name,
            message_text: message.message_text,
            message_type: message_type.to_string(),
            created_at: message.created_at,
        };
        self.messages().insert_one(&document).await?;
        Ok(document.into_model())
    }

    async fn latest_messages(&self, limit: usize) -> ApiResult<Vec<Message>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .messages()
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .limit(limit)
            .await?;
        let documents: Vec<MessageDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(MessageDocument::into_model).collect())
    }

    async fn delete_message(&self, id: &str) -> ApiResult<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.messages().delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl RecommendationStore for MongoStore {
    async fn insert_recommendation(
        &self,
        recommendation: NewRecommendation,
    ) -> ApiResult<Recommendation> {
        let document = RecommendationDocument {
            id: Some(ObjectId::new()),
            user_id: recommendation.user_id,
            destination_name: recommendation.destination,
            reason: recommendation.reason,
            rating: recommendation.rating,
            created_at: recommendation.created_at,
        };
        self.recommendations().insert_one(&document).await?;
        Ok(document.into_model())
    }

    async fn list_recommendations(&self, user_id: Option<&str>) -> ApiResult<Vec<Recommendation>> {
        let filter = match user_id {
            Some(user_id) => doc! { "user_id": user_id },
            None => doc! {},
        };
        let cursor = self
            .recommendations()
            .find(filter)
            .sort(doc! { "_id": -1 })
            .await?;
        let documents: Vec<RecommendationDocument> = cursor.try_collect().await?;
        Ok(documents
            .into_iter()
            .map(RecommendationDocument::into_model)
            .collect())
    }
}

#[async_trait]
impl TravelStore for MongoStore {
    fn backend_tag(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> ApiResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

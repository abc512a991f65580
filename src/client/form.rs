use thiserror::Error;

use crate::client::api::{ClientError, TravelApi};
use crate::client::session::Session;
use crate::models::bookings::{
    BookingConfirmation, BookingRequest, EstimateRequest, EstimateResponse, InvalidTravelerCount,
    TravelerCount,
};
use crate::services::pricing_service::{DEFAULT_HOTEL_TYPE, DEFAULT_TRAVEL_MODE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please select a destination")]
    NoDestination,
    #[error("Please login to book a trip or get personalized recommendations.")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidTravelers(#[from] InvalidTravelerCount),
    #[error("A booking is already being submitted")]
    AlreadySubmitting,
}

/// Raw form values. Travelers stay as typed text until a request is built.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub destination_id: Option<String>,
    pub destination_name: Option<String>,
    pub travel_date: String,
    pub travelers: String,
    pub travel_mode: String,
    pub hotel_type: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            destination_id: None,
            destination_name: None,
            travel_date: String::new(),
            travelers: "1".to_string(),
            travel_mode: DEFAULT_TRAVEL_MODE.to_string(),
            hotel_type: DEFAULT_HOTEL_TYPE.to_string(),
        }
    }
}

impl BookingForm {
    pub fn has_destination(&self) -> bool {
        self.destination_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    pub fn traveler_count(&self) -> Result<TravelerCount, InvalidTravelerCount> {
        self.travelers.parse()
    }

    /// `None` until a destination is selected and the traveler count parses.
    pub fn estimate_request(&self) -> Option<EstimateRequest> {
        if !self.has_destination() {
            return None;
        }
        let travelers = self.traveler_count().ok()?;

        Some(EstimateRequest {
            destination_id: self.destination_id.clone(),
            destination_name: self.destination_name.clone(),
            travelers: Some(travelers),
            travel_mode: Some(self.travel_mode.clone()),
            hotel_type: Some(self.hotel_type.clone()),
        })
    }

    pub fn booking_request(&self, user_id: &str) -> Result<BookingRequest, SubmitError> {
        if !self.has_destination() {
            return Err(SubmitError::NoDestination);
        }
        let travelers = self.traveler_count()?;

        Ok(BookingRequest {
            user_id: Some(user_id.to_string()),
            destination_id: self.destination_id.clone(),
            travel_date: Some(self.travel_date.clone()),
            travelers: Some(travelers),
            travel_mode: Some(self.travel_mode.clone()),
            hotel_type: Some(self.hotel_type.clone()),
        })
    }

    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Do you want to book a trip to {} for {} people by {} staying in a {} hotel on {}?",
            self.destination_name.as_deref().unwrap_or("your destination"),
            self.travelers.trim(),
            self.travel_mode,
            self.hotel_type,
            self.travel_date
        )
    }
}

/// A started estimate. Its result is applied only if no newer one was started.
#[derive(Debug, Clone)]
pub struct EstimateTicket {
    token: u64,
    request: EstimateRequest,
}

impl EstimateTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn request(&self) -> &EstimateRequest {
        &self.request
    }
}

pub fn format_cost(cost: f64) -> String {
    format!("${:.2}", cost)
}

pub struct BookingFormController<A> {
    api: A,
    form: BookingForm,
    latest_token: u64,
    estimate_display: Option<String>,
    result_message: Option<String>,
    submitting: bool,
}

impl<A: TravelApi> BookingFormController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            form: BookingForm::default(),
            latest_token: 0,
            estimate_display: None,
            result_message: None,
            submitting: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Latest estimate formatted as `$X.XX`.
    pub fn estimate_display(&self) -> Option<&str> {
        self.estimate_display.as_deref()
    }

    pub fn result_message(&self) -> Option<&str> {
        self.result_message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn select_destination(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.form.destination_id = Some(id.into());
        self.form.destination_name = Some(name.into());
        self.refresh_estimate().await;
    }

    pub async fn set_travelers(&mut self, travelers: impl Into<String>) {
        self.form.travelers = travelers.into();
        self.refresh_estimate().await;
    }

    pub async fn set_travel_mode(&mut self, mode: impl Into<String>) {
        self.form.travel_mode = mode.into();
        self.refresh_estimate().await;
    }

    pub async fn set_hotel_type(&mut self, hotel_type: impl Into<String>) {
        self.form.hotel_type = hotel_type.into();
        self.refresh_estimate().await;
    }

    // The date does not affect the price.
    pub fn set_travel_date(&mut self, date: impl Into<String>) {
        self.form.travel_date = date.into();
    }

    /// Starts a new estimate and invalidates every earlier one, even when
    /// the form is not ready to be estimated.
    pub fn begin_estimate(&mut self) -> Option<EstimateTicket> {
        self.latest_token += 1;

        match self.form.estimate_request() {
            Some(request) => Some(EstimateTicket {
                token: self.latest_token,
                request,
            }),
            None => {
                self.estimate_display = None;
                None
            }
        }
    }

    /// Returns whether the result was applied. Stale results are dropped.
    pub fn apply_estimate(
        &mut self,
        token: u64,
        result: Result<EstimateResponse, ClientError>,
    ) -> bool {
        if token != self.latest_token {
            log::debug!(
                "Dropping stale estimate {} (latest is {})",
                token,
                self.latest_token
            );
            return false;
        }

        self.estimate_display = match result {
            Ok(response) => Some(format_cost(response.estimated_cost)),
            Err(e) => {
                log::warn!("Estimate failed: {}", e);
                None
            }
        };
        true
    }

    pub async fn refresh_estimate(&mut self) -> bool {
        let Some(ticket) = self.begin_estimate() else {
            return false;
        };
        let result = self.api.estimate(ticket.request()).await;
        self.apply_estimate(ticket.token(), result)
    }

    /// Checks the guards and marks a submission as pending.
    pub fn begin_submit(&mut self, session: &Session) -> Result<BookingRequest, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        if !self.form.has_destination() {
            return Err(SubmitError::NoDestination);
        }
        let user = session.user().ok_or(SubmitError::NotLoggedIn)?;
        let request = self.form.booking_request(&user.id)?;

        self.submitting = true;
        Ok(request)
    }

    pub fn finish_submit(&mut self, result: Result<BookingConfirmation, ClientError>) -> &str {
        self.submitting = false;

        let message = match result {
            Ok(confirmation) => format!(
                "Booking confirmed! Total cost: {}",
                format_cost(confirmation.total_cost)
            ),
            Err(e) => format!("Booking failed: {}", e),
        };
        self.result_message.insert(message).as_str()
    }

    /// Runs one booking call and returns the message shown to the user.
    pub async fn submit(&mut self, session: &Session) -> Result<String, SubmitError> {
        let request = match self.begin_submit(session) {
            Ok(request) => request,
            Err(SubmitError::AlreadySubmitting) => return Err(SubmitError::AlreadySubmitting),
            Err(e) => {
                self.result_message = Some(e.to_string());
                return Err(e);
            }
        };

        let result = self.api.book(&request).await;
        Ok(self.finish_submit(result).to_string())
    }
}

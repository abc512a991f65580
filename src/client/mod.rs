//! Typed client for the booking endpoints and the booking form controller
//! that drives them.

pub mod api;
pub mod form;
pub mod session;

pub use api::{ApiClient, ClientError, TravelApi};
pub use form::{BookingForm, BookingFormController, EstimateTicket, SubmitError};
pub use session::Session;

use serde::{Deserialize, Serialize};

pub mod bookings;
pub mod destination;
pub mod message;
pub mod recommendation;
pub mod serde_helpers;
pub mod user;

/// `{success: true, data}` envelope used by the data endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        DataResponse {
            success: true,
            data,
        }
    }
}

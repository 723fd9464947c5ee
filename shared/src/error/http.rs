//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::ResetAlreadyRun => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 500 Internal Server Error
            Self::ResetFailed | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::InvalidPosition
            | Self::InvalidPaymentStatus
            | Self::InvalidPaymentSelection => StatusCode::BAD_REQUEST,
        }
    }
}

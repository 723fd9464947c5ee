//! Unified error codes for the Young Money backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Ranking errors
//! - 5xxx: Payment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin panel and the
/// mobile client can switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 3xxx: Ranking ====================
    /// Ranking reset already executed for this business date
    ResetAlreadyRun = 3001,
    /// Ranking reset transaction failed and was rolled back
    ResetFailed = 3002,
    /// User not found
    UserNotFound = 3004,
    /// Invalid ranking position
    InvalidPosition = 3005,

    // ==================== 5xxx: Payment ====================
    /// Unknown payment status filter
    InvalidPaymentStatus = 5003,
    /// payment_ids is missing, empty or malformed
    InvalidPaymentSelection = 5004,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::TokenInvalid => "Invalid token",

            // Ranking
            ErrorCode::ResetAlreadyRun => "Ranking already reset today",
            ErrorCode::ResetFailed => "Ranking reset failed",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::InvalidPosition => "Invalid ranking position",

            // Payment
            ErrorCode::InvalidPaymentStatus => "Invalid payment status",
            ErrorCode::InvalidPaymentSelection => "payment_ids is required",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1004 => Ok(ErrorCode::TokenInvalid),

            // Ranking
            3001 => Ok(ErrorCode::ResetAlreadyRun),
            3002 => Ok(ErrorCode::ResetFailed),
            3004 => Ok(ErrorCode::UserNotFound),
            3005 => Ok(ErrorCode::InvalidPosition),

            // Payment
            5003 => Ok(ErrorCode::InvalidPaymentStatus),
            5004 => Ok(ErrorCode::InvalidPaymentSelection),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

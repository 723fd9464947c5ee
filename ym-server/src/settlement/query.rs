//! Request parsing for the settlement endpoints
//!
//! Everything arrives as loosely typed input (query strings, JSON that may
//! carry an id, a list of ids or the keyword `"all"`) and is validated here
//! into typed values before touching the database.

use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::PaymentStatus;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// Raw `GET /api/v1/payments/pending` query string
#[derive(Debug, Default, Deserialize)]
pub struct PendingQueryParams {
    pub token: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub status: Option<String>,
}

/// Validated listing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuery {
    pub status: PaymentStatus,
    pub limit: i64,
    pub offset: i64,
}

impl Default for PendingQuery {
    fn default() -> Self {
        Self {
            status: PaymentStatus::Pending,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl PendingQuery {
    pub fn from_params(params: &PendingQueryParams) -> Result<Self, AppError> {
        let limit = match non_empty(&params.limit) {
            None => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| {
                    AppError::validation("limit must be an integer").with_detail("field", "limit")
                })?
                .clamp(1, MAX_LIMIT),
        };

        let offset = match non_empty(&params.offset) {
            None => 0,
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                AppError::validation("offset must be an integer").with_detail("field", "offset")
            })?,
        };
        if offset < 0 {
            return Err(
                AppError::with_message(ErrorCode::ValueOutOfRange, "offset must not be negative")
                    .with_detail("field", "offset"),
            );
        }

        let status = match non_empty(&params.status) {
            None => PaymentStatus::Pending,
            Some(raw) => raw.parse::<PaymentStatus>().map_err(|_| {
                AppError::with_message(
                    ErrorCode::InvalidPaymentStatus,
                    format!("Invalid status: {raw}"),
                )
                .with_detail(
                    "allowed",
                    PaymentStatus::ALL
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>(),
                )
            })?,
        };

        Ok(Self {
            status,
            limit,
            offset,
        })
    }
}

/// `payment_ids` as sent by the admin panel: `"all"`, one id, or a list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PaymentIdsInput {
    One(i64),
    Many(Vec<i64>),
    Keyword(String),
}

/// Which pending payments a settlement call targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSelection {
    All,
    Ids(Vec<i64>),
}

impl PaymentSelection {
    pub fn parse(input: Option<PaymentIdsInput>) -> Result<Self, AppError> {
        let invalid = || AppError::new(ErrorCode::InvalidPaymentSelection);

        match input.ok_or_else(invalid)? {
            PaymentIdsInput::One(id) => Ok(Self::Ids(vec![id])),
            PaymentIdsInput::Many(mut ids) => {
                if ids.is_empty() {
                    return Err(invalid());
                }
                ids.sort_unstable();
                ids.dedup();
                Ok(Self::Ids(ids))
            }
            PaymentIdsInput::Keyword(word) => {
                let word = word.trim();
                if word == "all" {
                    Ok(Self::All)
                } else if let Ok(id) = word.parse::<i64>() {
                    Ok(Self::Ids(vec![id]))
                } else {
                    Err(AppError::with_message(
                        ErrorCode::InvalidPaymentSelection,
                        "payment_ids must be \"all\", an id or a list of ids",
                    ))
                }
            }
        }
    }

    /// `None` selects every pending payment
    pub fn ids(&self) -> Option<&[i64]> {
        match self {
            Self::All => None,
            Self::Ids(ids) => Some(ids),
        }
    }
}

//! Payment settlement
//!
//! Listing pending payouts for the operator and moving them to a terminal
//! state once the PIX transfer is done (or has failed). Every transition is
//! one conditional `UPDATE ... WHERE status = 'pending'`, so replays and
//! overlapping calls never touch a payment twice.

pub mod query;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{PaymentStatus, PendingPayment};
use shared::util::now_millis;
use sqlx::PgPool;

use crate::db::payments::{self, PaymentView, StatusTotals};
use crate::error::ServiceResult;

pub use query::{PaymentIdsInput, PaymentSelection, PendingQuery, PendingQueryParams};

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingPage {
    pub status: PaymentStatus,
    #[serde(rename = "data")]
    pub payments: Vec<PaymentView>,
    /// Rows matching the status filter
    pub total: i64,
    /// Sum over every matching row, not just this page
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
    pub pagination: Pagination,
    pub statistics: Vec<StatusTotals>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    pub updated_count: usize,
    pub payments: Vec<PendingPayment>,
    /// Requested ids that were not pending (already settled or unknown)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_updated: Vec<i64>,
}

impl SettlementReport {
    fn new(selection: &PaymentSelection, mut updated: Vec<PendingPayment>) -> Self {
        updated.sort_by_key(|p| p.id);
        let not_updated = selection
            .ids()
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| updated.binary_search_by_key(id, |p| p.id).is_err())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            updated_count: updated.len(),
            payments: updated,
            not_updated,
        }
    }
}

/// One page of payments plus totals, read from a single snapshot
pub async fn list_pending(pool: &PgPool, query: PendingQuery) -> ServiceResult<PendingPage> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let rows = payments::list_by_status(&mut *tx, query.status, query.limit, query.offset).await?;
    let (total, total_amount) = payments::totals_for_status(&mut *tx, query.status).await?;
    let statistics = payments::statistics(&mut *tx).await?;
    tx.commit().await?;

    let has_more = query.offset + (rows.len() as i64) < total;

    Ok(PendingPage {
        status: query.status,
        payments: rows,
        total,
        total_amount,
        pagination: Pagination {
            limit: query.limit,
            offset: query.offset,
            has_more,
        },
        statistics,
    })
}

/// `pending → completed`
pub async fn complete_payments(
    pool: &PgPool,
    selection: &PaymentSelection,
    transaction_id: Option<&str>,
) -> ServiceResult<SettlementReport> {
    let transaction_id = transaction_id.map(str::trim).filter(|t| !t.is_empty());
    let updated = payments::complete(pool, selection.ids(), transaction_id, now_millis()).await?;
    let report = SettlementReport::new(selection, updated);

    tracing::info!(
        updated_count = report.updated_count,
        all = matches!(selection, PaymentSelection::All),
        "Payments marked completed"
    );
    Ok(report)
}

/// `pending → failed`
pub async fn fail_payments(
    pool: &PgPool,
    selection: &PaymentSelection,
    error_message: &str,
) -> ServiceResult<SettlementReport> {
    let updated = payments::fail(pool, selection.ids(), error_message, now_millis()).await?;
    let report = SettlementReport::new(selection, updated);

    tracing::info!(
        updated_count = report.updated_count,
        all = matches!(selection, PaymentSelection::All),
        "Payments marked failed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: i64) -> PendingPayment {
        PendingPayment {
            id,
            user_id: 1,
            position: 1,
            amount: Decimal::new(1000, 2),
            pix_key: None,
            status: PaymentStatus::Completed,
            transaction_id: None,
            error_message: None,
            reset_date: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_report_lists_ids_that_were_not_pending() {
        let selection = PaymentSelection::Ids(vec![1, 2, 3]);
        let report = SettlementReport::new(&selection, vec![payment(3), payment(1)]);
        assert_eq!(report.updated_count, 2);
        assert_eq!(report.payments[0].id, 1);
        assert_eq!(report.not_updated, vec![2]);
    }

    #[test]
    fn test_report_for_all_has_no_leftovers() {
        let report = SettlementReport::new(&PaymentSelection::All, vec![]);
        assert_eq!(report.updated_count, 0);
        assert!(report.not_updated.is_empty());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("not_updated").is_none());
    }

    #[test]
    fn test_page_uses_listing_keys() {
        let page = PendingPage {
            status: PaymentStatus::Pending,
            payments: vec![],
            total: 0,
            total_amount: Decimal::new(1500, 2),
            pagination: Pagination {
                limit: 100,
                offset: 0,
                has_more: false,
            },
            statistics: vec![],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
        assert_eq!(json["totalAmount"], 15.0);
        assert_eq!(json["total"], 0);
        assert!(json.get("payments").is_none());
        assert!(json.get("total_amount").is_none());
    }
}

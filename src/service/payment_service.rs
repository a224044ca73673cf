// services/payment_service.rs
use std::sync::Arc;

use chrono::Utc;
use num_traits::ToPrimitive;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{classdb::ClassExt, db::DBClient, paymentdb::PaymentExt},
    dtos::paymentdtos::{CreateBrokeragePaymentDto, UpdateBrokeragePaymentDto, UpdatePaymentSettingsDto},
    models::{classmodel::ClassStatus, paymentmodel::*},
    service::error::ServiceError,
};

/// Deterministic brokerage fee for a contract amount under a fee policy.
///
/// The minimum floor is applied before the maximum ceiling. With a
/// pathological policy where min_fee exceeds max_fee, a raw fee below the
/// minimum is first lifted to min_fee and then capped back down to max_fee.
pub fn calculate_brokerage_fee(
    contract_amount: f64,
    fee_percentage: f64,
    min_fee: f64,
    max_fee: Option<f64>,
) -> f64 {
    let raw_fee = contract_amount * fee_percentage / 100.0;

    let mut fee = raw_fee.max(min_fee);
    if let Some(max_fee) = max_fee {
        fee = fee.min(max_fee);
    }

    fee
}

#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn create_payment(
        &self,
        body: CreateBrokeragePaymentDto,
    ) -> Result<BrokeragePayment, ServiceError> {
        let class = self
            .db_client
            .get_class_by_id(body.class_id)
            .await?
            .ok_or(ServiceError::ClassNotFound(body.class_id))?;

        match class.status {
            Some(ClassStatus::Matched) | Some(ClassStatus::Completed) => {}
            other => {
                return Err(ServiceError::InvalidStateTransition(format!(
                    "class {} is not matched, cannot bill a brokerage fee in status {:?}",
                    body.class_id, other
                )));
            }
        }

        let settings = self
            .db_client
            .get_active_settings()
            .await?
            .ok_or(ServiceError::NoActivePolicy)?;

        let fee_percentage = settings.fee_percentage.to_f64().unwrap_or(0.0);
        let min_fee = settings.min_fee.to_f64().unwrap_or(0.0);
        let max_fee = settings.max_fee.as_ref().and_then(|f| f.to_f64());

        let calculated_fee =
            calculate_brokerage_fee(body.contract_amount, fee_percentage, min_fee, max_fee);
        let actual_fee = body.actual_fee.unwrap_or(calculated_fee);

        let payment = self
            .db_client
            .create_brokerage_payment(
                body.class_id,
                body.tutor_id,
                body.contract_id,
                fee_percentage,
                body.contract_amount,
                calculated_fee,
                actual_fee,
                body.due_date,
                body.notes,
            )
            .await
            .map_err(|e| match e {
                sqlx::Error::Protocol(ref msg) if msg == "duplicate_brokerage_fee" => {
                    ServiceError::DuplicateBrokerageFee(body.class_id, body.tutor_id)
                }
                other => {
                    // The unique index closes the race the in-transaction check
                    // leaves open; surface that outcome as the same domain error.
                    if other
                        .as_database_error()
                        .map(|db| db.is_unique_violation())
                        .unwrap_or(false)
                    {
                        ServiceError::DuplicateBrokerageFee(body.class_id, body.tutor_id)
                    } else {
                        ServiceError::Database(other)
                    }
                }
            })?;

        tracing::info!(
            "brokerage payment {} created for class {} and tutor {} (calculated fee {})",
            payment.id,
            body.class_id,
            body.tutor_id,
            calculated_fee
        );

        Ok(payment)
    }

    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        body: UpdateBrokeragePaymentDto,
    ) -> Result<BrokeragePayment, ServiceError> {
        let payment = self
            .db_client
            .get_brokerage_payment_by_id(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        let status = body
            .status
            .or(payment.status)
            .unwrap_or(BrokerageStatus::Pending);

        // paid stamps the settlement date, reverting to pending clears it,
        // overdue/waived leave dates alone.
        let paid_date = match body.status {
            Some(BrokerageStatus::Paid) => Some(Utc::now()),
            Some(BrokerageStatus::Pending) => None,
            _ => payment.paid_date,
        };

        let actual_fee = match body.actual_fee {
            Some(fee) => BigDecimal::try_from(fee)
                .map_err(|_| ServiceError::Validation("Invalid actual fee".to_string()))?,
            None => payment.actual_fee.clone(),
        };

        let due_date = body.due_date.or(payment.due_date);
        let notes = body.notes.or(payment.notes);

        let updated = self
            .db_client
            .update_brokerage_payment(payment_id, actual_fee, due_date, notes, status, paid_date)
            .await?;

        tracing::info!("brokerage payment {} updated to {:?}", payment_id, status);

        Ok(updated)
    }

    pub async fn update_settings(
        &self,
        body: UpdatePaymentSettingsDto,
    ) -> Result<PaymentSettings, ServiceError> {
        let settings = self
            .db_client
            .swap_payment_settings(body.fee_percentage, body.min_fee, body.max_fee)
            .await?;

        tracing::info!(
            "payment settings updated: {}% (min {}, max {:?})",
            body.fee_percentage,
            body.min_fee,
            body.max_fee
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[test]
    fn test_fee_floor_applies_first() {
        // 10% of 1,000,000 = 100,000 which already sits on the floor
        let fee = calculate_brokerage_fee(1_000_000.0, 10.0, 100_000.0, Some(500_000.0));
        assert_eq!(fee, 100_000.0);
    }

    #[test]
    fn test_fee_ceiling_caps_large_amounts() {
        // 10% of 10,000,000 = 1,000,000, floored at 100,000, capped at 500,000
        let fee = calculate_brokerage_fee(10_000_000.0, 10.0, 100_000.0, Some(500_000.0));
        assert_eq!(fee, 500_000.0);
    }

    #[test]
    fn test_fee_below_minimum_is_floored() {
        let fee = calculate_brokerage_fee(100_000.0, 10.0, 50_000.0, Some(500_000.0));
        assert_eq!(fee, 50_000.0);
    }

    #[test]
    fn test_fee_without_ceiling() {
        let fee = calculate_brokerage_fee(10_000_000.0, 10.0, 100_000.0, None);
        assert_eq!(fee, 1_000_000.0);
    }

    #[test]
    fn test_fee_floor_then_ceiling_order() {
        // min_fee above max_fee: the raw fee is lifted to the minimum first,
        // then capped, so the ceiling wins
        let fee = calculate_brokerage_fee(100_000.0, 1.0, 600_000.0, Some(500_000.0));
        assert_eq!(fee, 500_000.0);
    }

    #[test]
    fn test_fee_zero_amount() {
        let fee = calculate_brokerage_fee(0.0, 10.0, 100_000.0, Some(500_000.0));
        assert_eq!(fee, 100_000.0);
    }

    #[tokio::test]
    async fn payment_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/tutorhub").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = PaymentService::new(db_client);

        let _ = svc.update_payment(Uuid::nil(), UpdateBrokeragePaymentDto::default());
    }
}

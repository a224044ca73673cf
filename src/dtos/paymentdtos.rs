use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::paymentmodel::*;

//Brokerage payment DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBrokeragePaymentDto {
    pub class_id: Uuid,

    pub tutor_id: Uuid,

    pub contract_id: Option<Uuid>,

    #[validate(range(min = 0.0, message = "Contract amount must not be negative"))]
    pub contract_amount: f64,

    #[validate(range(min = 0.0, message = "Actual fee must not be negative"))]
    pub actual_fee: Option<f64>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateBrokeragePaymentDto {
    #[validate(range(min = 0.0, message = "Actual fee must not be negative"))]
    pub actual_fee: Option<f64>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    pub status: Option<BrokerageStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentQueryDto {
    pub status: Option<BrokerageStatus>,
}

//Payment settings DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePaymentSettingsDto {
    #[validate(range(min = 0.0, max = 100.0, message = "Fee percentage must be between 0 and 100"))]
    pub fee_percentage: f64,

    #[validate(range(min = 0.0, message = "Minimum fee must not be negative"))]
    pub min_fee: f64,

    #[validate(range(min = 0.0, message = "Maximum fee must not be negative"))]
    pub max_fee: Option<f64>,
}

//Staff salary DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsertSalaryDto {
    pub staff_id: Uuid,

    #[validate(range(min = 0.0, message = "Base salary must not be negative"))]
    pub base_salary: f64,

    #[validate(range(min = 0.0, message = "Bonus must not be negative"))]
    pub bonus: f64,

    #[validate(range(min = 0.0, message = "Deduction must not be negative"))]
    pub deduction: f64,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i32,

    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSalaryStatusDto {
    pub status: SalaryStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SalaryQueryDto {
    pub staff_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

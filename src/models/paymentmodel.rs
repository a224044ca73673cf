use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "brokerage_status", rename_all = "snake_case")]
pub enum BrokerageStatus {
    Pending,
    Paid,
    Overdue,
    Waived,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "salary_status", rename_all = "snake_case")]
pub enum SalaryStatus {
    Pending,
    Paid,
}

/// One row per fee policy. Updating the settings appends a new row and
/// deactivates the previous one, so the table is an audit history.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PaymentSettings {
    pub id: Uuid,
    pub fee_percentage: BigDecimal,
    pub min_fee: BigDecimal,
    pub max_fee: Option<BigDecimal>,
    pub is_active: Option<bool>,            // Database has DEFAULT TRUE, can be NULL
    pub created_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BrokeragePayment {
    pub id: Uuid,
    pub class_id: Uuid,
    pub tutor_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub fee_percentage: BigDecimal,         // Snapshot of the policy used at creation
    pub contract_amount: BigDecimal,
    pub calculated_fee: BigDecimal,
    pub actual_fee: BigDecimal,
    pub status: Option<BrokerageStatus>,    // Database has DEFAULT 'pending', can be NULL
    pub due_date: Option<DateTime<Utc>>,
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct StaffSalary {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub base_salary: BigDecimal,
    pub bonus: BigDecimal,
    pub deduction: BigDecimal,
    pub total_salary: BigDecimal,           // base_salary + bonus - deduction
    pub month: i32,
    pub year: i32,
    pub status: Option<SalaryStatus>,       // Database has DEFAULT 'pending', can be NULL
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
    pub updated_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
}

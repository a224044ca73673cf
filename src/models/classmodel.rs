use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "class_level", rename_all = "snake_case")]
pub enum ClassLevel {
    Primary,
    Secondary,
    High,
    University,
    Other,
}

impl ClassLevel {
    pub fn to_str(&self) -> &str {
        match self {
            ClassLevel::Primary => "primary",
            ClassLevel::Secondary => "secondary",
            ClassLevel::High => "high",
            ClassLevel::University => "university",
            ClassLevel::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "class_status", rename_all = "snake_case")]
pub enum ClassStatus {
    Pending,
    Approved,
    Rejected,
    Matched,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Selected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClassRequest {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub level: ClassLevel,
    pub location_state: String,
    pub location_city: String,
    pub location_address: String,
    pub schedule: String,
    pub tutor_requirements: Option<String>,
    pub special_requirements: Option<String>,
    pub status: Option<ClassStatus>,        // Database has DEFAULT 'pending', can be NULL
    pub selected_tutor_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
    pub updated_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TutorApplication {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub class_id: Uuid,
    pub status: Option<ApplicationStatus>,  // Database has DEFAULT 'pending', can be NULL
    pub self_introduction: String,
    pub created_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Contract {
    pub id: Uuid,
    pub class_id: Uuid,
    pub tutor_id: Uuid,
    pub customer_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub fee: BigDecimal,
    pub status: Option<ContractStatus>,     // Database has DEFAULT 'active', can be NULL
    pub created_at: Option<DateTime<Utc>>,  // Database has DEFAULT NOW(), can be NULL
}

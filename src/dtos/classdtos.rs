use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::classmodel::*;

//Class request DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateClassRequestDto {
    #[validate(length(min = 1, max = 100, message = "Subject must be between 1 and 100 characters"))]
    pub subject: String,

    pub level: ClassLevel,

    #[validate(length(min = 1, message = "State is required"))]
    pub location_state: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub location_city: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub location_address: String,

    #[validate(length(min = 1, max = 500, message = "Schedule must be between 1 and 500 characters"))]
    pub schedule: String,

    #[validate(length(max = 1000, message = "Tutor requirements must be at most 1000 characters"))]
    pub tutor_requirements: Option<String>,

    #[validate(length(max = 1000, message = "Special requirements must be at most 1000 characters"))]
    pub special_requirements: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ClassQueryDto {
    pub status: Option<ClassStatus>,

    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

//Tutor application DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateApplicationDto {
    #[validate(length(min = 10, max = 2000, message = "Self introduction must be between 10 and 2000 characters"))]
    pub self_introduction: String,
}

//Contract DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateContractDto {
    pub tutor_id: Uuid,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    #[validate(range(min = 0.0, message = "Fee must not be negative"))]
    pub fee: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContractStatusDto {
    pub status: ContractStatus,
}

#[derive(Debug, Serialize)]
pub struct ContractIssueResponse {
    pub contract: Contract,
    pub class: ClassRequest,
}

#[derive(Debug, Serialize)]
pub struct ClassDetailResponse {
    pub class: ClassRequest,
    pub applications: Vec<TutorApplication>,
    pub contracts: Vec<Contract>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub status: String,
    pub message: String,
    pub data: Vec<ClassRequest>,
}

//Response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            status: "error".to_string(),
            message: message.to_string(),
            data: None,
        }
    }
}

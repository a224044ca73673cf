use crate::error::HttpError;
use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Class request {0} not found")]
    ClassNotFound(Uuid),

    #[error("Tutor application {0} not found")]
    ApplicationNotFound(Uuid),

    #[error("Contract {0} not found")]
    ContractNotFound(Uuid),

    #[error("Brokerage payment {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Salary record {0} not found")]
    SalaryNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Customer {0} already has {1} pending class requests")]
    TooManyPendingRequests(Uuid, i64),

    #[error("A brokerage payment already exists for class {0} and tutor {1}")]
    DuplicateBrokerageFee(Uuid, Uuid),

    #[error("No active payment policy is configured")]
    NoActivePolicy,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::ClassNotFound(_)
            | ServiceError::ApplicationNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::PaymentNotFound(_)
            | ServiceError::SalaryNotFound(_)
            | ServiceError::UserNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::InvalidStateTransition(_)
            | ServiceError::TooManyPendingRequests(_, _)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::DuplicateBrokerageFee(_, _)
            | ServiceError::NoActivePolicy => HttpError::conflict(error.to_string()),

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ClassNotFound(_)
            | ServiceError::ApplicationNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::PaymentNotFound(_)
            | ServiceError::SalaryNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidStateTransition(_)
            | ServiceError::TooManyPendingRequests(_, _)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::DuplicateBrokerageFee(_, _)
            | ServiceError::NoActivePolicy => StatusCode::CONFLICT,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// handlers/payments.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::paymentdb::PaymentExt,
    dtos::{classdtos::ApiResponse, paymentdtos::*},
    error::HttpError,
    middleware::{permission_check, Action, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn payment_handler() -> Router {
    Router::new()
        // Brokerage payment routes
        .route(
            "/brokerage",
            post(create_brokerage_payment)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::CreatePayment)
                }))
                .get(list_brokerage_payments),
        )
        .route("/brokerage/mine", get(get_my_brokerage_payments))
        .route(
            "/brokerage/:payment_id",
            put(update_brokerage_payment)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::UpdatePayment)
                }))
                .get(get_brokerage_payment),
        )
        // Fee policy routes
        .route(
            "/settings",
            put(update_payment_settings)
                .get(get_payment_settings)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::ManageSettings)
                })),
        )
        .route(
            "/settings/history",
            get(get_settings_history).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::ManageSettings)
            })),
        )
        // Staff salary routes
        .route(
            "/salaries",
            post(upsert_salary)
                .get(list_salaries)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::ManageSalaries)
                })),
        )
        .route("/salaries/mine", get(get_my_salaries))
        .route(
            "/salaries/:salary_id/status",
            put(update_salary_status).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::ManageSalaries)
            })),
        )
}

// Brokerage Payment Handlers
pub async fn create_brokerage_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateBrokeragePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state.payment_service.create_payment(body).await?;

    Ok(Json(ApiResponse::success(
        "Brokerage payment created successfully",
        payment,
    )))
}

pub async fn list_brokerage_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<PaymentQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Admin {
        return Err(HttpError::unauthorized("Not authorized to view brokerage payments"));
    }

    let payments = app_state
        .db_client
        .get_brokerage_payments(params.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Brokerage payments retrieved successfully",
        payments,
    )))
}

pub async fn get_my_brokerage_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state
        .db_client
        .get_brokerage_payments_by_tutor(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Brokerage payments retrieved successfully",
        payments,
    )))
}

pub async fn get_brokerage_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .db_client
        .get_brokerage_payment_by_id(payment_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Brokerage payment not found"))?;

    let is_admin = auth.user.role == UserRole::Admin;
    if !is_admin && payment.tutor_id != auth.user.id {
        return Err(HttpError::unauthorized("Not authorized to view this payment"));
    }

    Ok(Json(ApiResponse::success(
        "Brokerage payment retrieved successfully",
        payment,
    )))
}

pub async fn update_brokerage_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
    Json(body): Json<UpdateBrokeragePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state
        .payment_service
        .update_payment(payment_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Brokerage payment updated successfully",
        payment,
    )))
}

// Fee Policy Handlers
pub async fn get_payment_settings(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let settings = app_state
        .db_client
        .get_active_settings()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No active payment settings"))?;

    Ok(Json(ApiResponse::success(
        "Payment settings retrieved successfully",
        settings,
    )))
}

pub async fn get_settings_history(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let history = app_state
        .db_client
        .get_settings_history(50)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Payment settings history retrieved successfully",
        history,
    )))
}

pub async fn update_payment_settings(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdatePaymentSettingsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let settings = app_state.payment_service.update_settings(body).await?;

    Ok(Json(ApiResponse::success(
        "Payment settings updated successfully",
        settings,
    )))
}

// Staff Salary Handlers
pub async fn upsert_salary(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpsertSalaryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let salary = app_state
        .salary_service
        .create_or_update_salary(body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Salary recorded successfully",
        salary,
    )))
}

pub async fn list_salaries(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<SalaryQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let salaries = app_state
        .db_client
        .get_staff_salaries(params.staff_id, params.month, params.year)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Salaries retrieved successfully",
        salaries,
    )))
}

pub async fn get_my_salaries(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    if !matches!(auth.user.role, UserRole::Staff | UserRole::Admin) {
        return Err(HttpError::unauthorized("Only staff members have salary records"));
    }

    let salaries = app_state
        .db_client
        .get_staff_salaries(Some(auth.user.id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Salaries retrieved successfully",
        salaries,
    )))
}

pub async fn update_salary_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(salary_id): Path<Uuid>,
    Json(body): Json<UpdateSalaryStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let salary = app_state
        .salary_service
        .update_salary_status(salary_id, body.status)
        .await?;

    Ok(Json(ApiResponse::success(
        "Salary status updated successfully",
        salary,
    )))
}

// handlers/classes.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::classdb::ClassExt,
    dtos::classdtos::*,
    error::HttpError,
    middleware::{permission_check, Action, JWTAuthMiddeware},
    models::{classmodel::*, usermodel::UserRole},
    AppState,
};

pub fn class_handler() -> Router {
    Router::new()
        // Class request routes
        .route(
            "/requests",
            post(create_class_request)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::CreateClass)
                }))
                .get(list_classes),
        )
        .route(
            "/requests/:class_id",
            delete(delete_class)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::DeleteClass)
                }))
                .get(get_class_details),
        )
        .route(
            "/requests/:class_id/approve",
            put(approve_class).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::ApproveClass)
            })),
        )
        .route(
            "/requests/:class_id/reject",
            put(reject_class).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::RejectClass)
            })),
        )
        .route(
            "/requests/:class_id/complete",
            put(complete_class).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::CompleteClass)
            })),
        )
        // Tutor application routes
        .route(
            "/requests/:class_id/applications",
            post(submit_application)
                .layer(middleware::from_fn(|req, next| {
                    permission_check(req, next, Action::SubmitApplication)
                }))
                .get(get_class_applications),
        )
        .route("/applications/mine", get(get_my_applications))
        .route(
            "/applications/:application_id/approve",
            put(approve_application).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::ApproveApplication)
            })),
        )
        .route(
            "/applications/:application_id/reject",
            put(reject_application).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::RejectApplication)
            })),
        )
        // Contract routes
        .route(
            "/requests/:class_id/contract",
            post(create_contract).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::CreateContract)
            })),
        )
        .route("/contracts/:contract_id", get(get_contract))
        .route(
            "/contracts/:contract_id/status",
            put(update_contract_status).layer(middleware::from_fn(|req, next| {
                permission_check(req, next, Action::UpdateContract)
            })),
        )
}

// Class Request Handlers
pub async fn create_class_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateClassRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let class = app_state
        .class_service
        .create_class_request(auth.user.id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Class request created successfully",
        class,
    )))
}

pub async fn list_classes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<ClassQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(10);
    let offset = ((page - 1) * limit) as i64;

    let classes = match auth.user.role {
        UserRole::Admin | UserRole::Staff => {
            app_state
                .db_client
                .get_classes(params.status, limit as i64, offset)
                .await
        }
        UserRole::Customer => {
            app_state
                .db_client
                .get_classes_by_customer(auth.user.id)
                .await
        }
        // Tutors only browse classes that are open for applications
        UserRole::Tutor => {
            app_state
                .db_client
                .get_classes(Some(ClassStatus::Approved), limit as i64, offset)
                .await
        }
    }
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ClassesResponse {
        status: "success".to_string(),
        message: "Class requests retrieved successfully".to_string(),
        data: classes,
    }))
}

pub async fn get_class_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let class = app_state
        .db_client
        .get_class_by_id(class_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Class request not found"))?;

    let is_staff = matches!(auth.user.role, UserRole::Admin | UserRole::Staff);
    let is_owner = class.customer_id == auth.user.id;

    // Applications and contracts are only disclosed to staff and the owning customer
    let (applications, contracts) = if is_staff || is_owner {
        let applications = app_state
            .db_client
            .get_applications_by_class(class_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        let contracts = app_state
            .db_client
            .get_contracts_by_class(class_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        (applications, contracts)
    } else {
        (vec![], vec![])
    };

    Ok(Json(ApiResponse::success(
        "Class request retrieved successfully",
        ClassDetailResponse {
            class,
            applications,
            contracts,
        },
    )))
}

pub async fn approve_class(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let class = app_state.class_service.approve_class(class_id).await?;

    Ok(Json(ApiResponse::success(
        "Class request approved successfully",
        class,
    )))
}

pub async fn reject_class(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let class = app_state.class_service.reject_class(class_id).await?;

    Ok(Json(ApiResponse::success(
        "Class request rejected successfully",
        class,
    )))
}

pub async fn complete_class(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let class = app_state.class_service.complete_class(class_id).await?;

    Ok(Json(ApiResponse::success(
        "Class request completed successfully",
        class,
    )))
}

pub async fn delete_class(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.class_service.delete_class(class_id).await?;

    Ok(Json(ApiResponse::success(
        "Class request deleted successfully",
        (),
    )))
}

// Tutor Application Handlers
pub async fn submit_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(class_id): Path<Uuid>,
    Json(body): Json<CreateApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .class_service
        .submit_application(auth.user.id, class_id, body.self_introduction)
        .await?;

    Ok(Json(ApiResponse::success(
        "Application submitted successfully",
        application,
    )))
}

pub async fn get_class_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let class = app_state
        .db_client
        .get_class_by_id(class_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Class request not found"))?;

    let is_staff = matches!(auth.user.role, UserRole::Admin | UserRole::Staff);
    if !is_staff && class.customer_id != auth.user.id {
        return Err(HttpError::unauthorized(
            "Not authorized to view applications for this class",
        ));
    }

    let applications = app_state
        .db_client
        .get_applications_by_class(class_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Applications retrieved successfully",
        applications,
    )))
}

pub async fn get_my_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let applications = app_state
        .db_client
        .get_applications_by_tutor(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Applications retrieved successfully",
        applications,
    )))
}

pub async fn approve_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .class_service
        .approve_application(application_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Application approved successfully",
        application,
    )))
}

pub async fn reject_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .class_service
        .reject_application(application_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Application rejected successfully",
        application,
    )))
}

// Contract Handlers
pub async fn create_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
    Json(body): Json<CreateContractDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .contract_service
        .create_contract(class_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contract created successfully",
        result,
    )))
}

pub async fn get_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .db_client
        .get_contract_by_id(contract_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Contract not found"))?;

    let is_staff = matches!(auth.user.role, UserRole::Admin | UserRole::Staff);
    let is_party = contract.customer_id == auth.user.id || contract.tutor_id == auth.user.id;

    if !is_staff && !is_party {
        return Err(HttpError::unauthorized("Not authorized to view this contract"));
    }

    Ok(Json(ApiResponse::success(
        "Contract retrieved successfully",
        contract,
    )))
}

pub async fn update_contract_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
    Json(body): Json<UpdateContractStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .update_contract_status(contract_id, body.status)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contract status updated successfully",
        contract,
    )))
}

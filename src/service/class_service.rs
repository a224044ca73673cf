// services/class_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{classdb::ClassExt, db::DBClient},
    dtos::classdtos::CreateClassRequestDto,
    models::classmodel::*,
    service::error::ServiceError,
};

/// Maximum number of class requests a customer may hold in `pending` at once.
pub const MAX_PENDING_REQUESTS: i64 = 5;

pub fn is_valid_class_transition(from: ClassStatus, to: ClassStatus) -> bool {
    match (from, to) {
        (ClassStatus::Pending, ClassStatus::Approved) => true,
        (ClassStatus::Pending, ClassStatus::Rejected) => true,
        (ClassStatus::Approved, ClassStatus::Matched) => true,
        (ClassStatus::Matched, ClassStatus::Completed) => true,
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct ClassService {
    db_client: Arc<DBClient>,
}

impl ClassService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn create_class_request(
        &self,
        customer_id: Uuid,
        body: CreateClassRequestDto,
    ) -> Result<ClassRequest, ServiceError> {
        let pending = self.db_client.count_pending_requests(customer_id).await?;

        if pending >= MAX_PENDING_REQUESTS {
            return Err(ServiceError::TooManyPendingRequests(customer_id, pending));
        }

        let class = self
            .db_client
            .create_class_request(
                customer_id,
                body.subject,
                body.level,
                body.location_state,
                body.location_city,
                body.location_address,
                body.schedule,
                body.tutor_requirements,
                body.special_requirements,
            )
            .await?;

        tracing::info!("class request {} created by customer {}", class.id, customer_id);

        Ok(class)
    }

    pub async fn approve_class(&self, class_id: Uuid) -> Result<ClassRequest, ServiceError> {
        self.transition_class(class_id, ClassStatus::Pending, ClassStatus::Approved)
            .await
    }

    pub async fn reject_class(&self, class_id: Uuid) -> Result<ClassRequest, ServiceError> {
        self.transition_class(class_id, ClassStatus::Pending, ClassStatus::Rejected)
            .await
    }

    pub async fn complete_class(&self, class_id: Uuid) -> Result<ClassRequest, ServiceError> {
        self.transition_class(class_id, ClassStatus::Matched, ClassStatus::Completed)
            .await
    }

    pub async fn delete_class(&self, class_id: Uuid) -> Result<(), ServiceError> {
        self.db_client
            .get_class_by_id(class_id)
            .await?
            .ok_or(ServiceError::ClassNotFound(class_id))?;

        self.db_client.delete_class_cascade(class_id).await?;

        tracing::info!("class request {} deleted with its applications, contracts and payments", class_id);

        Ok(())
    }

    async fn transition_class(
        &self,
        class_id: Uuid,
        from: ClassStatus,
        to: ClassStatus,
    ) -> Result<ClassRequest, ServiceError> {
        let class = self
            .db_client
            .get_class_by_id(class_id)
            .await?
            .ok_or(ServiceError::ClassNotFound(class_id))?;

        let current = class.status.unwrap_or(ClassStatus::Pending);
        if current != from || !is_valid_class_transition(from, to) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "class {} cannot move from {:?} to {:?}",
                class_id, current, to
            )));
        }

        let updated = self
            .db_client
            .update_class_status_guarded(class_id, from, to)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidStateTransition(format!(
                    "class {} is no longer {:?}",
                    class_id, from
                ))
            })?;

        tracing::info!("class request {} moved from {:?} to {:?}", class_id, from, to);

        Ok(updated)
    }

    pub async fn submit_application(
        &self,
        tutor_id: Uuid,
        class_id: Uuid,
        self_introduction: String,
    ) -> Result<TutorApplication, ServiceError> {
        let class = self
            .db_client
            .get_class_by_id(class_id)
            .await?
            .ok_or(ServiceError::ClassNotFound(class_id))?;

        if class.status != Some(ClassStatus::Approved) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "class {} is not open for applications",
                class_id
            )));
        }

        let application = self
            .db_client
            .create_application(tutor_id, class_id, self_introduction)
            .await
            .map_err(|e| {
                // Backed by the unique index on (tutor_id, class_id)
                if e.as_database_error()
                    .map(|db| db.is_unique_violation())
                    .unwrap_or(false)
                {
                    ServiceError::Validation(format!(
                        "Tutor {} has already applied to class {}",
                        tutor_id, class_id
                    ))
                } else {
                    ServiceError::Database(e)
                }
            })?;

        tracing::info!("tutor {} applied to class {}", tutor_id, class_id);

        Ok(application)
    }

    pub async fn approve_application(
        &self,
        application_id: Uuid,
    ) -> Result<TutorApplication, ServiceError> {
        self.review_application(application_id, ApplicationStatus::Approved)
            .await
    }

    pub async fn reject_application(
        &self,
        application_id: Uuid,
    ) -> Result<TutorApplication, ServiceError> {
        self.review_application(application_id, ApplicationStatus::Rejected)
            .await
    }

    async fn review_application(
        &self,
        application_id: Uuid,
        to: ApplicationStatus,
    ) -> Result<TutorApplication, ServiceError> {
        let application = self
            .db_client
            .get_application_by_id(application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        let class = self
            .db_client
            .get_class_by_id(application.class_id)
            .await?
            .ok_or(ServiceError::ClassNotFound(application.class_id))?;

        // Reviewing an application only makes sense while its class is still
        // in the matching flow.
        match class.status {
            Some(ClassStatus::Approved) | Some(ClassStatus::Matched) => {}
            other => {
                return Err(ServiceError::InvalidStateTransition(format!(
                    "class {} is not reviewable in status {:?}",
                    application.class_id, other
                )));
            }
        }

        if application.status != Some(ApplicationStatus::Pending) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "application {} is not pending",
                application_id
            )));
        }

        let updated = self
            .db_client
            .update_application_status_guarded(application_id, ApplicationStatus::Pending, to)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidStateTransition(format!(
                    "application {} is no longer pending",
                    application_id
                ))
            })?;

        tracing::info!("application {} moved to {:?}", application_id, to);

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[test]
    fn test_class_transition_table() {
        assert!(is_valid_class_transition(ClassStatus::Pending, ClassStatus::Approved));
        assert!(is_valid_class_transition(ClassStatus::Pending, ClassStatus::Rejected));
        assert!(is_valid_class_transition(ClassStatus::Approved, ClassStatus::Matched));
        assert!(is_valid_class_transition(ClassStatus::Matched, ClassStatus::Completed));

        assert!(!is_valid_class_transition(ClassStatus::Approved, ClassStatus::Pending));
        assert!(!is_valid_class_transition(ClassStatus::Rejected, ClassStatus::Approved));
        assert!(!is_valid_class_transition(ClassStatus::Pending, ClassStatus::Matched));
        assert!(!is_valid_class_transition(ClassStatus::Pending, ClassStatus::Completed));
        assert!(!is_valid_class_transition(ClassStatus::Completed, ClassStatus::Matched));
        assert!(!is_valid_class_transition(ClassStatus::Matched, ClassStatus::Approved));
    }

    #[tokio::test]
    async fn class_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/tutorhub").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = ClassService::new(db_client);

        let _ = svc.approve_class(Uuid::nil());
    }
}

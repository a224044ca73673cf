// services/contract_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{classdb::ClassExt, db::DBClient},
    dtos::classdtos::{ContractIssueResponse, CreateContractDto},
    models::classmodel::*,
    service::error::ServiceError,
};

/// `completed` and `cancelled` are terminal; a contract only ever leaves
/// `active`.
pub fn is_valid_contract_transition(from: ContractStatus, to: ContractStatus) -> bool {
    match (from, to) {
        (ContractStatus::Active, ContractStatus::Completed) => true,
        (ContractStatus::Active, ContractStatus::Cancelled) => true,
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct ContractService {
    db_client: Arc<DBClient>,
}

impl ContractService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn create_contract(
        &self,
        class_id: Uuid,
        body: CreateContractDto,
    ) -> Result<ContractIssueResponse, ServiceError> {
        let class = self
            .db_client
            .get_class_by_id(class_id)
            .await?
            .ok_or(ServiceError::ClassNotFound(class_id))?;

        if class.status != Some(ClassStatus::Approved) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "class {} is not approved for matching",
                class_id
            )));
        }

        if body.end_date <= body.start_date {
            return Err(ServiceError::Validation(
                "Contract end date must be after the start date".to_string(),
            ));
        }

        let application = self
            .db_client
            .get_application_by_tutor_and_class(body.tutor_id, class_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Tutor {} has not applied to class {}",
                    body.tutor_id, class_id
                ))
            })?;

        if application.status != Some(ApplicationStatus::Approved) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "application {} is not approved for selection",
                application.id
            )));
        }

        let (contract, class) = self
            .db_client
            .create_contract_with_match(
                class_id,
                body.tutor_id,
                application.id,
                body.start_date,
                body.end_date,
                body.fee,
            )
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ServiceError::InvalidStateTransition(format!(
                    "class {} is no longer open for matching",
                    class_id
                )),
                sqlx::Error::Protocol(ref msg) if msg == "active_contract_exists" => {
                    ServiceError::InvalidStateTransition(format!(
                        "class {} already has an active contract",
                        class_id
                    ))
                }
                other => ServiceError::Database(other),
            })?;

        tracing::info!(
            "contract {} issued for class {} with tutor {}",
            contract.id,
            class_id,
            body.tutor_id
        );

        Ok(ContractIssueResponse { contract, class })
    }

    pub async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        let current = contract.status.unwrap_or(ContractStatus::Active);
        if !is_valid_contract_transition(current, status) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "contract {} cannot move from {:?} to {:?}",
                contract_id, current, status
            )));
        }

        let updated = self
            .db_client
            .update_contract_status(contract_id, status)
            .await?;

        tracing::info!("contract {} moved from {:?} to {:?}", contract_id, current, status);

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[test]
    fn test_contract_transition_table() {
        assert!(is_valid_contract_transition(ContractStatus::Active, ContractStatus::Completed));
        assert!(is_valid_contract_transition(ContractStatus::Active, ContractStatus::Cancelled));

        assert!(!is_valid_contract_transition(ContractStatus::Completed, ContractStatus::Active));
        assert!(!is_valid_contract_transition(ContractStatus::Completed, ContractStatus::Cancelled));
        assert!(!is_valid_contract_transition(ContractStatus::Cancelled, ContractStatus::Active));
        assert!(!is_valid_contract_transition(ContractStatus::Cancelled, ContractStatus::Completed));
        assert!(!is_valid_contract_transition(ContractStatus::Active, ContractStatus::Active));
    }

    #[tokio::test]
    async fn contract_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/tutorhub").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = ContractService::new(db_client);

        let _ = svc.update_contract_status(Uuid::nil(), ContractStatus::Completed);
    }
}

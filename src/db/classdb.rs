// db/classdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use sqlx::Error as SqlxError;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::classmodel::*;

#[async_trait]
pub trait ClassExt {
    async fn create_class_request(
        &self,
        customer_id: Uuid,
        subject: String,
        level: ClassLevel,
        location_state: String,
        location_city: String,
        location_address: String,
        schedule: String,
        tutor_requirements: Option<String>,
        special_requirements: Option<String>,
    ) -> Result<ClassRequest, SqlxError>;

    async fn count_pending_requests(&self, customer_id: Uuid) -> Result<i64, SqlxError>;

    async fn get_class_by_id(&self, class_id: Uuid) -> Result<Option<ClassRequest>, SqlxError>;

    async fn get_classes(
        &self,
        status: Option<ClassStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ClassRequest>, SqlxError>;

    async fn get_classes_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<ClassRequest>, SqlxError>;

    // Flips the status only when the row is still in `from`; returns None when
    // a concurrent writer got there first.
    async fn update_class_status_guarded(
        &self,
        class_id: Uuid,
        from: ClassStatus,
        to: ClassStatus,
    ) -> Result<Option<ClassRequest>, SqlxError>;

    // Deletes the class and everything hanging off it in a single transaction
    // so a partial failure can never leave orphaned rows behind.
    async fn delete_class_cascade(&self, class_id: Uuid) -> Result<(), SqlxError>;

    //Tutor applications
    async fn create_application(
        &self,
        tutor_id: Uuid,
        class_id: Uuid,
        self_introduction: String,
    ) -> Result<TutorApplication, SqlxError>;

    async fn get_application_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<TutorApplication>, SqlxError>;

    async fn get_application_by_tutor_and_class(
        &self,
        tutor_id: Uuid,
        class_id: Uuid,
    ) -> Result<Option<TutorApplication>, SqlxError>;

    async fn get_applications_by_class(
        &self,
        class_id: Uuid,
    ) -> Result<Vec<TutorApplication>, SqlxError>;

    async fn get_applications_by_tutor(
        &self,
        tutor_id: Uuid,
    ) -> Result<Vec<TutorApplication>, SqlxError>;

    async fn update_application_status_guarded(
        &self,
        application_id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<TutorApplication>, SqlxError>;

    //Contract management
    // The single atomic write of the matching flow: inserts the contract,
    // marks the class matched, marks the winning application selected and
    // force-rejects its siblings. Guarded by a row lock on the class so only
    // one selection can ever win.
    async fn create_contract_with_match(
        &self,
        class_id: Uuid,
        tutor_id: Uuid,
        application_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        fee: f64,
    ) -> Result<(Contract, ClassRequest), SqlxError>;

    async fn get_contract_by_id(&self, contract_id: Uuid) -> Result<Option<Contract>, SqlxError>;

    async fn get_contracts_by_class(&self, class_id: Uuid) -> Result<Vec<Contract>, SqlxError>;

    async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, SqlxError>;
}

#[async_trait]
impl ClassExt for DBClient {
    async fn create_class_request(
        &self,
        customer_id: Uuid,
        subject: String,
        level: ClassLevel,
        location_state: String,
        location_city: String,
        location_address: String,
        schedule: String,
        tutor_requirements: Option<String>,
        special_requirements: Option<String>,
    ) -> Result<ClassRequest, SqlxError> {
        sqlx::query_as::<_, ClassRequest>(
            r#"
            INSERT INTO class_requests
            (customer_id, subject, level, location_state, location_city, location_address,
            schedule, tutor_requirements, special_requirements)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, customer_id, subject, level,
                location_state, location_city, location_address,
                schedule, tutor_requirements, special_requirements,
                status, selected_tutor_id,
                created_at, updated_at
            "#,
        )
        .bind(customer_id)
        .bind(subject)
        .bind(level)
        .bind(location_state)
        .bind(location_city)
        .bind(location_address)
        .bind(schedule)
        .bind(tutor_requirements)
        .bind(special_requirements)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_pending_requests(&self, customer_id: Uuid) -> Result<i64, SqlxError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM class_requests
            WHERE customer_id = $1 AND status = 'pending'::class_status
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_class_by_id(&self, class_id: Uuid) -> Result<Option<ClassRequest>, SqlxError> {
        sqlx::query_as::<_, ClassRequest>(
            r#"
            SELECT
                id, customer_id, subject, level,
                location_state, location_city, location_address,
                schedule, tutor_requirements, special_requirements,
                status, selected_tutor_id,
                created_at, updated_at
            FROM class_requests
            WHERE id = $1
            "#,
        )
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_classes(
        &self,
        status: Option<ClassStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ClassRequest>, SqlxError> {
        if let Some(status) = status {
            sqlx::query_as::<_, ClassRequest>(
                r#"
                SELECT
                    id, customer_id, subject, level,
                    location_state, location_city, location_address,
                    schedule, tutor_requirements, special_requirements,
                    status, selected_tutor_id,
                    created_at, updated_at
                FROM class_requests
                WHERE status = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, ClassRequest>(
                r#"
                SELECT
                    id, customer_id, subject, level,
                    location_state, location_city, location_address,
                    schedule, tutor_requirements, special_requirements,
                    status, selected_tutor_id,
                    created_at, updated_at
                FROM class_requests
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        }
    }

    async fn get_classes_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<ClassRequest>, SqlxError> {
        sqlx::query_as::<_, ClassRequest>(
            r#"
            SELECT
                id, customer_id, subject, level,
                location_state, location_city, location_address,
                schedule, tutor_requirements, special_requirements,
                status, selected_tutor_id,
                created_at, updated_at
            FROM class_requests
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_class_status_guarded(
        &self,
        class_id: Uuid,
        from: ClassStatus,
        to: ClassStatus,
    ) -> Result<Option<ClassRequest>, SqlxError> {
        sqlx::query_as::<_, ClassRequest>(
            r#"
            UPDATE class_requests
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING
                id, customer_id, subject, level,
                location_state, location_city, location_address,
                schedule, tutor_requirements, special_requirements,
                status, selected_tutor_id,
                created_at, updated_at
            "#,
        )
        .bind(class_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_class_cascade(&self, class_id: Uuid) -> Result<(), SqlxError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM brokerage_payments WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM contracts WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM tutor_applications WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM class_requests WHERE id = $1")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(SqlxError::RowNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn create_application(
        &self,
        tutor_id: Uuid,
        class_id: Uuid,
        self_introduction: String,
    ) -> Result<TutorApplication, SqlxError> {
        sqlx::query_as::<_, TutorApplication>(
            r#"
            INSERT INTO tutor_applications (tutor_id, class_id, self_introduction)
            VALUES ($1, $2, $3)
            RETURNING id, tutor_id, class_id, status, self_introduction, created_at
            "#,
        )
        .bind(tutor_id)
        .bind(class_id)
        .bind(self_introduction)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_application_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<TutorApplication>, SqlxError> {
        sqlx::query_as::<_, TutorApplication>(
            r#"
            SELECT id, tutor_id, class_id, status, self_introduction, created_at
            FROM tutor_applications
            WHERE id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_application_by_tutor_and_class(
        &self,
        tutor_id: Uuid,
        class_id: Uuid,
    ) -> Result<Option<TutorApplication>, SqlxError> {
        sqlx::query_as::<_, TutorApplication>(
            r#"
            SELECT id, tutor_id, class_id, status, self_introduction, created_at
            FROM tutor_applications
            WHERE tutor_id = $1 AND class_id = $2
            "#,
        )
        .bind(tutor_id)
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_applications_by_class(
        &self,
        class_id: Uuid,
    ) -> Result<Vec<TutorApplication>, SqlxError> {
        sqlx::query_as::<_, TutorApplication>(
            r#"
            SELECT id, tutor_id, class_id, status, self_introduction, created_at
            FROM tutor_applications
            WHERE class_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_applications_by_tutor(
        &self,
        tutor_id: Uuid,
    ) -> Result<Vec<TutorApplication>, SqlxError> {
        sqlx::query_as::<_, TutorApplication>(
            r#"
            SELECT id, tutor_id, class_id, status, self_introduction, created_at
            FROM tutor_applications
            WHERE tutor_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_application_status_guarded(
        &self,
        application_id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<TutorApplication>, SqlxError> {
        sqlx::query_as::<_, TutorApplication>(
            r#"
            UPDATE tutor_applications
            SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING id, tutor_id, class_id, status, self_introduction, created_at
            "#,
        )
        .bind(application_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_contract_with_match(
        &self,
        class_id: Uuid,
        tutor_id: Uuid,
        application_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        fee: f64,
    ) -> Result<(Contract, ClassRequest), SqlxError> {
        let fee_bd = BigDecimal::try_from(fee)
            .map_err(|_| SqlxError::Decode("Invalid contract fee".into()))?;

        let mut tx = self.pool.begin().await?;

        // 1. Lock the class row; only an approved class can be matched
        let class = sqlx::query_as::<_, ClassRequest>(
            r#"
            SELECT
                id, customer_id, subject, level,
                location_state, location_city, location_address,
                schedule, tutor_requirements, special_requirements,
                status, selected_tutor_id,
                created_at, updated_at
            FROM class_requests
            WHERE id = $1 AND status = 'approved'::class_status
            FOR UPDATE
            "#,
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        // 2. Refuse a second active contract for the same class
        let existing_contract = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM contracts
            WHERE class_id = $1 AND status = 'active'::contract_status
            "#,
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing_contract.is_some() {
            return Err(SqlxError::Protocol("active_contract_exists".into()));
        }

        // 3. Insert the contract, copying customer_id from the locked class row
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (class_id, tutor_id, customer_id, start_date, end_date, fee)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, class_id, tutor_id, customer_id, start_date, end_date, fee, status, created_at
            "#,
        )
        .bind(class_id)
        .bind(tutor_id)
        .bind(class.customer_id)
        .bind(start_date)
        .bind(end_date)
        .bind(fee_bd)
        .fetch_one(&mut *tx)
        .await?;

        // 4. Flip the class to matched and record the chosen tutor
        let updated_class = sqlx::query_as::<_, ClassRequest>(
            r#"
            UPDATE class_requests
            SET status = 'matched'::class_status, selected_tutor_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, customer_id, subject, level,
                location_state, location_city, location_address,
                schedule, tutor_requirements, special_requirements,
                status, selected_tutor_id,
                created_at, updated_at
            "#,
        )
        .bind(class_id)
        .bind(tutor_id)
        .fetch_one(&mut *tx)
        .await?;

        // 5. Mark the winning application and force-reject its siblings
        sqlx::query(
            r#"
            UPDATE tutor_applications
            SET status = 'selected'::application_status
            WHERE id = $1
            "#,
        )
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE tutor_applications
            SET status = 'rejected'::application_status
            WHERE class_id = $1 AND id <> $2
            AND status IN ('pending'::application_status, 'approved'::application_status)
            "#,
        )
        .bind(class_id)
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((contract, updated_class))
    }

    async fn get_contract_by_id(&self, contract_id: Uuid) -> Result<Option<Contract>, SqlxError> {
        sqlx::query_as::<_, Contract>(
            r#"
            SELECT id, class_id, tutor_id, customer_id, start_date, end_date, fee, status, created_at
            FROM contracts
            WHERE id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_contracts_by_class(&self, class_id: Uuid) -> Result<Vec<Contract>, SqlxError> {
        sqlx::query_as::<_, Contract>(
            r#"
            SELECT id, class_id, tutor_id, customer_id, start_date, end_date, fee, status, created_at
            FROM contracts
            WHERE class_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, SqlxError> {
        sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = $2
            WHERE id = $1
            RETURNING id, class_id, tutor_id, customer_id, start_date, end_date, fee, status, created_at
            "#,
        )
        .bind(contract_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}

// db/paymentdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use sqlx::Error as SqlxError;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::paymentmodel::*;

#[async_trait]
pub trait PaymentExt {
    //Fee policy settings
    async fn get_active_settings(&self) -> Result<Option<PaymentSettings>, SqlxError>;

    async fn get_settings_history(&self, limit: i64) -> Result<Vec<PaymentSettings>, SqlxError>;

    // Deactivates the current policy and inserts the new one in a single
    // transaction; a concurrent fee calculation never observes zero active rows.
    async fn swap_payment_settings(
        &self,
        fee_percentage: f64,
        min_fee: f64,
        max_fee: Option<f64>,
    ) -> Result<PaymentSettings, SqlxError>;

    //Brokerage payments
    async fn create_brokerage_payment(
        &self,
        class_id: Uuid,
        tutor_id: Uuid,
        contract_id: Option<Uuid>,
        fee_percentage: f64,
        contract_amount: f64,
        calculated_fee: f64,
        actual_fee: f64,
        due_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<BrokeragePayment, SqlxError>;

    async fn get_brokerage_payment_by_id(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<BrokeragePayment>, SqlxError>;

    async fn get_brokerage_payments(
        &self,
        status: Option<BrokerageStatus>,
    ) -> Result<Vec<BrokeragePayment>, SqlxError>;

    async fn get_brokerage_payments_by_tutor(
        &self,
        tutor_id: Uuid,
    ) -> Result<Vec<BrokeragePayment>, SqlxError>;

    async fn update_brokerage_payment(
        &self,
        payment_id: Uuid,
        actual_fee: BigDecimal,
        due_date: Option<DateTime<Utc>>,
        notes: Option<String>,
        status: BrokerageStatus,
        paid_date: Option<DateTime<Utc>>,
    ) -> Result<BrokeragePayment, SqlxError>;

    //Staff salaries
    async fn upsert_staff_salary(
        &self,
        staff_id: Uuid,
        base_salary: f64,
        bonus: f64,
        deduction: f64,
        total_salary: f64,
        month: i32,
        year: i32,
        notes: Option<String>,
    ) -> Result<StaffSalary, SqlxError>;

    async fn get_salary_by_id(&self, salary_id: Uuid) -> Result<Option<StaffSalary>, SqlxError>;

    async fn get_staff_salaries(
        &self,
        staff_id: Option<Uuid>,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Vec<StaffSalary>, SqlxError>;

    async fn update_salary_status(
        &self,
        salary_id: Uuid,
        status: SalaryStatus,
        paid_date: Option<DateTime<Utc>>,
    ) -> Result<StaffSalary, SqlxError>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn get_active_settings(&self) -> Result<Option<PaymentSettings>, SqlxError> {
        sqlx::query_as::<_, PaymentSettings>(
            r#"
            SELECT id, fee_percentage, min_fee, max_fee, is_active, created_at
            FROM payment_settings
            WHERE is_active = true
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_settings_history(&self, limit: i64) -> Result<Vec<PaymentSettings>, SqlxError> {
        sqlx::query_as::<_, PaymentSettings>(
            r#"
            SELECT id, fee_percentage, min_fee, max_fee, is_active, created_at
            FROM payment_settings
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn swap_payment_settings(
        &self,
        fee_percentage: f64,
        min_fee: f64,
        max_fee: Option<f64>,
    ) -> Result<PaymentSettings, SqlxError> {
        let fee_percentage_bd = BigDecimal::try_from(fee_percentage)
            .map_err(|_| SqlxError::Decode("Invalid fee percentage".into()))?;
        let min_fee_bd = BigDecimal::try_from(min_fee)
            .map_err(|_| SqlxError::Decode("Invalid minimum fee".into()))?;
        let max_fee_bd = match max_fee {
            Some(max_fee) => Some(
                BigDecimal::try_from(max_fee)
                    .map_err(|_| SqlxError::Decode("Invalid maximum fee".into()))?,
            ),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE payment_settings
            SET is_active = false
            WHERE is_active = true
            "#,
        )
        .execute(&mut *tx)
        .await?;

        let settings = sqlx::query_as::<_, PaymentSettings>(
            r#"
            INSERT INTO payment_settings (fee_percentage, min_fee, max_fee, is_active)
            VALUES ($1, $2, $3, true)
            RETURNING id, fee_percentage, min_fee, max_fee, is_active, created_at
            "#,
        )
        .bind(fee_percentage_bd)
        .bind(min_fee_bd)
        .bind(max_fee_bd)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn create_brokerage_payment(
        &self,
        class_id: Uuid,
        tutor_id: Uuid,
        contract_id: Option<Uuid>,
        fee_percentage: f64,
        contract_amount: f64,
        calculated_fee: f64,
        actual_fee: f64,
        due_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<BrokeragePayment, SqlxError> {
        let fee_percentage_bd = BigDecimal::try_from(fee_percentage)
            .map_err(|_| SqlxError::Decode("Invalid fee percentage".into()))?;
        let contract_amount_bd = BigDecimal::try_from(contract_amount)
            .map_err(|_| SqlxError::Decode("Invalid contract amount".into()))?;
        let calculated_fee_bd = BigDecimal::try_from(calculated_fee)
            .map_err(|_| SqlxError::Decode("Invalid calculated fee".into()))?;
        let actual_fee_bd = BigDecimal::try_from(actual_fee)
            .map_err(|_| SqlxError::Decode("Invalid actual fee".into()))?;

        let mut tx = self.pool.begin().await?;

        // One brokerage fee per (class, tutor); the unique index on the table
        // closes the race this check leaves open.
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM brokerage_payments
            WHERE class_id = $1 AND tutor_id = $2
            "#,
        )
        .bind(class_id)
        .bind(tutor_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(SqlxError::Protocol("duplicate_brokerage_fee".into()));
        }

        let payment = sqlx::query_as::<_, BrokeragePayment>(
            r#"
            INSERT INTO brokerage_payments
            (class_id, tutor_id, contract_id, fee_percentage, contract_amount,
            calculated_fee, actual_fee, due_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, class_id, tutor_id, contract_id,
                fee_percentage, contract_amount, calculated_fee, actual_fee,
                status, due_date, paid_date, notes, created_at
            "#,
        )
        .bind(class_id)
        .bind(tutor_id)
        .bind(contract_id)
        .bind(fee_percentage_bd)
        .bind(contract_amount_bd)
        .bind(calculated_fee_bd)
        .bind(actual_fee_bd)
        .bind(due_date)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(payment)
    }

    async fn get_brokerage_payment_by_id(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<BrokeragePayment>, SqlxError> {
        sqlx::query_as::<_, BrokeragePayment>(
            r#"
            SELECT
                id, class_id, tutor_id, contract_id,
                fee_percentage, contract_amount, calculated_fee, actual_fee,
                status, due_date, paid_date, notes, created_at
            FROM brokerage_payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_brokerage_payments(
        &self,
        status: Option<BrokerageStatus>,
    ) -> Result<Vec<BrokeragePayment>, SqlxError> {
        if let Some(status) = status {
            sqlx::query_as::<_, BrokeragePayment>(
                r#"
                SELECT
                    id, class_id, tutor_id, contract_id,
                    fee_percentage, contract_amount, calculated_fee, actual_fee,
                    status, due_date, paid_date, notes, created_at
                FROM brokerage_payments
                WHERE status = $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(status)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, BrokeragePayment>(
                r#"
                SELECT
                    id, class_id, tutor_id, contract_id,
                    fee_percentage, contract_amount, calculated_fee, actual_fee,
                    status, due_date, paid_date, notes, created_at
                FROM brokerage_payments
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        }
    }

    async fn get_brokerage_payments_by_tutor(
        &self,
        tutor_id: Uuid,
    ) -> Result<Vec<BrokeragePayment>, SqlxError> {
        sqlx::query_as::<_, BrokeragePayment>(
            r#"
            SELECT
                id, class_id, tutor_id, contract_id,
                fee_percentage, contract_amount, calculated_fee, actual_fee,
                status, due_date, paid_date, notes, created_at
            FROM brokerage_payments
            WHERE tutor_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_brokerage_payment(
        &self,
        payment_id: Uuid,
        actual_fee: BigDecimal,
        due_date: Option<DateTime<Utc>>,
        notes: Option<String>,
        status: BrokerageStatus,
        paid_date: Option<DateTime<Utc>>,
    ) -> Result<BrokeragePayment, SqlxError> {
        sqlx::query_as::<_, BrokeragePayment>(
            r#"
            UPDATE brokerage_payments
            SET actual_fee = $2, due_date = $3, notes = $4, status = $5, paid_date = $6
            WHERE id = $1
            RETURNING
                id, class_id, tutor_id, contract_id,
                fee_percentage, contract_amount, calculated_fee, actual_fee,
                status, due_date, paid_date, notes, created_at
            "#,
        )
        .bind(payment_id)
        .bind(actual_fee)
        .bind(due_date)
        .bind(notes)
        .bind(status)
        .bind(paid_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn upsert_staff_salary(
        &self,
        staff_id: Uuid,
        base_salary: f64,
        bonus: f64,
        deduction: f64,
        total_salary: f64,
        month: i32,
        year: i32,
        notes: Option<String>,
    ) -> Result<StaffSalary, SqlxError> {
        let base_salary_bd = BigDecimal::try_from(base_salary)
            .map_err(|_| SqlxError::Decode("Invalid base salary".into()))?;
        let bonus_bd = BigDecimal::try_from(bonus)
            .map_err(|_| SqlxError::Decode("Invalid bonus".into()))?;
        let deduction_bd = BigDecimal::try_from(deduction)
            .map_err(|_| SqlxError::Decode("Invalid deduction".into()))?;
        let total_salary_bd = BigDecimal::try_from(total_salary)
            .map_err(|_| SqlxError::Decode("Invalid total salary".into()))?;

        sqlx::query_as::<_, StaffSalary>(
            r#"
            INSERT INTO staff_salaries
            (staff_id, base_salary, bonus, deduction, total_salary, month, year, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (staff_id, month, year) DO UPDATE
            SET base_salary = EXCLUDED.base_salary,
                bonus = EXCLUDED.bonus,
                deduction = EXCLUDED.deduction,
                total_salary = EXCLUDED.total_salary,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING
                id, staff_id, base_salary, bonus, deduction, total_salary,
                month, year, status, paid_date, notes, created_at, updated_at
            "#,
        )
        .bind(staff_id)
        .bind(base_salary_bd)
        .bind(bonus_bd)
        .bind(deduction_bd)
        .bind(total_salary_bd)
        .bind(month)
        .bind(year)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_salary_by_id(&self, salary_id: Uuid) -> Result<Option<StaffSalary>, SqlxError> {
        sqlx::query_as::<_, StaffSalary>(
            r#"
            SELECT
                id, staff_id, base_salary, bonus, deduction, total_salary,
                month, year, status, paid_date, notes, created_at, updated_at
            FROM staff_salaries
            WHERE id = $1
            "#,
        )
        .bind(salary_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_staff_salaries(
        &self,
        staff_id: Option<Uuid>,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Vec<StaffSalary>, SqlxError> {
        sqlx::query_as::<_, StaffSalary>(
            r#"
            SELECT
                id, staff_id, base_salary, bonus, deduction, total_salary,
                month, year, status, paid_date, notes, created_at, updated_at
            FROM staff_salaries
            WHERE ($1::uuid IS NULL OR staff_id = $1)
            AND ($2::int IS NULL OR month = $2)
            AND ($3::int IS NULL OR year = $3)
            ORDER BY year DESC, month DESC
            "#,
        )
        .bind(staff_id)
        .bind(month)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_salary_status(
        &self,
        salary_id: Uuid,
        status: SalaryStatus,
        paid_date: Option<DateTime<Utc>>,
    ) -> Result<StaffSalary, SqlxError> {
        sqlx::query_as::<_, StaffSalary>(
            r#"
            UPDATE staff_salaries
            SET status = $2, paid_date = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, staff_id, base_salary, bonus, deduction, total_salary,
                month, year, status, paid_date, notes, created_at, updated_at
            "#,
        )
        .bind(salary_id)
        .bind(status)
        .bind(paid_date)
        .fetch_one(&self.pool)
        .await
    }
}

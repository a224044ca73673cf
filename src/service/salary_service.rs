// services/salary_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, paymentdb::PaymentExt, userdb::UserExt},
    dtos::paymentdtos::UpsertSalaryDto,
    models::{paymentmodel::*, usermodel::UserRole},
    service::error::ServiceError,
};

pub fn total_salary(base_salary: f64, bonus: f64, deduction: f64) -> f64 {
    base_salary + bonus - deduction
}

#[derive(Debug, Clone)]
pub struct SalaryService {
    db_client: Arc<DBClient>,
}

impl SalaryService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Upsert on (staff_id, month, year): a second call for the same period
    /// overwrites amounts and recomputes the total instead of adding a row.
    pub async fn create_or_update_salary(
        &self,
        body: UpsertSalaryDto,
    ) -> Result<StaffSalary, ServiceError> {
        let staff = self
            .db_client
            .get_user(Some(body.staff_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(body.staff_id))?;

        if staff.role != UserRole::Staff {
            return Err(ServiceError::Validation(format!(
                "User {} is not a staff member",
                body.staff_id
            )));
        }

        let total = total_salary(body.base_salary, body.bonus, body.deduction);

        let salary = self
            .db_client
            .upsert_staff_salary(
                body.staff_id,
                body.base_salary,
                body.bonus,
                body.deduction,
                total,
                body.month,
                body.year,
                body.notes,
            )
            .await?;

        tracing::info!(
            "salary for staff {} recorded for {}/{} (total {})",
            body.staff_id,
            body.month,
            body.year,
            total
        );

        Ok(salary)
    }

    pub async fn update_salary_status(
        &self,
        salary_id: Uuid,
        status: SalaryStatus,
    ) -> Result<StaffSalary, ServiceError> {
        self.db_client
            .get_salary_by_id(salary_id)
            .await?
            .ok_or(ServiceError::SalaryNotFound(salary_id))?;

        let paid_date = match status {
            SalaryStatus::Paid => Some(Utc::now()),
            SalaryStatus::Pending => None,
        };

        let updated = self
            .db_client
            .update_salary_status(salary_id, status, paid_date)
            .await?;

        tracing::info!("salary {} marked {:?}", salary_id, status);

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::db::DBClient;
    use sqlx::PgPool;

    #[test]
    fn test_total_salary() {
        assert_eq!(total_salary(500_000.0, 50_000.0, 20_000.0), 530_000.0);
        assert_eq!(total_salary(500_000.0, 0.0, 0.0), 500_000.0);
        assert_eq!(total_salary(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_total_salary_deduction_can_exceed_earnings() {
        assert_eq!(total_salary(100_000.0, 0.0, 150_000.0), -50_000.0);
    }

    #[tokio::test]
    async fn salary_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/tutorhub").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = SalaryService::new(db_client);

        let _ = svc.update_salary_status(Uuid::nil(), SalaryStatus::Paid);
    }
}

use crate::models::usermodel::UserRole;

/// Every mutating operation exposed by the API. Authorization is decided
/// once, centrally, from this table; handlers only add ownership checks
/// (a customer acting on their own class, a tutor on their own application).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateClass,
    ApproveClass,
    RejectClass,
    CompleteClass,
    DeleteClass,
    SubmitApplication,
    ApproveApplication,
    RejectApplication,
    CreateContract,
    UpdateContract,
    CreatePayment,
    UpdatePayment,
    ViewPayments,
    ManageSettings,
    ManageSalaries,
    ManageUsers,
}

pub fn is_allowed(role: UserRole, action: Action) -> bool {
    match action {
        Action::CreateClass => matches!(role, UserRole::Customer),

        Action::SubmitApplication => matches!(role, UserRole::Tutor),

        Action::ApproveClass
        | Action::RejectClass
        | Action::CompleteClass
        | Action::DeleteClass
        | Action::ApproveApplication
        | Action::RejectApplication
        | Action::CreateContract
        | Action::UpdateContract => matches!(role, UserRole::Admin | UserRole::Staff),

        Action::CreatePayment
        | Action::UpdatePayment
        | Action::ViewPayments
        | Action::ManageSettings
        | Action::ManageSalaries
        | Action::ManageUsers => matches!(role, UserRole::Admin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_capabilities() {
        assert!(is_allowed(UserRole::Customer, Action::CreateClass));
        assert!(!is_allowed(UserRole::Customer, Action::ApproveClass));
        assert!(!is_allowed(UserRole::Customer, Action::SubmitApplication));
        assert!(!is_allowed(UserRole::Customer, Action::CreatePayment));
    }

    #[test]
    fn test_tutor_capabilities() {
        assert!(is_allowed(UserRole::Tutor, Action::SubmitApplication));
        assert!(!is_allowed(UserRole::Tutor, Action::CreateClass));
        assert!(!is_allowed(UserRole::Tutor, Action::ApproveApplication));
        assert!(!is_allowed(UserRole::Tutor, Action::ManageSettings));
    }

    #[test]
    fn test_staff_capabilities() {
        assert!(is_allowed(UserRole::Staff, Action::ApproveClass));
        assert!(is_allowed(UserRole::Staff, Action::RejectClass));
        assert!(is_allowed(UserRole::Staff, Action::DeleteClass));
        assert!(is_allowed(UserRole::Staff, Action::ApproveApplication));
        assert!(is_allowed(UserRole::Staff, Action::CreateContract));

        // Payments, settings and salaries stay admin-only
        assert!(!is_allowed(UserRole::Staff, Action::CreatePayment));
        assert!(!is_allowed(UserRole::Staff, Action::UpdatePayment));
        assert!(!is_allowed(UserRole::Staff, Action::ManageSettings));
        assert!(!is_allowed(UserRole::Staff, Action::ManageSalaries));
    }

    #[test]
    fn test_admin_capabilities() {
        assert!(is_allowed(UserRole::Admin, Action::ApproveClass));
        assert!(is_allowed(UserRole::Admin, Action::CreateContract));
        assert!(is_allowed(UserRole::Admin, Action::CreatePayment));
        assert!(is_allowed(UserRole::Admin, Action::ManageSettings));
        assert!(is_allowed(UserRole::Admin, Action::ManageSalaries));
        assert!(is_allowed(UserRole::Admin, Action::ManageUsers));

        // Admins review classes but do not post them
        assert!(!is_allowed(UserRole::Admin, Action::CreateClass));
        assert!(!is_allowed(UserRole::Admin, Action::SubmitApplication));
    }
}

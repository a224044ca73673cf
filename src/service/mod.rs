pub mod class_service;
pub mod contract_service;
pub mod error;
pub mod payment_service;
pub mod salary_service;

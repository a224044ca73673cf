pub mod classdb;
pub mod db;
pub mod paymentdb;
pub mod userdb;

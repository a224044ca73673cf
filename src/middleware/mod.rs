pub mod main_middleware;
pub mod permissions;

pub use main_middleware::{auth, permission_check, JWTAuthMiddeware};
pub use permissions::Action;

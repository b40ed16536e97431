pub mod auth_service;
pub mod jwt_service;

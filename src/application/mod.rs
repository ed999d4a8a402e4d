// Application layer - Use cases and repository contracts
pub mod auth_service;
pub mod error;
pub mod geocode_service;
pub mod route_repository;
pub mod route_service;
pub mod user_repository;

// Domain layer - Route analytics models and computation
pub mod comparison;
pub mod error;
pub mod geo;
pub mod metrics;
pub mod route;
pub mod sample;
pub mod user;

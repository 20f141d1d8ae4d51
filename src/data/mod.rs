pub mod payment_repository;
pub mod user_repository;

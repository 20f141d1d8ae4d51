pub mod error;
pub mod page;
pub mod payment;
pub mod repository;
pub mod user;
pub mod validation;

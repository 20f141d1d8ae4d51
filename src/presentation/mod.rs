pub mod auth;
pub mod handlers;
pub mod links;
pub mod middleware;

//! REST API layer

pub mod agent;
pub mod auth;
pub mod client;
pub mod creditor;
pub mod document;
pub mod error;
pub mod financial;
pub mod health;
pub mod openapi;

pub use error::ApiError;

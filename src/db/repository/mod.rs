//! Repositories for database operations

mod agent;
mod client;
mod creditor;
mod document;

pub use agent::AgentRepository;
pub use client::ClientRepository;
pub use creditor::CreditorRepository;
pub use document::DocumentRepository;

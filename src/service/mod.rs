pub mod agent;
pub mod auth;
pub mod client;
pub mod creditor;
pub mod document;
pub mod garnishment;
pub mod settlement;

pub use agent::{AgentError, AgentService};
pub use auth::{AuthError, TokenService};
pub use client::{ClientError, ClientService};
pub use creditor::{CreditorError, CreditorService};
pub use document::{DocumentError, DocumentService};
pub use garnishment::GarnishmentError;
pub use settlement::{SettlementError, SettlementService};

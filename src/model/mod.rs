pub mod agent;
pub mod client;
pub mod config;
pub mod creditor;
pub mod document;
pub mod plan;

pub use agent::{Agent, AgentRole};
pub use client::{Client, FinancialData, MaritalStatus, StatusHistoryEntry, WorkflowStatus};
pub use config::{Config, SettlementConfig};
pub use creditor::{AmountSource, Creditor, CreditorStatus};
pub use document::{Classification, Document, ExtractedCreditor, ProcessingStatus};
pub use plan::{PlanRow, PlanType, SettlementPlan};

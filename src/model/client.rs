//! Client case file domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::plan::{PlanType, SettlementPlan};

/// Case progress states a client moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Created,
    PortalAccessSent,
    DocumentUpload,
    Processing,
    AdminReview,
    ClientConfirmation,
    CreditorContact,
    ManualReview,
    Problem,
    Completed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Created => "created",
            WorkflowStatus::PortalAccessSent => "portal_access_sent",
            WorkflowStatus::DocumentUpload => "document_upload",
            WorkflowStatus::Processing => "processing",
            WorkflowStatus::AdminReview => "admin_review",
            WorkflowStatus::ClientConfirmation => "client_confirmation",
            WorkflowStatus::CreditorContact => "creditor_contact",
            WorkflowStatus::ManualReview => "manual_review",
            WorkflowStatus::Problem => "problem",
            WorkflowStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(WorkflowStatus::Created),
            "portal_access_sent" => Some(WorkflowStatus::PortalAccessSent),
            "document_upload" => Some(WorkflowStatus::DocumentUpload),
            "processing" => Some(WorkflowStatus::Processing),
            "admin_review" => Some(WorkflowStatus::AdminReview),
            "client_confirmation" => Some(WorkflowStatus::ClientConfirmation),
            "creditor_contact" => Some(WorkflowStatus::CreditorContact),
            "manual_review" => Some(WorkflowStatus::ManualReview),
            "problem" => Some(WorkflowStatus::Problem),
            "completed" => Some(WorkflowStatus::Completed),
            _ => None,
        }
    }
}

/// Marital status per the German garnishment table terminology.
///
/// An unrecognized value is rejected at the input boundary, never
/// silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Ledig,
    Verheiratet,
    Geschieden,
    Verwitwet,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Ledig => "ledig",
            MaritalStatus::Verheiratet => "verheiratet",
            MaritalStatus::Geschieden => "geschieden",
            MaritalStatus::Verwitwet => "verwitwet",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ledig" => Some(MaritalStatus::Ledig),
            "verheiratet" => Some(MaritalStatus::Verheiratet),
            "geschieden" => Some(MaritalStatus::Geschieden),
            "verwitwet" => Some(MaritalStatus::Verwitwet),
            _ => None,
        }
    }
}

/// Manually entered income situation plus the derived garnishable amount
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinancialData {
    pub monthly_net_income: f64,
    pub marital_status: MaritalStatus,
    pub number_of_children: u32,
    /// Pfändbar amount per ZPO §850c
    pub garnishable_amount: f64,
    pub recommended_plan_type: PlanType,
    pub calculated_at: DateTime<Utc>,
}

/// Audit trail entry appended on every status transition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    pub id: String,
    pub status: String,
    pub changed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A client case file (Mandant)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Client {
    pub id: String,
    /// Case reference number, unique per client
    pub aktenzeichen: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub workflow_status: WorkflowStatus,
    pub first_payment_received: bool,
    pub financial_data: Option<FinancialData>,
    pub settlement_plan: Option<SettlementPlan>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_status_round_trip() {
        for status in [
            WorkflowStatus::Created,
            WorkflowStatus::PortalAccessSent,
            WorkflowStatus::DocumentUpload,
            WorkflowStatus::Processing,
            WorkflowStatus::AdminReview,
            WorkflowStatus::ClientConfirmation,
            WorkflowStatus::CreditorContact,
            WorkflowStatus::ManualReview,
            WorkflowStatus::Problem,
            WorkflowStatus::Completed,
        ] {
            assert_eq!(WorkflowStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn marital_status_rejects_unknown() {
        assert_eq!(MaritalStatus::parse("ledig"), Some(MaritalStatus::Ledig));
        assert_eq!(MaritalStatus::parse("single"), None);
        assert_eq!(MaritalStatus::parse(""), None);
        assert_eq!(MaritalStatus::parse("Ledig"), None);
    }
}

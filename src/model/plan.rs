//! Settlement plan (Schuldenbereinigungsplan) domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::creditor::{AmountSource, CreditorStatus};

/// Plan variant: proportional distribution, or a Nullplan when the
/// garnishable income is below the distribution threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Quotenplan,
    Nullplan,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Quotenplan => "quotenplan",
            PlanType::Nullplan => "nullplan",
        }
    }
}

/// Per-creditor allocation row of a settlement plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlanRow {
    pub creditor_id: String,
    pub creditor_name: String,
    /// Effective claim amount the allocation is based on
    pub amount: f64,
    /// Share of total debt, in percent rounded to two decimals
    pub percentage: f64,
    /// Monthly payment to this creditor, rounded to the cent
    pub monthly_quota: f64,
    pub amount_source: AmountSource,
    pub contact_status: CreditorStatus,
}

/// Generated settlement plan, immutable until explicitly re-generated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettlementPlan {
    pub plan_type: PlanType,
    pub total_debt: f64,
    /// Garnishable monthly amount distributed across the rows
    pub monthly_rate: f64,
    pub rows: Vec<PlanRow>,
    pub status: String,
    pub generated_by: String,
    pub generated_at: DateTime<Utc>,
}

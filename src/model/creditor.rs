//! Creditor (Gläubiger) domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where the effective claim amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    /// Extracted from an uploaded document
    Extracted,
    /// Entered by an admin
    ManualEntry,
    /// Confirmed by the creditor in a response
    CreditorResponse,
    /// No amount available, fallback value in use
    Fallback,
}

impl AmountSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountSource::Extracted => "extracted",
            AmountSource::ManualEntry => "manual_entry",
            AmountSource::CreditorResponse => "creditor_response",
            AmountSource::Fallback => "fallback",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "extracted" => Some(AmountSource::Extracted),
            "manual_entry" => Some(AmountSource::ManualEntry),
            "creditor_response" => Some(AmountSource::CreditorResponse),
            "fallback" => Some(AmountSource::Fallback),
            _ => None,
        }
    }
}

/// Response-tracking state of a creditor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CreditorStatus {
    Pending,
    Confirmed,
    Responded,
    NoResponse,
}

impl CreditorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditorStatus::Pending => "pending",
            CreditorStatus::Confirmed => "confirmed",
            CreditorStatus::Responded => "responded",
            CreditorStatus::NoResponse => "no_response",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CreditorStatus::Pending),
            "confirmed" => Some(CreditorStatus::Confirmed),
            "responded" => Some(CreditorStatus::Responded),
            "no_response" => Some(CreditorStatus::NoResponse),
            _ => None,
        }
    }
}

/// A creditor claim belonging to exactly one client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Creditor {
    pub id: String,
    pub client_id: String,
    pub sender_name: String,
    pub sender_address: Option<String>,
    pub sender_email: Option<String>,
    pub reference_number: Option<String>,
    /// Claim amount as initially recorded
    pub claim_amount: f64,
    /// Amount confirmed by the creditor's response, when received
    pub current_debt_amount: Option<f64>,
    pub amount_source: AmountSource,
    pub status: CreditorStatus,
    pub is_representative: bool,
    pub actual_creditor: Option<String>,
    /// Document this creditor was derived from, if any
    pub source_document_id: Option<String>,
    pub response_text: Option<String>,
    pub response_received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creditor {
    /// The amount used for settlement arithmetic: the creditor-confirmed
    /// amount when present, otherwise the recorded claim amount.
    pub fn effective_amount(&self) -> f64 {
        self.current_debt_amount.unwrap_or(self.claim_amount)
    }
}

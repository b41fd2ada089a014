//! Settlement plan generation and distribution arithmetic
//!
//! The distribution itself is a pure proportional allocation: each creditor
//! receives `claim / total_debt` of the garnishable monthly pool. The service
//! wraps it with persistence and the restructuring analysis.

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::repository::{ClientRepository, CreditorRepository};
use crate::db::DbError;
use crate::model::{Client, Creditor, FinancialData, PlanRow, PlanType, SettlementPlan};
use crate::service::garnishment::{self, round_cents, GarnishmentError, GarnishmentResult};

#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    Garnishment(#[from] GarnishmentError),

    #[error("client has no creditors to distribute over")]
    NoCreditors,

    #[error("no financial data on file for client")]
    MissingFinancialData,
}

/// Distribute a garnishable monthly amount proportionally across creditors.
///
/// Pure and idempotent. Rows are sorted by effective amount descending with
/// the creditor name as tie-break, giving a stable display order. A zero
/// total debt or zero pool yields zero percentages/quotas rather than a
/// division fault; an empty creditor list yields an empty plan.
pub fn distribute(creditors: &[Creditor], garnishable_amount: f64) -> Vec<PlanRow> {
    let total_debt: f64 = creditors.iter().map(|c| c.effective_amount()).sum();

    let mut rows: Vec<PlanRow> = creditors
        .iter()
        .map(|creditor| {
            let amount = creditor.effective_amount();
            let share = if total_debt > 0.0 { amount / total_debt } else { 0.0 };

            PlanRow {
                creditor_id: creditor.id.clone(),
                creditor_name: creditor.sender_name.clone(),
                amount,
                percentage: round_cents(share * 100.0),
                monthly_quota: round_cents(garnishable_amount * share),
                amount_source: creditor.amount_source,
                contact_status: creditor.status,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.creditor_name.cmp(&b.creditor_name))
    });

    rows
}

/// Plan generation needs at least one creditor; distributing a nonzero
/// pool over nobody is ambiguous and the caller must fix the list first
fn require_creditors(creditors: &[Creditor]) -> Result<(), SettlementError> {
    if creditors.is_empty() {
        return Err(SettlementError::NoCreditors);
    }
    Ok(())
}

/// Build a settlement plan from creditors and financial data
pub fn build_plan(
    creditors: &[Creditor],
    financial: &FinancialData,
    quotenplan_threshold: f64,
    generated_by: &str,
) -> SettlementPlan {
    let garnishable = financial.garnishable_amount;
    let plan_type = if garnishable >= quotenplan_threshold {
        PlanType::Quotenplan
    } else {
        PlanType::Nullplan
    };

    // A Nullplan offers creditors no monetary distribution
    let monthly_rate = match plan_type {
        PlanType::Quotenplan => garnishable,
        PlanType::Nullplan => 0.0,
    };

    let rows = distribute(creditors, monthly_rate);
    let total_debt = round_cents(creditors.iter().map(|c| c.effective_amount()).sum());

    SettlementPlan {
        plan_type,
        total_debt,
        monthly_rate,
        rows,
        status: "draft".to_string(),
        generated_by: generated_by.to_string(),
        generated_at: Utc::now(),
    }
}

/// Payment projections over the standard 36-month plan horizon
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Projections {
    pub monthly_payment: f64,
    pub annual_payment: f64,
    pub total_36_months: f64,
    /// Share of total debt covered after 36 months, in percent
    pub debt_coverage_36_months: f64,
}

/// Consistency checks over a generated distribution
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QualityChecks {
    /// Quotas sum to the monthly rate within 10 cents
    pub quotas_sum_correct: bool,
    pub all_creditors_have_quotas: bool,
    /// Garnishment below half of net income
    pub reasonable_garnishment_rate: bool,
}

/// Combined garnishment and distribution analysis for a client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestructuringAnalysis {
    pub client_id: String,
    pub aktenzeichen: String,
    pub garnishment: GarnishmentResult,
    pub total_debt: f64,
    pub creditor_count: usize,
    pub rows: Vec<PlanRow>,
    pub projections: Projections,
    pub quality_checks: QualityChecks,
}

/// Financial input for garnishment calculation, taken with a raw marital
/// status string so unknown values surface as validation errors
#[derive(Debug, Clone)]
pub struct FinancialInput {
    pub monthly_net_income: f64,
    pub marital_status: String,
    pub number_of_children: u32,
}

/// Service generating settlement plans and analyses for clients
pub struct SettlementService {
    clients: ClientRepository,
    creditors: CreditorRepository,
    quotenplan_threshold: f64,
}

impl SettlementService {
    pub fn new(
        clients: ClientRepository,
        creditors: CreditorRepository,
        quotenplan_threshold: f64,
    ) -> Self {
        Self {
            clients,
            creditors,
            quotenplan_threshold,
        }
    }

    /// Calculate garnishable income and persist it as the client's
    /// financial data
    pub async fn save_financial_data(
        &self,
        client_ref: &str,
        input: FinancialInput,
    ) -> Result<(Client, GarnishmentResult), SettlementError> {
        let client = self.clients.get(client_ref).await?;

        let result = garnishment::calculate(
            input.monthly_net_income,
            &input.marital_status,
            input.number_of_children,
        )?;

        let recommended_plan_type = if result.garnishable_amount >= self.quotenplan_threshold {
            PlanType::Quotenplan
        } else {
            PlanType::Nullplan
        };

        let financial = FinancialData {
            monthly_net_income: result.net_income,
            marital_status: result.marital_status,
            number_of_children: result.number_of_children,
            garnishable_amount: result.garnishable_amount,
            recommended_plan_type,
            calculated_at: Utc::now(),
        };

        self.clients.set_financial_data(&client.id, &financial).await?;

        tracing::info!(
            client_id = %client.id,
            aktenzeichen = %client.aktenzeichen,
            garnishable = result.garnishable_amount,
            plan_type = recommended_plan_type.as_str(),
            "Saved financial data"
        );

        let mut client = client;
        client.financial_data = Some(financial);
        Ok((client, result))
    }

    /// Generate and persist a settlement plan for a client.
    ///
    /// Replaces any previously generated plan; callers trigger this
    /// explicitly.
    pub async fn generate_plan(
        &self,
        client_ref: &str,
        generated_by: &str,
    ) -> Result<SettlementPlan, SettlementError> {
        let client = self.clients.get(client_ref).await?;

        let financial = client
            .financial_data
            .as_ref()
            .ok_or(SettlementError::MissingFinancialData)?;

        let creditors = self.creditors.list_by_client(&client.id).await?;
        require_creditors(&creditors)?;

        let plan = build_plan(&creditors, financial, self.quotenplan_threshold, generated_by);
        self.clients.set_settlement_plan(&client.id, &plan).await?;

        tracing::info!(
            client_id = %client.id,
            aktenzeichen = %client.aktenzeichen,
            plan_type = plan.plan_type.as_str(),
            total_debt = plan.total_debt,
            monthly_rate = plan.monthly_rate,
            creditors = plan.rows.len(),
            "Settlement plan generated"
        );

        Ok(plan)
    }

    /// Full restructuring analysis: garnishment, distribution and 36-month
    /// projections. Does not persist anything.
    ///
    /// Financial input overrides the stored financial data when provided.
    pub async fn analysis(
        &self,
        client_ref: &str,
        input: Option<FinancialInput>,
    ) -> Result<RestructuringAnalysis, SettlementError> {
        let client = self.clients.get(client_ref).await?;

        let input = match input {
            Some(input) => input,
            None => {
                let financial = client
                    .financial_data
                    .as_ref()
                    .ok_or(SettlementError::MissingFinancialData)?;
                FinancialInput {
                    monthly_net_income: financial.monthly_net_income,
                    marital_status: financial.marital_status.as_str().to_string(),
                    number_of_children: financial.number_of_children,
                }
            }
        };

        let garnishment = garnishment::calculate(
            input.monthly_net_income,
            &input.marital_status,
            input.number_of_children,
        )?;

        let creditors = self.creditors.list_by_client(&client.id).await?;
        require_creditors(&creditors)?;

        let rows = distribute(&creditors, garnishment.garnishable_amount);
        let total_debt = round_cents(creditors.iter().map(|c| c.effective_amount()).sum());

        let monthly = garnishment.garnishable_amount;
        let projections = Projections {
            monthly_payment: monthly,
            annual_payment: round_cents(monthly * 12.0),
            total_36_months: round_cents(monthly * 36.0),
            debt_coverage_36_months: if total_debt > 0.0 {
                round_cents(monthly * 36.0 / total_debt * 100.0)
            } else {
                0.0
            },
        };

        let quota_sum: f64 = rows.iter().map(|r| r.monthly_quota).sum();
        let quality_checks = QualityChecks {
            quotas_sum_correct: (quota_sum - monthly).abs() < 0.10,
            all_creditors_have_quotas: rows.iter().all(|r| r.monthly_quota > 0.0),
            reasonable_garnishment_rate: garnishment.garnishment_rate <= 50.0,
        };

        Ok(RestructuringAnalysis {
            client_id: client.id,
            aktenzeichen: client.aktenzeichen,
            garnishment,
            total_debt,
            creditor_count: creditors.len(),
            rows,
            projections,
            quality_checks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AmountSource, CreditorStatus, MaritalStatus};

    fn creditor(id: &str, name: &str, amount: f64) -> Creditor {
        Creditor {
            id: id.to_string(),
            client_id: "client-1".to_string(),
            sender_name: name.to_string(),
            sender_address: None,
            sender_email: None,
            reference_number: None,
            claim_amount: amount,
            current_debt_amount: None,
            amount_source: AmountSource::ManualEntry,
            status: CreditorStatus::Confirmed,
            is_representative: false,
            actual_creditor: None,
            source_document_id: None,
            response_text: None,
            response_received_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn financial(garnishable: f64) -> FinancialData {
        FinancialData {
            monthly_net_income: 2500.0,
            marital_status: MaritalStatus::Ledig,
            number_of_children: 0,
            garnishable_amount: garnishable,
            recommended_plan_type: PlanType::Quotenplan,
            calculated_at: Utc::now(),
        }
    }

    #[test]
    fn proportional_allocation() {
        let creditors = vec![creditor("a", "A", 1000.0), creditor("b", "B", 3000.0)];
        let rows = distribute(&creditors, 100.0);

        assert_eq!(rows.len(), 2);
        // Sorted by amount descending
        assert_eq!(rows[0].creditor_name, "B");
        assert_eq!(rows[0].percentage, 75.0);
        assert_eq!(rows[0].monthly_quota, 75.0);
        assert_eq!(rows[1].creditor_name, "A");
        assert_eq!(rows[1].percentage, 25.0);
        assert_eq!(rows[1].monthly_quota, 25.0);
    }

    #[test]
    fn empty_creditor_list_yields_empty_plan() {
        let rows = distribute(&[], 100.0);
        assert!(rows.is_empty());
    }

    #[test]
    fn zero_total_debt_yields_zero_quotas() {
        let creditors = vec![creditor("a", "A", 0.0)];
        let rows = distribute(&creditors, 100.0);
        assert_eq!(rows[0].percentage, 0.0);
        assert_eq!(rows[0].monthly_quota, 0.0);
    }

    #[test]
    fn zero_pool_yields_zero_quotas() {
        let creditors = vec![creditor("a", "A", 500.0), creditor("b", "B", 500.0)];
        let rows = distribute(&creditors, 0.0);
        assert!(rows.iter().all(|r| r.monthly_quota == 0.0));
        // Percentages still reflect the debt shares
        assert!(rows.iter().all(|r| r.percentage == 50.0));
    }

    #[test]
    fn percentages_and_quotas_sum_within_tolerance() {
        let creditors = vec![
            creditor("a", "Sparkasse", 1234.56),
            creditor("b", "Telekom", 89.99),
            creditor("c", "Inkasso Meyer", 4500.01),
            creditor("d", "Stadtwerke", 333.33),
        ];
        let garnishable = 412.37;
        let rows = distribute(&creditors, garnishable);

        let pct_sum: f64 = rows.iter().map(|r| r.percentage).sum();
        let quota_sum: f64 = rows.iter().map(|r| r.monthly_quota).sum();

        assert!((pct_sum - 100.0).abs() < 0.05, "percentages sum to {pct_sum}");
        assert!((quota_sum - garnishable).abs() < 0.10, "quotas sum to {quota_sum}");
    }

    #[test]
    fn distribution_is_deterministic() {
        let creditors = vec![
            creditor("a", "A", 700.0),
            creditor("b", "B", 700.0),
            creditor("c", "C", 100.0),
        ];
        let first = distribute(&creditors, 250.0);
        let second = distribute(&creditors, 250.0);
        assert_eq!(first, second);
        // Equal amounts fall back to name ordering
        assert_eq!(first[0].creditor_name, "A");
        assert_eq!(first[1].creditor_name, "B");
    }

    #[test]
    fn response_amount_overrides_claim() {
        let mut c = creditor("a", "A", 1000.0);
        c.current_debt_amount = Some(250.0);
        let rows = distribute(&[c, creditor("b", "B", 750.0)], 100.0);

        assert_eq!(rows[0].creditor_name, "B");
        assert_eq!(rows[0].percentage, 75.0);
        assert_eq!(rows[1].amount, 250.0);
    }

    #[test]
    fn quotenplan_above_threshold() {
        let creditors = vec![creditor("a", "A", 1000.0)];
        let plan = build_plan(&creditors, &financial(661.50), 10.0, "admin");
        assert_eq!(plan.plan_type, PlanType::Quotenplan);
        assert_eq!(plan.monthly_rate, 661.50);
        assert_eq!(plan.rows[0].monthly_quota, 661.50);
    }

    #[test]
    fn plan_generation_rejects_empty_creditor_list() {
        assert!(matches!(
            require_creditors(&[]),
            Err(SettlementError::NoCreditors)
        ));
        assert!(require_creditors(&[creditor("a", "A", 100.0)]).is_ok());
    }

    #[test]
    fn nullplan_below_threshold() {
        let creditors = vec![creditor("a", "A", 1000.0), creditor("b", "B", 3000.0)];
        let plan = build_plan(&creditors, &financial(5.0), 10.0, "admin");
        assert_eq!(plan.plan_type, PlanType::Nullplan);
        assert_eq!(plan.monthly_rate, 0.0);
        assert_eq!(plan.total_debt, 4000.0);
        // Rows keep their debt shares but distribute nothing
        assert!(plan.rows.iter().all(|r| r.monthly_quota == 0.0));
        assert_eq!(plan.rows[0].percentage, 75.0);
    }
}

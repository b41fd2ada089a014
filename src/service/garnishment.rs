//! Garnishable income calculation per ZPO §850c
//!
//! Implements the 2025-2026 Pfändungstabelle (valid 2025-07-01 through
//! 2026-06-30). The statutory table is bracketed in 10 EUR income steps;
//! within each dependent column the garnishable amount grows linearly per
//! bracket, so the table is encoded as one band per dependent count instead
//! of the full row list.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::MaritalStatus;

/// Width of one income bracket in the statutory table
const BRACKET_WIDTH: f64 = 10.0;

/// Highest income covered by the table; everything above is fully garnishable
const TABLE_CAP: f64 = 4766.99;

/// Linear band of the statutory table for one dependent count
struct DependentBand {
    /// Income strictly below this is fully protected
    protected_below: f64,
    /// Garnishable amount of the first non-zero bracket
    first_amount: f64,
    /// Increase per 10 EUR bracket
    step: f64,
}

/// One band per dependent count 0..=5; six or more dependents use the last
const BANDS: [DependentBand; 6] = [
    DependentBand { protected_below: 1560.0, first_amount: 3.50, step: 7.00 },
    DependentBand { protected_below: 2150.0, first_amount: 4.89, step: 5.00 },
    DependentBand { protected_below: 2470.0, first_amount: 1.49, step: 4.00 },
    DependentBand { protected_below: 2800.0, first_amount: 2.31, step: 3.00 },
    DependentBand { protected_below: 3120.0, first_amount: 0.33, step: 2.00 },
    DependentBand { protected_below: 3450.0, first_amount: 0.56, step: 1.00 },
];

#[derive(Debug, thiserror::Error)]
pub enum GarnishmentError {
    #[error("net income cannot be negative")]
    NegativeIncome,

    #[error("unknown marital status: {0}")]
    UnknownMaritalStatus(String),
}

/// Result of a garnishable income calculation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GarnishmentResult {
    pub net_income: f64,
    pub marital_status: MaritalStatus,
    pub number_of_children: u32,
    /// Children plus spouse for married clients; drives the table lookup
    pub total_dependents: u32,
    pub garnishable_amount: f64,
    pub remaining_income: f64,
    /// Garnished share of net income, in percent
    pub garnishment_rate: f64,
}

/// Round half-up to the cent
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Statutory garnishable amount for a net income and dependent count.
///
/// Returns the raw table value: zero below the protected floor, the full
/// income above the table cap.
fn table_amount(net_income: f64, dependents: u32) -> f64 {
    let band = &BANDS[dependents.min(5) as usize];

    if net_income > TABLE_CAP {
        return net_income;
    }
    if net_income < band.protected_below {
        return 0.0;
    }

    let steps = ((net_income - band.protected_below) / BRACKET_WIDTH).floor();
    band.first_amount + band.step * steps
}

/// Calculate the garnishable monthly income.
///
/// The marital status is taken as a raw string so that an unrecognized value
/// is rejected as a validation error rather than silently defaulted. Married
/// clients count their spouse as one additional dependent.
pub fn calculate(
    net_income: f64,
    marital_status: &str,
    number_of_children: u32,
) -> Result<GarnishmentResult, GarnishmentError> {
    if net_income < 0.0 || !net_income.is_finite() {
        return Err(GarnishmentError::NegativeIncome);
    }

    let marital_status = MaritalStatus::parse(marital_status)
        .ok_or_else(|| GarnishmentError::UnknownMaritalStatus(marital_status.to_string()))?;

    let mut total_dependents = number_of_children;
    if marital_status == MaritalStatus::Verheiratet {
        total_dependents += 1;
    }

    let raw = table_amount(net_income, total_dependents);

    // Never garnish more than the actual net income
    let garnishable_amount = round_cents(raw.min(net_income));

    let garnishment_rate = if net_income > 0.0 {
        garnishable_amount / net_income * 100.0
    } else {
        0.0
    };

    tracing::debug!(
        net_income,
        marital_status = marital_status.as_str(),
        total_dependents,
        garnishable_amount,
        "Calculated garnishable income"
    );

    Ok(GarnishmentResult {
        net_income,
        marital_status,
        number_of_children,
        total_dependents,
        garnishable_amount,
        remaining_income: round_cents(net_income - garnishable_amount),
        garnishment_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_protected_minimum_is_zero() {
        let result = calculate(1500.0, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 0.0);

        let result = calculate(1559.99, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 0.0);
    }

    #[test]
    fn first_bracket_single_no_children() {
        let result = calculate(1560.0, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 3.50);

        let result = calculate(1569.99, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 3.50);

        let result = calculate(1570.0, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 10.50);
    }

    #[test]
    fn pinned_statutory_value_2500_single() {
        // 2500.00 falls into the 2500.00-2509.99 bracket of the 2025-2026 table
        let result = calculate(2500.0, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 661.50);
    }

    #[test]
    fn married_spouse_counts_as_dependent() {
        // 3000.00 with two dependents (spouse + one child) -> 213.49
        let result = calculate(3000.0, "verheiratet", 1).unwrap();
        assert_eq!(result.total_dependents, 2);
        assert_eq!(result.garnishable_amount, 213.49);
    }

    #[test]
    fn single_parent_two_children() {
        let result = calculate(3500.0, "ledig", 2).unwrap();
        assert_eq!(result.garnishable_amount, 413.49);
    }

    #[test]
    fn above_cap_fully_garnishable() {
        let result = calculate(5000.0, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 5000.0);
        assert_eq!(result.remaining_income, 0.0);
    }

    #[test]
    fn top_bracket_boundary() {
        let result = calculate(4766.99, "ledig", 0).unwrap();
        assert_eq!(result.garnishable_amount, 2243.50);
    }

    #[test]
    fn many_dependents_clamp_to_last_band() {
        let five = calculate(4000.0, "ledig", 5).unwrap();
        let eight = calculate(4000.0, "ledig", 8).unwrap();
        assert_eq!(five.garnishable_amount, eight.garnishable_amount);
    }

    #[test]
    fn garnishable_never_exceeds_net_income() {
        for income in [0.0, 100.0, 1559.99, 1560.0, 2500.0, 4766.99, 4767.0, 9000.0] {
            for children in 0..6 {
                let result = calculate(income, "geschieden", children).unwrap();
                assert!(result.garnishable_amount >= 0.0);
                assert!(result.garnishable_amount <= income + 1e-9);
            }
        }
    }

    #[test]
    fn monotone_in_income() {
        for children in 0..4 {
            let mut previous = 0.0;
            let mut income = 1000.0;
            while income < 6000.0 {
                let result = calculate(income, "verwitwet", children).unwrap();
                assert!(
                    result.garnishable_amount + 1e-9 >= previous,
                    "decreased at income {income} with {children} children"
                );
                previous = result.garnishable_amount;
                income += 10.0;
            }
        }
    }

    #[test]
    fn monotone_in_dependents() {
        for income in [1600.0, 2500.0, 3333.33, 4500.0] {
            let mut previous = f64::MAX;
            for children in 0..7 {
                let result = calculate(income, "ledig", children).unwrap();
                assert!(
                    result.garnishable_amount <= previous + 1e-9,
                    "increased at {children} children for income {income}"
                );
                previous = result.garnishable_amount;
            }
        }
    }

    #[test]
    fn rejects_negative_income() {
        assert!(matches!(
            calculate(-1.0, "ledig", 0),
            Err(GarnishmentError::NegativeIncome)
        ));
    }

    #[test]
    fn rejects_unknown_marital_status() {
        let err = calculate(2000.0, "divorced", 0).unwrap_err();
        assert!(matches!(err, GarnishmentError::UnknownMaritalStatus(_)));
    }
}

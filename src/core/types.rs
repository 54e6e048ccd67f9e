use serde::Serialize;

use super::error::ProjectionError;

/// Largest number of owners a purchase can be split between.
pub const MAX_CO_OWNERS: u32 = 2;

/// Longest projection, and so mortgage term, the engine accepts.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Every ratio is a fraction (`0.035` for 3.5%), every amount is in currency units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    pub home_price: f64,
    pub down_payment_pct: f64,
    pub annual_interest_rate: f64,
    pub monthly_rent: f64,
    pub rent_inflation_rate: f64,
    pub home_appreciation_rate: f64,
    pub annual_ownership_costs: f64,
    pub purchase_closing_costs: f64,
    pub alt_investment_return_rate: f64,
    pub rent_tax_deduction_annual: f64,
    pub horizon_years: u32,
    pub co_owners: u32,
}

impl ScenarioParameters {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        require_positive("home_price", self.home_price)?;
        require_positive("monthly_rent", self.monthly_rent)?;

        if !self.down_payment_pct.is_finite() || !(0.0..=1.0).contains(&self.down_payment_pct) {
            return Err(ProjectionError::invalid(
                "down_payment_pct",
                format!("must be between 0 and 1, got {}", self.down_payment_pct),
            ));
        }

        for (name, value) in [
            ("annual_interest_rate", self.annual_interest_rate),
            ("rent_inflation_rate", self.rent_inflation_rate),
            ("home_appreciation_rate", self.home_appreciation_rate),
            ("alt_investment_return_rate", self.alt_investment_return_rate),
            ("annual_ownership_costs", self.annual_ownership_costs),
            ("purchase_closing_costs", self.purchase_closing_costs),
            ("rent_tax_deduction_annual", self.rent_tax_deduction_annual),
        ] {
            require_non_negative(name, value)?;
        }

        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ProjectionError::invalid(
                "horizon_years",
                format!(
                    "must be at most {MAX_HORIZON_YEARS}, got {}",
                    self.horizon_years
                ),
            ));
        }

        if !(1..=MAX_CO_OWNERS).contains(&self.co_owners) {
            return Err(ProjectionError::invalid(
                "co_owners",
                format!(
                    "must be between 1 and {MAX_CO_OWNERS}, got {}",
                    self.co_owners
                ),
            ));
        }

        Ok(())
    }

    pub fn down_payment(&self) -> f64 {
        self.home_price * self.down_payment_pct
    }

    pub fn principal(&self) -> f64 {
        self.home_price * (1.0 - self.down_payment_pct)
    }

    pub fn owner_share(&self, amount: f64) -> f64 {
        amount / f64::from(self.co_owners)
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ProjectionError::invalid(
            name,
            format!("must be a finite value > 0, got {value}"),
        ));
    }
    Ok(())
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ProjectionError::invalid(
            name,
            format!("must be a finite value >= 0, got {value}"),
        ));
    }
    Ok(())
}

/// One year of a fixed-rate mortgage, in whole-loan terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationYear {
    pub year: u32,
    pub payments: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub end_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    pub monthly_payment: f64,
    pub years: Vec<AmortizationYear>,
}

/// Projection row for a single elapsed year, starting at year 0.
///
/// Buy-side amounts are the share of one owner. Rent-side amounts are never split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub monthly_payment: f64,
    pub annual_payments: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
    pub annual_buy_cost: f64,
    pub cumulative_buy_cost: f64,
    pub annual_rent_cost: f64,
    pub cumulative_rent_cost: f64,
    pub home_value: f64,
    pub home_equity: f64,
    pub alt_investment_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub monthly_payment_per_owner: f64,
    pub total_buy_cost: f64,
    pub total_rent_cost: f64,
    pub cost_difference: f64,
    pub final_home_equity: f64,
    pub final_alt_investment_value: f64,
    pub break_even_year: Option<u32>,
}

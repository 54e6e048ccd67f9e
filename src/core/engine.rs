use super::error::ProjectionError;
use super::types::{
    AmortizationSchedule, AmortizationYear, MAX_HORIZON_YEARS, ScenarioParameters, YearRecord,
};

const MONTHS_PER_YEAR: u32 = 12;

/// Fixed-rate amortization of `principal` over `years`, aggregated per year.
pub fn amortize(
    principal: f64,
    annual_rate: f64,
    years: u32,
) -> Result<AmortizationSchedule, ProjectionError> {
    if !principal.is_finite() || principal < 0.0 {
        return Err(ProjectionError::invalid(
            "principal",
            format!("must be a finite value >= 0, got {principal}"),
        ));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(ProjectionError::invalid(
            "annual_interest_rate",
            format!("must be a finite value >= 0, got {annual_rate}"),
        ));
    }
    if years == 0 {
        return Err(ProjectionError::invalid(
            "horizon_years",
            "amortization term must be at least one year",
        ));
    }
    if years > MAX_HORIZON_YEARS {
        return Err(ProjectionError::invalid(
            "horizon_years",
            format!("amortization term must be at most {MAX_HORIZON_YEARS} years, got {years}"),
        ));
    }

    let mut monthly_rate = annual_rate / f64::from(MONTHS_PER_YEAR);
    if 1.0 + monthly_rate == 1.0 {
        monthly_rate = 0.0;
    }
    let months = f64::from(years) * f64::from(MONTHS_PER_YEAR);
    let monthly_payment = fixed_monthly_payment(principal, monthly_rate, months);
    if !monthly_payment.is_finite() {
        return Err(ProjectionError::invalid(
            "annual_interest_rate",
            format!("monthly payment is not finite for rate {annual_rate} over {years} years"),
        ));
    }

    let annual_payments = monthly_payment * f64::from(MONTHS_PER_YEAR);
    let mut start_balance = principal;
    let mut schedule = Vec::with_capacity(years as usize);
    for year in 0..years {
        let months_paid = f64::from(year + 1) * f64::from(MONTHS_PER_YEAR);
        let end_balance = remaining_balance(principal, monthly_rate, months, months_paid);
        let principal_paid = start_balance - end_balance;
        let interest_paid = if monthly_rate == 0.0 {
            0.0
        } else {
            (annual_payments - principal_paid).max(0.0)
        };
        schedule.push(AmortizationYear {
            year,
            payments: annual_payments,
            principal_paid,
            interest_paid,
            end_balance,
        });
        start_balance = end_balance;
    }

    Ok(AmortizationSchedule {
        monthly_payment,
        years: schedule,
    })
}

fn fixed_monthly_payment(principal: f64, monthly_rate: f64, months: f64) -> f64 {
    if monthly_rate == 0.0 {
        principal / months
    } else {
        principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
    }
}

/// Balance left after `months_paid` of `months` level payments.
///
/// Closed form, so rounding does not compound month over month and the
/// balance is exactly zero once every payment is made.
fn remaining_balance(principal: f64, monthly_rate: f64, months: f64, months_paid: f64) -> f64 {
    if months_paid >= months {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal * (months - months_paid) / months;
    }
    let growth = 1.0 + monthly_rate;
    principal * (1.0 - growth.powf(months_paid - months)) / (1.0 - growth.powf(-months))
}

fn compound(base: f64, rate: f64, year: u32) -> f64 {
    base * (1.0 + rate).powf(f64::from(year))
}

/// Year-by-year buy versus rent projection over `horizon_years`.
///
/// The mortgage term equals the horizon. Home value for year `i` uses
/// appreciation compounded `i` times against the balance left at the end of
/// that year. Year 0 carries the down payment and closing costs.
pub fn project(params: &ScenarioParameters) -> Result<Vec<YearRecord>, ProjectionError> {
    params.validate()?;
    if params.horizon_years == 0 {
        return Ok(Vec::new());
    }

    let schedule = amortize(
        params.principal(),
        params.annual_interest_rate,
        params.horizon_years,
    )?;
    let upfront = params.down_payment() + params.purchase_closing_costs;
    let base_annual_rent = params.monthly_rent * f64::from(MONTHS_PER_YEAR);
    let invested_share = params.owner_share(params.down_payment());

    let mut cumulative_buy = 0.0;
    let mut cumulative_rent = 0.0;
    let mut records = Vec::with_capacity(schedule.years.len());
    for mortgage_year in &schedule.years {
        let year = mortgage_year.year;

        let mut annual_buy = mortgage_year.payments + params.annual_ownership_costs;
        if year == 0 {
            annual_buy += upfront;
        }
        cumulative_buy += annual_buy;

        let annual_rent = compound(base_annual_rent, params.rent_inflation_rate, year)
            - params.rent_tax_deduction_annual;
        cumulative_rent += annual_rent;

        let home_value = compound(params.home_price, params.home_appreciation_rate, year);

        records.push(YearRecord {
            year,
            monthly_payment: params.owner_share(schedule.monthly_payment),
            annual_payments: params.owner_share(mortgage_year.payments),
            principal_paid: params.owner_share(mortgage_year.principal_paid),
            interest_paid: params.owner_share(mortgage_year.interest_paid),
            remaining_balance: params.owner_share(mortgage_year.end_balance),
            annual_buy_cost: params.owner_share(annual_buy),
            cumulative_buy_cost: params.owner_share(cumulative_buy),
            annual_rent_cost: annual_rent,
            cumulative_rent_cost: cumulative_rent,
            home_value: params.owner_share(home_value),
            home_equity: params.owner_share(home_value - mortgage_year.end_balance),
            alt_investment_value: compound(
                invested_share,
                params.alt_investment_return_rate,
                year,
            ),
        });
    }

    Ok(records)
}

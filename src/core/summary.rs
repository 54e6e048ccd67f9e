use super::types::{ProjectionSummary, ScenarioParameters, YearRecord};

/// Headline figures for a projection produced by [`super::project`].
///
/// Buying's net cost at a year is what the owner paid minus the equity they
/// hold. Renting's net cost is the rent paid minus what the uninvested down
/// payment has earned. The break-even year is the first year buying is no
/// more expensive than renting.
pub fn summarize(params: &ScenarioParameters, records: &[YearRecord]) -> ProjectionSummary {
    let Some(last) = records.last() else {
        return ProjectionSummary {
            monthly_payment_per_owner: 0.0,
            total_buy_cost: 0.0,
            total_rent_cost: 0.0,
            cost_difference: 0.0,
            final_home_equity: 0.0,
            final_alt_investment_value: 0.0,
            break_even_year: None,
        };
    };

    let invested_share = params.owner_share(params.down_payment());
    let break_even_year = records
        .iter()
        .find(|record| net_buy_cost(record) <= net_rent_cost(record, invested_share))
        .map(|record| record.year);

    ProjectionSummary {
        monthly_payment_per_owner: last.monthly_payment,
        total_buy_cost: last.cumulative_buy_cost,
        total_rent_cost: last.cumulative_rent_cost,
        cost_difference: last.cumulative_buy_cost - last.cumulative_rent_cost,
        final_home_equity: last.home_equity,
        final_alt_investment_value: last.alt_investment_value,
        break_even_year,
    }
}

fn net_buy_cost(record: &YearRecord) -> f64 {
    record.cumulative_buy_cost - record.home_equity
}

fn net_rent_cost(record: &YearRecord, invested_share: f64) -> f64 {
    record.cumulative_rent_cost - (record.alt_investment_value - invested_share)
}

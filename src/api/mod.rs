use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    MAX_CO_OWNERS, MAX_HORIZON_YEARS, ProjectionSummary, ScenarioParameters, YearRecord, project,
    summarize,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    home_price: Option<f64>,
    down_payment: Option<f64>,
    interest_rate: Option<f64>,
    monthly_rent: Option<f64>,
    rent_inflation: Option<f64>,
    appreciation: Option<f64>,
    ownership_costs: Option<f64>,
    closing_costs: Option<f64>,
    alt_return: Option<f64>,
    rent_deduction: Option<f64>,
    horizon_years: Option<u32>,
    co_owners: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rentbuy",
    about = "Year-by-year comparison of buying a home with a mortgage versus renting"
)]
pub struct Cli {
    #[arg(long, default_value_t = 350_000.0, help = "Purchase price of the home")]
    home_price: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Down payment in percent of the price, across all owners"
    )]
    down_payment: f64,
    #[arg(long, default_value_t = 3.5, help = "Annual mortgage interest rate in percent")]
    interest_rate: f64,
    #[arg(long, default_value_t = 800.0, help = "Monthly rent in the first year")]
    monthly_rent: f64,
    #[arg(long, default_value_t = 2.0, help = "Annual rent inflation in percent")]
    rent_inflation: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual home appreciation in percent")]
    appreciation: f64,
    #[arg(
        long,
        default_value_t = 2_200.0,
        help = "Yearly ownership costs (taxes, insurance, upkeep)"
    )]
    ownership_costs: f64,
    #[arg(long, default_value_t = 30_000.0, help = "One-off purchase closing costs")]
    closing_costs: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Annual return in percent on the down payment if it is invested instead"
    )]
    alt_return: f64,
    #[arg(long, default_value_t = 1_000.0, help = "Yearly tax deduction on rent")]
    rent_deduction: f64,
    #[arg(
        long,
        default_value_t = 30,
        help = "Years to project; also the mortgage term"
    )]
    horizon_years: u32,
    #[arg(
        long,
        default_value_t = 2,
        help = "Owners splitting the purchase evenly"
    )]
    co_owners: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    parameters: ScenarioParameters,
    summary: ProjectionSummary,
    years: Vec<YearRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_params(cli: &Cli) -> Result<ScenarioParameters, String> {
    for (name, percent) in [
        ("--down-payment", cli.down_payment),
        ("--interest-rate", cli.interest_rate),
        ("--rent-inflation", cli.rent_inflation),
        ("--appreciation", cli.appreciation),
        ("--alt-return", cli.alt_return),
    ] {
        if !(0.0..=100.0).contains(&percent) {
            return Err(format!("{name} must be between 0 and 100"));
        }
    }

    if !(1..=MAX_HORIZON_YEARS).contains(&cli.horizon_years) {
        return Err(format!(
            "--horizon-years must be between 1 and {MAX_HORIZON_YEARS}"
        ));
    }

    if !(1..=MAX_CO_OWNERS).contains(&cli.co_owners) {
        return Err(format!("--co-owners must be between 1 and {MAX_CO_OWNERS}"));
    }

    let params = ScenarioParameters {
        home_price: cli.home_price,
        down_payment_pct: cli.down_payment / 100.0,
        annual_interest_rate: cli.interest_rate / 100.0,
        monthly_rent: cli.monthly_rent,
        rent_inflation_rate: cli.rent_inflation / 100.0,
        home_appreciation_rate: cli.appreciation / 100.0,
        annual_ownership_costs: cli.ownership_costs,
        purchase_closing_costs: cli.closing_costs,
        alt_investment_return_rate: cli.alt_return / 100.0,
        rent_tax_deduction_annual: cli.rent_deduction,
        horizon_years: cli.horizon_years,
        co_owners: cli.co_owners,
    };
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}

fn build_response(params: ScenarioParameters) -> Result<ProjectResponse, String> {
    let years = project(&params).map_err(|e| e.to_string())?;
    let summary = summarize(&params, &years);
    Ok(ProjectResponse {
        parameters: params,
        summary,
        years,
    })
}

/// Runs a projection from parsed command-line flags and renders it in the requested format.
pub fn run_cli(cli: Cli) -> Result<String, String> {
    let params = build_params(&cli)?;
    let response = build_response(params)?;
    match cli.format {
        OutputFormat::Table => {
            render_table(&response).map_err(|e| format!("failed to render projection: {e}"))
        }
        OutputFormat::Json => serde_json::to_string_pretty(&response)
            .map_err(|e| format!("failed to serialize projection: {e}")),
    }
}

fn render_table(response: &ProjectResponse) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_table(&mut out, response)?;
    Ok(out)
}

fn write_table(out: &mut String, response: &ProjectResponse) -> fmt::Result {
    writeln!(
        out,
        "{:>4} {:>12} {:>12} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Payment", "Interest", "Balance", "Buy total", "Rent total", "Equity", "Invested"
    )?;
    for year in &response.years {
        writeln!(
            out,
            "{:>4} {:>12.2} {:>12.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            year.year,
            year.monthly_payment,
            year.interest_paid,
            year.remaining_balance,
            year.cumulative_buy_cost,
            year.cumulative_rent_cost,
            year.home_equity,
            year.alt_investment_value,
        )?;
    }

    let summary = &response.summary;
    writeln!(out)?;
    writeln!(
        out,
        "Monthly mortgage payment per owner: {:.2}",
        summary.monthly_payment_per_owner
    )?;
    writeln!(
        out,
        "Total cost difference (buy - rent): {:.2}",
        summary.cost_difference
    )?;
    match summary.break_even_year {
        Some(year) => writeln!(out, "Buying breaks even in year {year}"),
        None => writeln!(out, "Buying does not break even within the horizon"),
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("rent vs buy HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(payload),
        Err(rejection) => malformed_request(rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(payload),
        Err(rejection) => malformed_request(rejection.body_text()),
    }
}

fn malformed_request(detail: String) -> Response {
    let msg = format!("Invalid API payload: {detail}");
    warn!("rejected projection request: {msg}");
    error_response(StatusCode::BAD_REQUEST, &msg)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let response = api_params_from_payload(payload).and_then(build_response);
    match response {
        Ok(response) => {
            debug!(
                "projected {} years for {} owner(s)",
                response.years.len(),
                response.parameters.co_owners
            );
            json_response(StatusCode::OK, response)
        }
        Err(msg) => {
            warn!("rejected projection request: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_params_from_json(json: &str) -> Result<ScenarioParameters, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_params_from_payload(payload)
}

fn api_params_from_payload(payload: ProjectPayload) -> Result<ScenarioParameters, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.home_price {
        cli.home_price = v;
    }
    if let Some(v) = payload.down_payment {
        cli.down_payment = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.monthly_rent {
        cli.monthly_rent = v;
    }
    if let Some(v) = payload.rent_inflation {
        cli.rent_inflation = v;
    }
    if let Some(v) = payload.appreciation {
        cli.appreciation = v;
    }
    if let Some(v) = payload.ownership_costs {
        cli.ownership_costs = v;
    }
    if let Some(v) = payload.closing_costs {
        cli.closing_costs = v;
    }
    if let Some(v) = payload.alt_return {
        cli.alt_return = v;
    }
    if let Some(v) = payload.rent_deduction {
        cli.rent_deduction = v;
    }
    if let Some(v) = payload.horizon_years {
        cli.horizon_years = v;
    }
    if let Some(v) = payload.co_owners {
        cli.co_owners = v;
    }

    build_params(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        home_price: 350_000.0,
        down_payment: 20.0,
        interest_rate: 3.5,
        monthly_rent: 800.0,
        rent_inflation: 2.0,
        appreciation: 3.0,
        ownership_costs: 2_200.0,
        closing_costs: 30_000.0,
        alt_return: 5.0,
        rent_deduction: 1_000.0,
        horizon_years: 30,
        co_owners: 2,
        format: OutputFormat::Json,
    }
}

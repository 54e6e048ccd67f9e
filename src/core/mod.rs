mod engine;
mod error;
mod summary;
mod types;

pub use engine::{amortize, project};
pub use error::ProjectionError;
pub use summary::summarize;
pub use types::{
    AmortizationSchedule, AmortizationYear, MAX_CO_OWNERS, MAX_HORIZON_YEARS, ProjectionSummary,
    ScenarioParameters, YearRecord,
};

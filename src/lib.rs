pub mod error;
pub mod parser;
pub mod schema;
pub mod coerce;
pub mod grouping;
pub mod format;
pub mod kpi;
pub mod report;
pub mod state;
pub mod insight;

pub use error::{DashboardError, InsightError, ParseError};
pub use kpi::KpiSummary;
pub use parser::{Dataset, Record};
pub use schema::Role;
pub use state::{Dashboard, Datasets};

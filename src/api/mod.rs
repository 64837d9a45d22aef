//! HTTP API module for the press ledger.
//!
//! This module exposes the ledger over JSON/HTTP: CRUD for every record
//! type, payroll balances and reports, the dashboard, and data
//! export/import/reset.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{CORRELATION_ID_HEADER, create_router};
pub use request::{
    AdvanceQuery, CloseWorkLogRequest, DashboardQuery, EmployeeQuery, PeriodQuery, RecordQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

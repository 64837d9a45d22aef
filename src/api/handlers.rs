//! HTTP request handlers for the press ledger API.
//!
//! This module contains the router, the request-logging middleware and the
//! handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Body,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Local;
use serde::Serialize;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::models::{
    AdvancePatch, AttendancePatch, CompanyInfoPatch, DeductionPatch, DepartmentPatch,
    EmployeePatch, NewAdvance, NewAttendance, NewDeduction, NewDepartment, NewEmployee, NewTask,
    NewWorkLog, TaskPatch, WorkLogPatch,
};

use super::request::{
    AdvanceQuery, CloseWorkLogRequest, DashboardQuery, EmployeeQuery, PeriodQuery, RecordQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Response header carrying the per-request correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee)
                .patch(update_employee)
                .delete(deactivate_employee),
        )
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/:id", patch(update_department).delete(delete_department))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", patch(update_task).delete(delete_task))
        .route("/work-logs", get(list_work_logs).post(create_work_log))
        .route("/work-logs/:id", patch(update_work_log).delete(delete_work_log))
        .route("/work-logs/:id/close", post(close_work_log))
        .route("/attendance", get(list_attendance).post(create_attendance))
        .route("/attendance/:id", patch(update_attendance).delete(delete_attendance))
        .route("/advances", get(list_advances).post(create_advance))
        .route("/advances/:id", patch(update_advance).delete(delete_advance))
        .route("/deductions", get(list_deductions).post(create_deduction))
        .route("/deductions/:id", patch(update_deduction).delete(delete_deduction))
        .route("/company", get(get_company).patch(update_company))
        .route("/payroll/balance/:employee_id", get(employee_balance))
        .route("/payroll/report", get(salary_report))
        .route("/dashboard", get(dashboard))
        .route("/data/export", get(export_data))
        .route("/data/import", post(import_data))
        .route("/data/reset", post(reset_data))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Tags each request with a correlation id and logs its outcome.
///
/// Everything logged while the request is handled, including by the ledger,
/// is recorded inside a span carrying the id.
async fn log_request(request: Request<Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let started = Instant::now();
        let mut response = next.run(request).await;
        let status = response.status();
        let duration_us = started.elapsed().as_micros() as u64;

        if status.is_client_error() || status.is_server_error() {
            warn!(status = status.as_u16(), duration_us, "Request failed");
        } else {
            info!(status = status.as_u16(), duration_us, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
            response.headers_mut().insert(CORRELATION_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

fn ok<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(value)) => return Ok(value),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(error = %body_text, "JSON data error");
            if body_text.contains("missing field") || body_text.contains("unknown field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Unwraps a query string, turning extractor rejections into API errors.
fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiErrorResponse> {
    query.map(|Query(value)| value).map_err(|rejection| {
        let body_text = rejection.body_text();
        warn!(error = %body_text, "Query string error");
        ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
    })
}

// --- Employees ---

async fn list_employees(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> ApiResult {
    let query = parse_query(query)?;
    let ledger = state.ledger().read().await;
    let employees: Vec<_> = ledger.employees(query.active_only).cloned().collect();
    Ok(ok(employees))
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let employee = state.ledger().write().await.add_employee(form)?;
    Ok(created(employee))
}

async fn get_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let ledger = state.ledger().read().await;
    Ok(ok(ledger.employee(&id)?))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeePatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let employee = state.ledger().write().await.update_employee(&id, patch)?;
    Ok(ok(employee))
}

async fn deactivate_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let employee = state.ledger().write().await.deactivate_employee(&id)?;
    Ok(ok(employee))
}

// --- Departments ---

async fn list_departments(State(state): State<AppState>) -> ApiResult {
    let ledger = state.ledger().read().await;
    Ok(ok(ledger.departments()))
}

async fn create_department(
    State(state): State<AppState>,
    payload: Result<Json<NewDepartment>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let department = state.ledger().write().await.add_department(form)?;
    Ok(created(department))
}

async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DepartmentPatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let department = state.ledger().write().await.update_department(&id, patch)?;
    Ok(ok(department))
}

async fn delete_department(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let department = state.ledger().write().await.delete_department(&id)?;
    Ok(ok(department))
}

// --- Tasks ---

async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> ApiResult {
    let query = parse_query(query)?;
    let ledger = state.ledger().read().await;
    let tasks: Vec<_> = ledger.tasks(query.employee_id.as_deref()).cloned().collect();
    Ok(ok(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let task = state.ledger().write().await.add_task(form)?;
    Ok(created(task))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let task = state.ledger().write().await.update_task(&id, patch)?;
    Ok(ok(task))
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let task = state.ledger().write().await.delete_task(&id)?;
    Ok(ok(task))
}

// --- Work logs ---

async fn list_work_logs(
    State(state): State<AppState>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> ApiResult {
    let query = parse_query(query)?;
    let ledger = state.ledger().read().await;
    let logs: Vec<_> = ledger
        .work_logs(query.employee_id.as_deref())
        .cloned()
        .collect();
    Ok(ok(logs))
}

async fn create_work_log(
    State(state): State<AppState>,
    payload: Result<Json<NewWorkLog>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let log = state.ledger().write().await.add_work_log(form)?;
    Ok(created(log))
}

async fn update_work_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<WorkLogPatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let log = state.ledger().write().await.update_work_log(&id, patch)?;
    Ok(ok(log))
}

async fn close_work_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CloseWorkLogRequest>, JsonRejection>,
) -> ApiResult {
    let request = parse_body(payload)?;
    let log = state
        .ledger()
        .write()
        .await
        .close_work_log(&id, request.end_time)?;
    Ok(ok(log))
}

async fn delete_work_log(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let log = state.ledger().write().await.delete_work_log(&id)?;
    Ok(ok(log))
}

// --- Attendance ---

async fn list_attendance(
    State(state): State<AppState>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> ApiResult {
    let query = parse_query(query)?;
    let ledger = state.ledger().read().await;
    let records: Vec<_> = ledger
        .attendance(query.employee_id.as_deref())
        .cloned()
        .collect();
    Ok(ok(records))
}

async fn create_attendance(
    State(state): State<AppState>,
    payload: Result<Json<NewAttendance>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let record = state.ledger().write().await.add_attendance(form)?;
    Ok(created(record))
}

async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AttendancePatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let record = state.ledger().write().await.update_attendance(&id, patch)?;
    Ok(ok(record))
}

async fn delete_attendance(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let record = state.ledger().write().await.delete_attendance(&id)?;
    Ok(ok(record))
}

// --- Advances ---

async fn list_advances(
    State(state): State<AppState>,
    query: Result<Query<AdvanceQuery>, QueryRejection>,
) -> ApiResult {
    let query = parse_query(query)?;
    let ledger = state.ledger().read().await;
    let advances: Vec<_> = ledger
        .advances(query.employee_id.as_deref(), query.is_paid)
        .cloned()
        .collect();
    Ok(ok(advances))
}

async fn create_advance(
    State(state): State<AppState>,
    payload: Result<Json<NewAdvance>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let advance = state.ledger().write().await.add_advance(form)?;
    Ok(created(advance))
}

async fn update_advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AdvancePatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let advance = state.ledger().write().await.update_advance(&id, patch)?;
    Ok(ok(advance))
}

async fn delete_advance(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let advance = state.ledger().write().await.delete_advance(&id)?;
    Ok(ok(advance))
}

// --- Deductions ---

async fn list_deductions(
    State(state): State<AppState>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> ApiResult {
    let query = parse_query(query)?;
    let ledger = state.ledger().read().await;
    let deductions: Vec<_> = ledger
        .deductions(query.employee_id.as_deref())
        .cloned()
        .collect();
    Ok(ok(deductions))
}

async fn create_deduction(
    State(state): State<AppState>,
    payload: Result<Json<NewDeduction>, JsonRejection>,
) -> ApiResult {
    let form = parse_body(payload)?;
    let deduction = state.ledger().write().await.record_deduction(form)?;
    Ok(created(deduction))
}

async fn update_deduction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DeductionPatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let deduction = state.ledger().write().await.update_deduction(&id, patch)?;
    Ok(ok(deduction))
}

async fn delete_deduction(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let deduction = state.ledger().write().await.delete_deduction(&id)?;
    Ok(ok(deduction))
}

// --- Company ---

async fn get_company(State(state): State<AppState>) -> ApiResult {
    let ledger = state.ledger().read().await;
    Ok(ok(ledger.company_info()))
}

async fn update_company(
    State(state): State<AppState>,
    payload: Result<Json<CompanyInfoPatch>, JsonRejection>,
) -> ApiResult {
    let patch = parse_body(payload)?;
    let info = state.ledger().write().await.update_company_info(patch)?;
    Ok(ok(info))
}

// --- Payroll and reports ---

async fn employee_balance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult {
    let period = parse_query(query)?.period()?;
    let started = Instant::now();
    let breakdown = state.ledger().read().await.balance(&employee_id, period);
    info!(
        employee_id = %employee_id,
        period = %period,
        net_balance = %breakdown.net_balance,
        duration_us = started.elapsed().as_micros() as u64,
        "Balance calculated"
    );
    Ok(ok(breakdown))
}

async fn salary_report(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult {
    let period = parse_query(query)?.period()?;
    let report = state.ledger().read().await.salary_report(period);
    info!(
        period = %period,
        employees = report.lines.len(),
        total_net = %report.total_net,
        "Salary report built"
    );
    Ok(ok(report))
}

async fn dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> ApiResult {
    let today = parse_query(query)?
        .today
        .unwrap_or_else(|| Local::now().date_naive());
    let summary = state.ledger().read().await.dashboard(today);
    Ok(ok(summary))
}

// --- Data management ---

async fn export_data(State(state): State<AppState>) -> ApiResult {
    let snapshot = state.ledger().read().await.export();
    Ok(ok(snapshot))
}

/// Takes the raw body so malformed documents surface as import errors.
async fn import_data(State(state): State<AppState>, body: String) -> ApiResult {
    state.ledger().write().await.import_json(&body)?;
    let ledger = state.ledger().read().await;
    Ok(ok(ledger.snapshot()))
}

async fn reset_data(State(state): State<AppState>) -> ApiResult {
    let mut ledger = state.ledger().write().await;
    ledger.reset()?;
    Ok(ok(ledger.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, EmployeeStatus};
    use crate::store::Ledger;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        create_router(AppState::new(Ledger::in_memory()))
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.oneshot(request).await.unwrap()
    }

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    const EMPLOYEE_JSON: &str = r#"{
        "name": "John Smith",
        "department": "Printing",
        "joining_date": "2025-04-01",
        "employment_type": "full_time",
        "salary_type": "monthly",
        "salary_rate": "3200"
    }"#;

    #[tokio::test]
    async fn test_create_employee_returns_201() {
        let response = send(create_test_router(), "POST", "/employees", Some(EMPLOYEE_JSON)).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert!(response.headers().contains_key(CORRELATION_ID_HEADER));

        let employee: Employee = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(employee.name, "John Smith");
        assert_eq!(employee.status, EmployeeStatus::Active);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = send(create_test_router(), "POST", "/employees", Some("{invalid json")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let response = send(
            create_test_router(),
            "POST",
            "/employees",
            Some(r#"{"name": "John Smith"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_patch_field_returns_validation_error() {
        let router = create_test_router();
        let response = send(router.clone(), "POST", "/employees", Some(EMPLOYEE_JSON)).await;
        let employee: Employee = serde_json::from_slice(&body_of(response).await).unwrap();

        let response = send(
            router,
            "PATCH",
            &format!("/employees/{}", employee.id),
            Some(r#"{"id": "emp_hijack"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/employees")
            .body(Body::from(EMPLOYEE_JSON))
            .unwrap();
        let response = create_test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let response = send(create_test_router(), "GET", "/employees/emp_404", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_month_returns_400() {
        let response = send(
            create_test_router(),
            "GET",
            "/payroll/report?month=12&year=2026",
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_missing_period_returns_400() {
        let response = send(create_test_router(), "GET", "/payroll/report", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_employee_balance_is_zero() {
        let response = send(
            create_test_router(),
            "GET",
            "/payroll/balance/emp_404?month=2&year=2026",
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["net_balance"], "0");
        assert_eq!(body["employee_found"], false);
    }

    #[tokio::test]
    async fn test_import_garbage_returns_400() {
        let response = send(create_test_router(), "POST", "/data/import", Some("garbage")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(error.code, "INVALID_IMPORT");
    }
}

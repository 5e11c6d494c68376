use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    error::AppResult,
    model::{attendance::AttendanceRecord, user::UserAccount},
    service::salary::{self, SalaryReport},
    store::DataStore,
};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SalaryQuery {
    #[schema(example = "barista1")]
    pub username: String,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SalaryReportQuery {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/v1/salary",
    params(SalaryQuery),
    responses(
        (status = 200, body = SalaryReport),
        (status = 403, description = "Staff asking for another user's salary"),
        (status = 404, description = "User not found", body = Object, example = json!({
            "status": "error",
            "message": "user not found: ghost"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn get_salary(
    auth: AuthUser,
    store: web::Data<DataStore>,
    query: web::Query<SalaryQuery>,
) -> AppResult<HttpResponse> {
    auth.require_self_or_admin(&query.username)?;

    let users: Vec<UserAccount> = store.load()?;
    let records: Vec<AttendanceRecord> = store.load()?;

    let report = salary::calculate_salary(
        &users,
        &records,
        &query.username,
        query.start_date,
        query.end_date,
    )?;

    debug!(
        username = %report.username,
        hours = %report.total_hours,
        salary = %report.total_salary,
        "Salary computed"
    );
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/salary/report",
    params(SalaryReportQuery),
    responses(
        (status = 200, description = "One report per hourly-paid account", body = [SalaryReport]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn salary_report(
    auth: AuthUser,
    store: web::Data<DataStore>,
    query: web::Query<SalaryReportQuery>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let users: Vec<UserAccount> = store.load()?;
    let records: Vec<AttendanceRecord> = store.load()?;

    let reports = salary::salary_reports(&users, &records, query.start_date, query.end_date)?;
    Ok(HttpResponse::Ok().json(reports))
}

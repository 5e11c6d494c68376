use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::attendance::AttendanceRecord,
    service::attendance,
    store::DataStore,
};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    /// Admin only; staff always see their own records
    #[schema(example = "barista1")]
    pub username: Option<String>,
    #[schema(example = "2026-01-01", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-31", value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    responses(
        (status = 201, description = "Checked in successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "status": "error",
            "message": "already checked in"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(auth: AuthUser, store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    let now = Local::now().naive_local();

    let record = store.update(|records: &mut Vec<AttendanceRecord>| {
        attendance::check_in(records, &auth.username, now).map_err(AppError::from)
    })?;

    info!(username = %auth.username, record_id = %record.id, "Checked in");
    Ok(HttpResponse::Created().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No check-in found for today", body = Object, example = json!({
            "status": "error",
            "message": "no check-in found"
        })),
        (status = 409, description = "Already checked out", body = Object, example = json!({
            "status": "error",
            "message": "already checked out"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(auth: AuthUser, store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    let now = Local::now().naive_local();

    let record = store.update(|records: &mut Vec<AttendanceRecord>| {
        attendance::check_out(records, &auth.username, now).map_err(AppError::from)
    })?;

    info!(username = %auth.username, record_id = %record.id, "Checked out");
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records, newest first", body = [AttendanceRecord]),
        (status = 403, description = "Staff asking for another user's records")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    store: web::Data<DataStore>,
    query: web::Query<AttendanceQuery>,
) -> AppResult<HttpResponse> {
    let username = match &query.username {
        Some(u) => {
            auth.require_self_or_admin(u)?;
            Some(u.as_str())
        }
        None if auth.require_admin().is_ok() => None,
        None => Some(auth.username.as_str()),
    };

    let records: Vec<AttendanceRecord> = store.load()?;
    let found = attendance::filter_records(&records, username, query.start_date, query.end_date);

    Ok(HttpResponse::Ok().json(found))
}

/// The caller's latest shift, `null` if they never checked in
#[utoipa::path(
    get,
    path = "/api/v1/attendance/last",
    responses(
        (status = 200, description = "Latest record by check-in time", body = Option<AttendanceRecord>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn last_attendance(auth: AuthUser, store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    let records: Vec<AttendanceRecord> = store.load()?;
    Ok(HttpResponse::Ok().json(attendance::last_record(&records, &auth.username)))
}

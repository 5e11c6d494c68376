use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    error::AppResult,
    model::receipt::Receipt,
    service::revenue::{self, DailyRevenue},
    store::DataStore,
};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReceiptQuery {
    #[schema(example = "2026-01-01", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-31", value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RevenueQuery {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/v1/receipts",
    params(ReceiptQuery),
    responses(
        (status = 200, description = "Receipts, newest first", body = [Receipt]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipt"
)]
pub async fn list_receipts(
    auth: AuthUser,
    store: web::Data<DataStore>,
    query: web::Query<ReceiptQuery>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let mut receipts: Vec<Receipt> = store.load()?;
    receipts.retain(|r| {
        let day = r.created_at.date();
        query.start_date.is_none_or(|s| day >= s) && query.end_date.is_none_or(|e| day <= e)
    });
    receipts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(HttpResponse::Ok().json(receipts))
}

#[utoipa::path(
    get,
    path = "/api/v1/receipts/revenue",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue per day", body = [DailyRevenue]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipt"
)]
pub async fn revenue_summary(
    auth: AuthUser,
    store: web::Data<DataStore>,
    query: web::Query<RevenueQuery>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let receipts: Vec<Receipt> = store.load()?;
    Ok(HttpResponse::Ok().json(revenue::daily_revenue(
        &receipts,
        query.start_date,
        query.end_date,
    )))
}

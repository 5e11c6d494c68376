use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    model::table::Table,
    service::takeaway::{self, TakeawayOrder},
    store::DataStore,
};

/// Takeaway order from the public web page
#[utoipa::path(
    post,
    path = "/api/order_takeaway",
    request_body = TakeawayOrder,
    responses(
        (status = 200, description = "Order stored in a takeaway slot", body = Object, example = json!({
            "status": "success",
            "message": "Order received.",
            "takeaway_id": "takeaway1"
        })),
        (status = 400, description = "Body is not valid JSON", body = Object, example = json!({
            "status": "error",
            "message": "Request body is not valid JSON"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Public"
)]
pub async fn order_takeaway(
    store: web::Data<DataStore>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    // parsed by hand so a bad body gets the same JSON error shape as everything else
    let order: TakeawayOrder = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected takeaway order body");
        AppError::validation("Request body is not valid JSON")
    })?;

    let takeaway_id = store.update(|tables: &mut Vec<Table>| {
        Ok::<_, AppError>(takeaway::place_order(tables, &order))
    })?;

    info!(%takeaway_id, items = order.cart.len(), "Takeaway order received");
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Order received.",
        "takeaway_id": takeaway_id.to_string()
    })))
}

/// CORS preflight for the takeaway endpoint.
pub async fn order_takeaway_preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "X-Requested-With, Content-Type"))
        .finish()
}

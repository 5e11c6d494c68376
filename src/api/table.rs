use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::{
        menu_item::MenuItem,
        receipt::Receipt,
        table::{Table, TableId},
    },
    service::order,
    store::DataStore,
};

#[derive(Deserialize, ToSchema)]
pub struct AddItem {
    #[schema(example = "2f1e9c7a-52a4-4d0e-8f6b-2a9d3c1b0e11")]
    pub menu_item_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SetQuantity {
    #[schema(example = 2)]
    pub quantity: u32,
}

fn table_id(raw: &str) -> TableId {
    match raw.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    responses((status = 200, description = "Dine-in tables and takeaway slots", body = [Table])),
    security(("bearer_auth" = [])),
    tag = "Table"
)]
pub async fn list_tables(_auth: AuthUser, store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    let tables: Vec<Table> = store.load()?;
    Ok(HttpResponse::Ok().json(tables))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{table_id}/items",
    params(("table_id", Path, description = "Table number or takeaway id")),
    request_body = AddItem,
    responses(
        (status = 200, description = "Updated table", body = Table),
        (status = 404, description = "Table or menu item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Table"
)]
pub async fn add_item(
    _auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
    body: web::Json<AddItem>,
) -> AppResult<HttpResponse> {
    let id = table_id(&path);
    let menu: Vec<MenuItem> = store.load()?;

    let table = store.update(|tables: &mut Vec<Table>| {
        order::add_item(tables, &menu, &id, &body.menu_item_id).map_err(AppError::from)
    })?;

    Ok(HttpResponse::Ok().json(table))
}

#[utoipa::path(
    put,
    path = "/api/v1/tables/{table_id}/items/{item_name}",
    params(
        ("table_id", Path, description = "Table number or takeaway id"),
        ("item_name", Path, description = "Name of the ordered item")
    ),
    request_body = SetQuantity,
    responses(
        (status = 200, description = "Updated table", body = Table),
        (status = 400, description = "Quantity outside 1..=99"),
        (status = 404, description = "Table or line not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Table"
)]
pub async fn set_quantity(
    _auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<(String, String)>,
    body: web::Json<SetQuantity>,
) -> AppResult<HttpResponse> {
    let (raw_id, item_name) = path.into_inner();
    let id = table_id(&raw_id);

    let table = store.update(|tables: &mut Vec<Table>| {
        order::set_quantity(tables, &id, &item_name, body.quantity).map_err(AppError::from)
    })?;

    Ok(HttpResponse::Ok().json(table))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tables/{table_id}/items/{item_name}",
    params(
        ("table_id", Path, description = "Table number or takeaway id"),
        ("item_name", Path, description = "Name of the ordered item")
    ),
    responses(
        (status = 200, description = "Updated table", body = Table),
        (status = 404, description = "Table or line not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Table"
)]
pub async fn remove_item(
    _auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (raw_id, item_name) = path.into_inner();
    let id = table_id(&raw_id);

    let table = store.update(|tables: &mut Vec<Table>| {
        order::remove_item(tables, &id, &item_name).map_err(AppError::from)
    })?;

    Ok(HttpResponse::Ok().json(table))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{table_id}/confirm",
    params(("table_id", Path, description = "Table number or takeaway id")),
    responses(
        (status = 200, description = "Order confirmed, table occupied", body = Table),
        (status = 400, description = "Nothing ordered yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Table"
)]
pub async fn confirm(
    auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = table_id(&path);

    let table = store.update(|tables: &mut Vec<Table>| {
        order::confirm(tables, &id, &auth.username).map_err(AppError::from)
    })?;

    info!(table_id = %id, employee = %auth.username, "Order confirmed");
    Ok(HttpResponse::Ok().json(table))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{table_id}/checkout",
    params(("table_id", Path, description = "Table number or takeaway id")),
    responses(
        (status = 201, description = "Bill settled", body = Receipt),
        (status = 400, description = "Nothing ordered yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Table"
)]
pub async fn checkout(
    auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = table_id(&path);
    let now = Local::now().naive_local();

    // receipts are written before the table is cleared
    let receipt = store.update_pair(|receipts: &mut Vec<Receipt>, tables: &mut Vec<Table>| {
        let receipt = order::checkout(tables, &id, now).map_err(AppError::from)?;
        receipts.push(receipt.clone());
        Ok::<_, AppError>(receipt)
    })?;

    info!(
        table_id = %id,
        receipt_id = %receipt.id,
        total = %receipt.total,
        cashier = %auth.username,
        "Checkout completed"
    );
    Ok(HttpResponse::Created().json(receipt))
}

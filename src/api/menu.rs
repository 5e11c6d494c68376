use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::menu_item::MenuItem,
    service::menu,
    store::DataStore,
};

#[derive(Deserialize, ToSchema)]
pub struct MenuItemPayload {
    #[schema(example = "Iced milk coffee")]
    pub name: String,
    #[schema(example = 29000, value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    #[schema(example = "Coffee")]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

impl MenuItemPayload {
    fn validate(&self) -> AppResult<()> {
        menu::validate_item(&self.name, self.price).map_err(AppError::validation)
    }
}

/// Full menu, public
#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Every menu item", body = [MenuItem]),
        (status = 500, description = "Menu file unreadable", body = Object, example = json!({
            "status": "error",
            "message": "Internal Server Error"
        }))
    ),
    tag = "Public"
)]
pub async fn public_menu(store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    let items: Vec<MenuItem> = store.load()?;
    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu/categories",
    responses((status = 200, description = "Sorted distinct categories", body = [String])),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn list_categories(_auth: AuthUser, store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    let items: Vec<MenuItem> = store.load()?;
    Ok(HttpResponse::Ok().json(menu::categories(&items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu",
    request_body = MenuItemPayload,
    responses(
        (status = 201, description = "Item created", body = MenuItem),
        (status = 400, description = "Name empty or price negative")
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn create_item(
    auth: AuthUser,
    store: web::Data<DataStore>,
    payload: web::Json<MenuItemPayload>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let payload = payload.into_inner();
    let item = MenuItem {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        price: payload.price,
        category: payload.category.trim().to_string(),
        image: payload.image,
    };

    store.update(|items: &mut Vec<MenuItem>| {
        items.push(item.clone());
        Ok::<_, AppError>(())
    })?;

    info!(item_id = %item.id, name = %item.name, "Menu item created");
    Ok(HttpResponse::Created().json(item))
}

#[utoipa::path(
    put,
    path = "/api/v1/menu/{item_id}",
    params(("item_id", Path, description = "Menu item id")),
    request_body = MenuItemPayload,
    responses(
        (status = 200, description = "Item updated", body = MenuItem),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn update_item(
    auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
    payload: web::Json<MenuItemPayload>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let item_id = path.into_inner();
    let payload = payload.into_inner();

    let updated = store.update(|items: &mut Vec<MenuItem>| {
        let item = items
            .iter_mut()
            .find(|m| m.id == item_id)
            .ok_or_else(|| AppError::not_found("Menu item not found"))?;
        item.name = payload.name.trim().to_string();
        item.price = payload.price;
        item.category = payload.category.trim().to_string();
        item.image = payload.image;
        Ok::<_, AppError>(item.clone())
    })?;

    info!(%item_id, "Menu item updated");
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menu/{item_id}",
    params(("item_id", Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn delete_item(
    auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let item_id = path.into_inner();
    store.update(|items: &mut Vec<MenuItem>| {
        let before = items.len();
        items.retain(|m| m.id != item_id);
        if items.len() == before {
            return Err(AppError::not_found("Menu item not found"));
        }
        Ok(())
    })?;

    info!(%item_id, "Menu item deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// Startup migration for menus written before items carried ids.
pub fn migrate_menu_ids(store: &DataStore) -> AppResult<usize> {
    let mut items: Vec<MenuItem> = store.load()?;
    let changed = menu::assign_missing_ids(&mut items);
    if changed > 0 {
        store.save(&items)?;
        info!(changed, "Assigned ids to menu items");
    }
    Ok(changed)
}

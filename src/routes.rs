use crate::{
    api::{attendance, menu, receipt, salary, table, takeaway, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::{json_config, query_config},
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{DefaultHeaders, from_fn},
    web,
};
use std::sync::Arc;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("rate limiter period and burst are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let takeaway_limiter = Arc::new(build_limiter(config.rate_takeaway_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.app_data(json_config()).app_data(query_config());

    // Public web-shop routes
    let cors = || DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*"));
    cfg.service(
        web::resource("/api/menu")
            .wrap(cors())
            .route(web::get().to(menu::public_menu)),
    )
    .service(
        web::resource("/api/order_takeaway")
            .wrap(cors())
            .wrap(takeaway_limiter)
            .route(web::post().to(takeaway::order_takeaway))
            .route(web::method(actix_web::http::Method::OPTIONS).to(takeaway::order_takeaway_preflight)),
    );

    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Staff and admin routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::resource("/attendance")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::check_in))
                    .route(web::put().to(attendance::check_out)),
            )
            .service(
                web::resource("/attendance/last").route(web::get().to(attendance::last_attendance)),
            )
            .service(web::resource("/salary").route(web::get().to(salary::get_salary)))
            .service(web::resource("/salary/report").route(web::get().to(salary::salary_report)))
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user)),
                    )
                    .service(
                        web::resource("/{username}")
                            .route(web::put().to(user::update_user))
                            .route(web::delete().to(user::delete_user)),
                    ),
            )
            .service(
                web::scope("/menu")
                    .service(web::resource("").route(web::post().to(menu::create_item)))
                    // registered before /{item_id} so it is not taken for an id
                    .service(
                        web::resource("/categories").route(web::get().to(menu::list_categories)),
                    )
                    .service(
                        web::resource("/{item_id}")
                            .route(web::put().to(menu::update_item))
                            .route(web::delete().to(menu::delete_item)),
                    ),
            )
            .service(
                web::scope("/tables")
                    .service(web::resource("").route(web::get().to(table::list_tables)))
                    .service(
                        web::resource("/{table_id}/items").route(web::post().to(table::add_item)),
                    )
                    .service(
                        web::resource("/{table_id}/items/{item_name}")
                            .route(web::put().to(table::set_quantity))
                            .route(web::delete().to(table::remove_item)),
                    )
                    .service(
                        web::resource("/{table_id}/confirm").route(web::post().to(table::confirm)),
                    )
                    .service(
                        web::resource("/{table_id}/checkout")
                            .route(web::post().to(table::checkout)),
                    ),
            )
            .service(
                web::scope("/receipts")
                    .service(web::resource("").route(web::get().to(receipt::list_receipts)))
                    .service(
                        web::resource("/revenue").route(web::get().to(receipt::revenue_summary)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{bearer, test_config};
    use crate::auth::revocation::RevokedTokens;
    use crate::model::role::Role;
    use crate::store::DataStore;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn public_and_protected_routes_are_wired() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DataStore::open(dir.path()).unwrap()))
                .app_data(web::Data::new(RevokedTokens::new(config.refresh_token_ttl)))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config.clone())),
        )
        .await;
        let peer = "127.0.0.1:40000".parse().unwrap();

        let req = test::TestRequest::get().uri("/api/menu").peer_addr(peer).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );

        let req = test::TestRequest::get().uri("/api/v1/tables").peer_addr(peer).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/tables")
            .peer_addr(peer)
            .insert_header(("Authorization", bearer("an", Role::Staff)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/menu/categories")
            .peer_addr(peer)
            .insert_header(("Authorization", bearer("an", Role::Staff)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    fn app_parts() -> (tempfile::TempDir, Config) {
        (tempfile::tempdir().unwrap(), test_config())
    }

    #[actix_web::test]
    async fn takeaway_preflight_answers_cors() {
        let (dir, config) = app_parts();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DataStore::open(dir.path()).unwrap()))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config.clone())),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/order_takeaway")
            .peer_addr("127.0.0.1:40001".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(
            headers.get("Access-Control-Allow-Methods").unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Headers").unwrap(),
            "X-Requested-With, Content-Type"
        );
    }

    #[actix_web::test]
    async fn extractor_errors_are_json() {
        let (dir, config) = app_parts();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DataStore::open(dir.path()).unwrap()))
                .app_data(web::Data::new(RevokedTokens::new(config.refresh_token_ttl)))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config.clone())),
        )
        .await;
        let peer = "127.0.0.1:40002".parse().unwrap();

        let req = test::TestRequest::get()
            .uri("/api/v1/salary?username=an&start_date=yesterday&end_date=2026-01-31")
            .peer_addr(peer)
            .insert_header(("Authorization", bearer("an", Role::Staff)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer)
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"username\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
    }
}

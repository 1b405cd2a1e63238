use crate::{
    api::{catalogs, leave_requests, payslips, time_records, workers},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(login_limiter)
                .route(web::post().to(handlers::login)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/trabajador")
                    // /trabajador/fichajes
                    .service(
                        web::resource("/fichajes").route(web::get().to(time_records::worker_records)),
                    )
                    .service(
                        web::resource("/fichajes/iniciar").route(web::post().to(time_records::start)),
                    )
                    .service(
                        web::resource("/fichajes/finalizar").route(web::post().to(time_records::end)),
                    )
                    // /trabajador/permisos
                    .service(
                        web::resource("/permisos")
                            .route(web::get().to(leave_requests::worker_leaves))
                            .route(web::post().to(leave_requests::request)),
                    )
                    .service(
                        web::resource("/permisos/{id}")
                            .route(web::put().to(leave_requests::edit))
                            .route(web::delete().to(leave_requests::delete)),
                    )
                    // /trabajador/nominas
                    .service(web::resource("/nominas").route(web::get().to(payslips::list)))
                    .service(
                        web::resource("/nominas/{id}/download")
                            .route(web::get().to(payslips::download)),
                    ),
            )
            .service(
                web::scope("/empresa")
                    // /empresa/fichajes
                    .service(
                        web::resource("/fichajes")
                            .route(web::get().to(time_records::company_records))
                            .route(web::post().to(time_records::create)),
                    )
                    .service(
                        web::resource("/fichajes/{id}")
                            .route(web::put().to(time_records::edit))
                            .route(web::delete().to(time_records::delete)),
                    )
                    // /empresa/permisos
                    .service(
                        web::resource("/permisos").route(web::get().to(leave_requests::company_board)),
                    )
                    .service(
                        web::resource("/permisos/{id}/approve")
                            .route(web::put().to(leave_requests::approve)),
                    )
                    .service(
                        web::resource("/permisos/{id}/reject")
                            .route(web::put().to(leave_requests::reject)),
                    )
                    // /empresa/trabajadores
                    .service(web::resource("/trabajadores").route(web::get().to(workers::list)))
                    .service(
                        web::resource("/trabajadores/{id}/nominas")
                            .route(web::get().to(payslips::worker_list)),
                    )
                    .service(
                        web::resource("/trabajadores/{id}/nominas/{payslip_id}/download")
                            .route(web::get().to(payslips::worker_download)),
                    ),
            )
            .service(
                web::resource("/catalogos/{kind}").route(web::get().to(catalogs::get_catalog)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::tests::{SECRET, token_for};
    use crate::client::BackendGateway;
    use crate::services::CatalogCache;
    use actix_web::{App, http::StatusCode, test, web::Data};
    use std::net::SocketAddr;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".to_string(),
            backend_url: "http://127.0.0.1:9".to_string(),
            jwt_secret: Some(SECRET.to_string()),
            api_prefix: "/api".to_string(),
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            catalog_ttl_secs: 60,
            log_dir: "logs".to_string(),
        }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn call(role: &str, method: test::TestRequest, uri: &str) -> StatusCode {
        let config = config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(config.clone()))
                .app_data(Data::new(BackendGateway::new(
                    reqwest::Client::new(),
                    &config.backend_url,
                )))
                .app_data(Data::new(CatalogCache::new(Duration::from_secs(60))))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let token = token_for(role, 600);
        let req = method
            .uri(uri)
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn company_routes_reject_workers() {
        assert_eq!(
            call("ROLE_TRABAJADOR", test::TestRequest::get(), "/api/empresa/fichajes").await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            call("ROLE_TRABAJADOR", test::TestRequest::put(), "/api/empresa/permisos/3/approve").await,
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn worker_routes_reject_companies() {
        assert_eq!(
            call("ROLE_EMPRESA", test::TestRequest::post(), "/api/trabajador/fichajes/iniciar").await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            call("ROLE_EMPRESA", test::TestRequest::get(), "/api/trabajador/nominas").await,
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn worker_payslips_of_the_company_are_company_only() {
        assert_eq!(
            call("ROLE_TRABAJADOR", test::TestRequest::get(), "/api/empresa/trabajadores/7/nominas").await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            call(
                "ROLE_TRABAJADOR",
                test::TestRequest::get(),
                "/api/empresa/trabajadores/7/nominas/3/download"
            )
            .await,
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn unknown_catalog_is_not_found() {
        assert_eq!(
            call("ROLE_EMPRESA", test::TestRequest::get(), "/api/catalogos/nominas").await,
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn protected_routes_need_a_token() {
        let config = config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(config.clone()))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/trabajador/fichajes")
            .peer_addr(peer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}

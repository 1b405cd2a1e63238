use actix_web::{HttpResponse, Responder, web};

use crate::auth::Session;
use crate::client::BackendGateway;
use crate::error::AppError;
use crate::model::catalog::{CatalogEntry, CatalogKind};
use crate::services::CatalogCache;

#[utoipa::path(
    get,
    path = "/api/catalogos/{kind}",
    params(
        ("kind" = String, Path, description = "One of tipos-permiso, generos, formas-juridicas")
    ),
    responses(
        (status = 200, description = "Catalog entries with humanized labels", body = [CatalogEntry]),
        (status = 404, description = "Unknown catalog"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Catalogs"
)]
pub async fn get_catalog(
    session: Session,
    gateway: web::Data<BackendGateway>,
    catalogs: web::Data<CatalogCache>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let kind = CatalogKind::from_slug(&path)
        .ok_or_else(|| AppError::NotFound(format!("Unknown catalog {}", path.as_str())))?;

    let backend = gateway.for_session(&session);
    let entries = catalogs.get(kind, &backend).await?;

    Ok(HttpResponse::Ok().json(entries.as_slice()))
}

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::SearchQuery;
use crate::auth::Session;
use crate::client::BackendGateway;
use crate::model::catalog::{CatalogEntry, CatalogKind};
use crate::model::leave_request::{LeaveDraft, LeaveRequestView};
use crate::services::leave_requests::split_by_status;
use crate::services::{BoardMutation, CatalogCache, LeaveBoard, LeaveController, LeaveScope};
use crate::utils::search::filter_searchable;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerLeaves {
    pub items: Vec<LeaveRequestView>,
    /// Options for the request form
    pub leave_types: Vec<CatalogEntry>,
}

#[utoipa::path(
    get,
    path = "/api/trabajador/permisos",
    params(SearchQuery),
    responses(
        (status = 200, description = "Own leave requests, newest date first, plus leave types", body = WorkerLeaves),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn worker_leaves(
    session: Session,
    gateway: web::Data<BackendGateway>,
    catalogs: web::Data<CatalogCache>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let views = LeaveController::new(&backend, LeaveScope::Worker).load().await?;
    let leave_types = catalogs.get(CatalogKind::LeaveTypes, &backend).await?;

    Ok(HttpResponse::Ok().json(WorkerLeaves {
        items: filter_searchable(&views, &query.q),
        leave_types: leave_types.to_vec(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/trabajador/permisos",
    request_body = LeaveDraft,
    responses(
        (status = 200, description = "Leave requested; reloaded list", body = Object, example = json!({
            "notice": { "kind": "success", "message": "Permiso solicitado" },
            "items": []
        })),
        (status = 400, description = "Hours outside 0.25..=8 or not a quarter-hour step"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn request(
    session: Session,
    gateway: web::Data<BackendGateway>,
    payload: web::Json<LeaveDraft>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let done = LeaveController::new(&backend, LeaveScope::Worker)
        .request(&payload)
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    put,
    path = "/api/trabajador/permisos/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to edit")
    ),
    request_body = LeaveDraft,
    responses(
        (status = 200, description = "Leave edited; reloaded list", body = Object),
        (status = 400, description = "Invalid hours"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn edit(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
    payload: web::Json<LeaveDraft>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let done = LeaveController::new(&backend, LeaveScope::Worker)
        .edit(path.into_inner(), &payload)
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    delete,
    path = "/api/trabajador/permisos/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Leave deleted; reloaded list", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let done = LeaveController::new(&backend, LeaveScope::Worker)
        .delete(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    get,
    path = "/api/empresa/permisos",
    params(SearchQuery),
    responses(
        (status = 200, description = "Pending requests (oldest first) and resolved ones (newest first)", body = LeaveBoard),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn company_board(
    session: Session,
    gateway: web::Data<BackendGateway>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let views = LeaveController::new(&backend, LeaveScope::Company).load().await?;

    Ok(HttpResponse::Ok().json(split_by_status(filter_searchable(&views, &query.q))))
}

#[utoipa::path(
    put,
    path = "/api/empresa/permisos/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved; reloaded board", body = BoardMutation),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already resolved"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let done = LeaveController::new(&backend, LeaveScope::Company)
        .approve(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(BoardMutation::from(done)))
}

#[utoipa::path(
    put,
    path = "/api/empresa/permisos/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected; reloaded board", body = BoardMutation),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already resolved"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let done = LeaveController::new(&backend, LeaveScope::Company)
        .reject(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(BoardMutation::from(done)))
}

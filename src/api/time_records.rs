use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::SearchQuery;
use crate::auth::Session;
use crate::client::BackendGateway;
use crate::model::time_record::{TimeRecordDraft, TimeRecordView};
use crate::services::{ClockState, RecordScope, TimeRecordController};
use crate::utils::clock::SystemClock;
use crate::utils::search::filter_searchable;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTimeRecords {
    /// No record is open, so a new one may be started
    pub can_start: bool,
    /// A record is open and may be ended
    pub can_end: bool,
    #[schema(example = 12)]
    pub open_record_id: Option<u64>,
    pub items: Vec<TimeRecordView>,
}

#[utoipa::path(
    get,
    path = "/api/trabajador/fichajes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Own time records, newest first, with clock state", body = WorkerTimeRecords),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Backend error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn worker_records(
    session: Session,
    gateway: web::Data<BackendGateway>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let views = TimeRecordController::new(&backend, &SystemClock, RecordScope::Worker)
        .load()
        .await?;
    let state = ClockState::from_views(&views);

    Ok(HttpResponse::Ok().json(WorkerTimeRecords {
        can_start: state.can_start(),
        can_end: state.can_end(),
        open_record_id: state.open_record(),
        items: filter_searchable(&views, &query.q),
    }))
}

#[utoipa::path(
    post,
    path = "/api/trabajador/fichajes/iniciar",
    responses(
        (status = 200, description = "Record opened; reloaded list", body = Object, example = json!({
            "notice": { "kind": "success", "message": "Fichaje iniciado" },
            "items": []
        })),
        (status = 409, description = "A record is already open"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn start(
    session: Session,
    gateway: web::Data<BackendGateway>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let done = TimeRecordController::new(&backend, &SystemClock, RecordScope::Worker)
        .start()
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    post,
    path = "/api/trabajador/fichajes/finalizar",
    responses(
        (status = 200, description = "Open record closed; reloaded list", body = Object, example = json!({
            "notice": { "kind": "success", "message": "Fichaje finalizado" },
            "items": []
        })),
        (status = 404, description = "No open record"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn end(
    session: Session,
    gateway: web::Data<BackendGateway>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let done = TimeRecordController::new(&backend, &SystemClock, RecordScope::Worker)
        .end()
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    get,
    path = "/api/empresa/fichajes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Company time records, newest first", body = [TimeRecordView]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn company_records(
    session: Session,
    gateway: web::Data<BackendGateway>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let views = TimeRecordController::new(&backend, &SystemClock, RecordScope::Company)
        .load()
        .await?;

    Ok(HttpResponse::Ok().json(filter_searchable(&views, &query.q)))
}

#[utoipa::path(
    post,
    path = "/api/empresa/fichajes",
    request_body = TimeRecordDraft,
    responses(
        (status = 200, description = "Record created; reloaded list", body = Object, example = json!({
            "notice": { "kind": "success", "message": "Fichaje creado" },
            "items": []
        })),
        (status = 400, description = "Start after end, or start in the future"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn create(
    session: Session,
    gateway: web::Data<BackendGateway>,
    payload: web::Json<TimeRecordDraft>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let done = TimeRecordController::new(&backend, &SystemClock, RecordScope::Company)
        .create(&payload)
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    put,
    path = "/api/empresa/fichajes/{record_id}",
    params(
        ("record_id" = u64, Path, description = "ID of the time record to edit")
    ),
    request_body = TimeRecordDraft,
    responses(
        (status = 200, description = "Record edited; reloaded list", body = Object),
        (status = 400, description = "Start after end"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn edit(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
    payload: web::Json<TimeRecordDraft>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let done = TimeRecordController::new(&backend, &SystemClock, RecordScope::Company)
        .edit(path.into_inner(), &payload)
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

#[utoipa::path(
    delete,
    path = "/api/empresa/fichajes/{record_id}",
    params(
        ("record_id" = u64, Path, description = "ID of the time record to delete")
    ),
    responses(
        (status = 200, description = "Record deleted; reloaded list", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time records"
)]
pub async fn delete(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let done = TimeRecordController::new(&backend, &SystemClock, RecordScope::Company)
        .delete(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(done))
}

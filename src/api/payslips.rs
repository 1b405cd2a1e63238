use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, web};

use crate::auth::Session;
use crate::client::BackendGateway;
use crate::model::payslip::{PayslipFile, PayslipMetadata};
use crate::services::payslips;

#[utoipa::path(
    get,
    path = "/api/trabajador/nominas",
    responses(
        (status = 200, description = "Own payslips, latest period first", body = [PayslipMetadata]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payslips"
)]
pub async fn list(
    session: Session,
    gateway: web::Data<BackendGateway>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    Ok(HttpResponse::Ok().json(payslips::list(&backend).await?))
}

#[utoipa::path(
    get,
    path = "/api/trabajador/nominas/{payslip_id}/download",
    params(
        ("payslip_id" = u64, Path, description = "ID of the payslip to download")
    ),
    responses(
        (status = 200, description = "Payslip PDF as an attachment"),
        (status = 404, description = "Payslip not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payslips"
)]
pub async fn download(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_worker()?;

    let backend = gateway.for_session(&session);
    let file = payslips::download(&backend, path.into_inner()).await?;

    Ok(attachment(file))
}

#[utoipa::path(
    get,
    path = "/api/empresa/trabajadores/{worker_id}/nominas",
    params(
        ("worker_id" = u64, Path, description = "ID of a worker of the company")
    ),
    responses(
        (status = 200, description = "The worker's payslips, latest period first", body = [PayslipMetadata]),
        (status = 404, description = "Worker not found in the company"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payslips"
)]
pub async fn worker_list(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    Ok(HttpResponse::Ok().json(payslips::list_for_worker(&backend, path.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/empresa/trabajadores/{worker_id}/nominas/{payslip_id}/download",
    params(
        ("worker_id" = u64, Path, description = "ID of a worker of the company"),
        ("payslip_id" = u64, Path, description = "ID of the payslip to download")
    ),
    responses(
        (status = 200, description = "Payslip PDF as an attachment"),
        (status = 404, description = "Worker or payslip not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payslips"
)]
pub async fn worker_download(
    session: Session,
    gateway: web::Data<BackendGateway>,
    path: web::Path<(u64, u64)>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let (worker_id, payslip_id) = path.into_inner();
    let backend = gateway.for_session(&session);
    let file = payslips::download_for_worker(&backend, worker_id, payslip_id).await?;

    Ok(attachment(file))
}

fn attachment(file: PayslipFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.filename)],
        })
        .body(file.bytes)
}

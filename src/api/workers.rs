use actix_web::{HttpResponse, Responder, web};

use crate::api::SearchQuery;
use crate::auth::Session;
use crate::client::BackendGateway;
use crate::model::worker::WorkerView;
use crate::services::workers;
use crate::utils::search::filter_searchable;

#[utoipa::path(
    get,
    path = "/api/empresa/trabajadores",
    params(SearchQuery),
    responses(
        (status = 200, description = "Workers of the company matching the query", body = [WorkerView]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Workers"
)]
pub async fn list(
    session: Session,
    gateway: web::Data<BackendGateway>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<impl Responder> {
    session.require_company()?;

    let backend = gateway.for_session(&session);
    let all = workers::list(&backend).await?;

    Ok(HttpResponse::Ok().json(filter_searchable(&all, &query.q)))
}

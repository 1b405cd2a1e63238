use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::session::SessionProvider;
use crate::client::backend::{Backend, Endpoint, HttpMethod, RawDownload};
use crate::error::AppError;
use crate::models::{ApiResponse, BackendToken, LoginReqDto, ResponseStatus};

/// Shared HTTP client and backend location, kept in application data.
#[derive(Clone)]
pub struct BackendGateway {
    client: Client,
    base_url: String,
}

impl BackendGateway {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Backend handle that authenticates as `session`.
    pub fn for_session<S: SessionProvider>(&self, session: S) -> HttpBackend<S> {
        HttpBackend {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session,
        }
    }

    /// Exchanges credentials for a bearer token. No envelope on this endpoint.
    pub async fn login(&self, credentials: &LoginReqDto) -> Result<String, AppError> {
        let url = format!("{}{}", self.base_url, Endpoint::Login.path());
        let resp = self
            .client
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => {
                let body: BackendToken = resp
                    .json()
                    .await
                    .map_err(|e| AppError::Transport(format!("unreadable login response: {e}")))?;
                Ok(body.token)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::Unauthorized("Invalid credentials".to_string()))
            }
            status => Err(AppError::Backend(format!("login failed with status {status}"))),
        }
    }
}

/// [`Backend`] over HTTP, attaching the bearer token of `S` to every call.
pub struct HttpBackend<S> {
    client: Client,
    base_url: String,
    session: S,
}

impl<S: SessionProvider> HttpBackend<S> {
    fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let builder = match endpoint.method() {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        match self.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl<S: SessionProvider + Send + Sync> Backend for HttpBackend<S> {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<Value, AppError> {
        debug!(method = ?endpoint.method(), path = endpoint.path(), "Calling backend");

        let mut req = self.request(endpoint);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await.map_err(|e| {
            error!(error = %e, path = endpoint.path(), "Backend request failed");
            AppError::Transport(e.to_string())
        })?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        interpret(status, &bytes).inspect_err(|e| {
            warn!(error = %e, status = status.as_u16(), path = endpoint.path(), "Backend rejected call");
        })
    }

    async fn download(&self, endpoint: Endpoint, body: Value) -> Result<RawDownload, AppError> {
        debug!(path = endpoint.path(), "Downloading from backend");

        let resp = self
            .request(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;
        let status = resp.status();

        if !status.is_success() {
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| AppError::Transport(e.to_string()))?;
            return Err(interpret(status, &bytes)
                .err()
                .unwrap_or_else(|| AppError::Backend(format!("download failed with status {status}"))));
        }

        let header = |name: HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_disposition = header(CONTENT_DISPOSITION);
        let content_type = header(CONTENT_TYPE);
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        Ok(RawDownload {
            content_disposition,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Maps a backend status and body onto the envelope's `data` or an [`AppError`].
pub fn interpret(status: StatusCode, body: &[u8]) -> Result<Value, AppError> {
    let envelope = serde_json::from_slice::<ApiResponse<Value>>(body).ok();

    if status.is_success() {
        return match envelope {
            Some(ApiResponse {
                estado: ResponseStatus::Exito,
                data,
            }) => Ok(data.unwrap_or(Value::Null)),
            Some(ApiResponse { data, .. }) => Err(AppError::Backend(message_of(data, status))),
            None => Err(AppError::Transport(format!(
                "backend answered {status} without a readable envelope"
            ))),
        };
    }

    let message = message_of(envelope.and_then(|e| e.data), status);
    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::BAD_REQUEST => AppError::Rejected(message),
        _ => AppError::Backend(message),
    })
}

fn message_of(data: Option<Value>, status: StatusCode) -> String {
    match data {
        Some(Value::String(msg)) if !msg.is_empty() => msg,
        _ => format!(
            "backend error ({})",
            status.canonical_reason().unwrap_or(status.as_str())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionStore;
    use crate::client::fake::StubServer;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{HttpRequest, HttpResponse, web};
    use serde_json::json;

    async fn echo(req: HttpRequest) -> HttpResponse {
        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        HttpResponse::Ok().json(json!({
            "estado": "exito",
            "data": {
                "method": req.method().as_str(),
                "path": req.path(),
                "authorization": authorization,
            }
        }))
    }

    async fn payslip_pdf(body: web::Json<Value>) -> HttpResponse {
        if body["id"] == 404 {
            return HttpResponse::NotFound().json(json!({ "estado": "error", "data": "Nómina no encontrada" }));
        }
        HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(("content-disposition", r#"attachment; filename="nomina-marzo.pdf""#))
            .body(&b"%PDF-1.4"[..])
    }

    fn stub_routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/nominas/descargar", web::post().to(payslip_pdf))
            .service(web::resource("/{tail:.*}").to(echo));
    }

    #[actix_web::test]
    async fn every_call_carries_the_session_bearer() {
        let stub = StubServer::start(stub_routes);
        let store = SessionStore::default();
        store.login("abc");
        let gateway = BackendGateway::new(Client::new(), &stub.base_url);
        let backend = gateway.for_session(&store);

        let posted = backend.send(Endpoint::StartTimeRecord, None).await.unwrap();
        assert_eq!(
            posted,
            json!({ "method": "POST", "path": "/fichajes/iniciar", "authorization": "Bearer abc" })
        );

        let read = backend.send(Endpoint::Genders, None).await.unwrap();
        assert_eq!(read["method"], "GET");
        assert_eq!(read["path"], "/generos");
        assert_eq!(read["authorization"], "Bearer abc");

        store.logout();
        let anonymous = backend.send(Endpoint::CompanyWorkers, None).await.unwrap();
        assert_eq!(anonymous["authorization"], Value::Null);

        stub.stop().await;
    }

    #[actix_web::test]
    async fn download_keeps_naming_headers() {
        let stub = StubServer::start(stub_routes);
        let store = SessionStore::default();
        store.login("abc");
        let gateway = BackendGateway::new(Client::new(), &stub.base_url);
        let backend = gateway.for_session(&store);

        let raw = backend
            .download(Endpoint::DownloadPayslip, json!({ "id": 3 }))
            .await
            .unwrap();
        assert_eq!(
            raw.content_disposition.as_deref(),
            Some(r#"attachment; filename="nomina-marzo.pdf""#)
        );
        assert_eq!(raw.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(raw.bytes, b"%PDF-1.4");

        let missing = backend
            .download(Endpoint::DownloadPayslip, json!({ "id": 404 }))
            .await;
        assert_eq!(missing.unwrap_err(), AppError::NotFound("Nómina no encontrada".into()));

        stub.stop().await;
    }

    fn body(v: Value) -> Vec<u8> {
        serde_json::to_vec(&v).unwrap()
    }

    #[test]
    fn success_envelope_unwraps_data() {
        let data = interpret(
            StatusCode::OK,
            &body(json!({ "estado": "exito", "data": [1, 2] })),
        );
        assert_eq!(data, Ok(json!([1, 2])));

        let empty = interpret(StatusCode::OK, &body(json!({ "estado": "exito" })));
        assert_eq!(empty, Ok(Value::Null));
    }

    #[test]
    fn error_envelope_is_a_backend_error_even_with_200() {
        let err = interpret(
            StatusCode::OK,
            &body(json!({ "estado": "error", "data": "Trabajador no encontrado" })),
        );
        assert_eq!(err, Err(AppError::Backend("Trabajador no encontrado".into())));
    }

    #[test]
    fn bad_request_is_a_rejection_with_backend_message() {
        let err = interpret(
            StatusCode::BAD_REQUEST,
            &body(json!({ "estado": "error", "data": "Ya existe un fichaje abierto para el trabajador" })),
        );
        assert_eq!(
            err,
            Err(AppError::Rejected("Ya existe un fichaje abierto para el trabajador".into()))
        );
    }

    #[test]
    fn status_classes() {
        assert!(matches!(interpret(StatusCode::FORBIDDEN, b""), Err(AppError::Forbidden(_))));
        assert!(matches!(interpret(StatusCode::UNAUTHORIZED, b""), Err(AppError::Unauthorized(_))));
        assert!(matches!(interpret(StatusCode::CONFLICT, b""), Err(AppError::Conflict(_))));
        assert!(matches!(interpret(StatusCode::NOT_FOUND, b"<html>"), Err(AppError::NotFound(_))));
        assert_eq!(
            interpret(StatusCode::INTERNAL_SERVER_ERROR, b""),
            Err(AppError::Backend("backend error (Internal Server Error)".into()))
        );
    }

    #[test]
    fn unreadable_success_is_a_transport_error() {
        assert!(matches!(interpret(StatusCode::OK, b"not json"), Err(AppError::Transport(_))));
    }
}

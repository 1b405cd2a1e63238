use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// Logical endpoints of the HR backend used by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CompanyTimeRecords,
    WorkerTimeRecords,
    StartTimeRecord,
    EndTimeRecord,
    CreateTimeRecord,
    EditTimeRecord,
    DeleteTimeRecord,
    LeaveTypes,
    RequestLeave,
    EditLeave,
    ResolveLeave,
    DeleteLeave,
    CompanyLeaves,
    WorkerLeaves,
    WorkerPayslips,
    PayslipsOfWorker,
    DownloadPayslip,
    CompanyWorkers,
    Genders,
    LegalForms,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CompanyTimeRecords => "/empresa/fichajes",
            Endpoint::WorkerTimeRecords => "/trabajador/fichajes",
            Endpoint::StartTimeRecord => "/fichajes/iniciar",
            Endpoint::EndTimeRecord => "/fichajes/finalizar",
            Endpoint::CreateTimeRecord => "/fichajes/crear",
            Endpoint::EditTimeRecord => "/fichajes/editar",
            Endpoint::DeleteTimeRecord => "/fichajes/eliminar",
            Endpoint::LeaveTypes => "/permisos",
            Endpoint::RequestLeave => "/permisos/solicitar",
            Endpoint::EditLeave => "/permisos/editar",
            Endpoint::ResolveLeave => "/permisos/validar",
            Endpoint::DeleteLeave => "/permisos/eliminar",
            Endpoint::CompanyLeaves => "/permisos/empresa/id",
            Endpoint::WorkerLeaves => "/permisos/trabajador/id",
            Endpoint::WorkerPayslips => "/nominas/trabajador-email",
            Endpoint::PayslipsOfWorker => "/nominas/trabajador",
            Endpoint::DownloadPayslip => "/nominas/descargar",
            Endpoint::CompanyWorkers => "/empresa/trabajadores",
            Endpoint::Genders => "/generos",
            Endpoint::LegalForms => "/formasjuridicas",
            Endpoint::Login => "/auth/login",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::LeaveTypes | Endpoint::Genders | Endpoint::LegalForms => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }
}

/// Binary body plus the headers needed to name it.
#[derive(Debug, Clone, Default)]
pub struct RawDownload {
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The REST collaborator every controller talks through.
///
/// Implementations attach credentials themselves; callers only name the
/// endpoint and the JSON body.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Calls `endpoint` and returns the `data` of a successful envelope
    /// (`Value::Null` when absent).
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<Value, AppError>;

    async fn download(&self, endpoint: Endpoint, body: Value) -> Result<RawDownload, AppError>;
}

/// Calls `endpoint` and decodes its `data` as a list; a missing `data` is empty.
pub async fn fetch_list<T, B>(backend: &B, endpoint: Endpoint, body: Option<Value>) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned,
    B: Backend + ?Sized,
{
    match backend.send(endpoint, body).await? {
        Value::Null => Ok(Vec::new()),
        data => decode(endpoint, data),
    }
}

/// JSON body for a backend call.
pub fn to_body<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Validation(format!("unencodable request: {e}")))
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, data: Value) -> Result<T, AppError> {
    serde_json::from_value(data).map_err(|e| {
        tracing::error!(error = %e, path = endpoint.path(), "Unexpected backend payload");
        AppError::Transport(format!("unexpected payload from {}: {e}", endpoint.path()))
    })
}

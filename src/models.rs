use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope every backend endpoint answers with.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub estado: ResponseStatus,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Exito,
    Error,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "ana@empresa.es")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}

/// Token issued by the backend's `/auth/login`.
#[derive(Debug, Deserialize)]
pub struct BackendToken {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Dashboard the client should navigate to.
    #[schema(example = "/empresa")]
    pub redirect: String,
}

/// Claims read from the backend's bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    #[serde(default)]
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Result of a successful mutation: the notice plus the reloaded list.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
    pub notice: Notice,
    pub items: Vec<T>,
}

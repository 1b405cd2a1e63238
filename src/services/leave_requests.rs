//! Leave requests ("permisos"): requesting, editing and resolving.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::client::backend::{Backend, Endpoint, fetch_list, to_body};
use crate::error::AppError;
use crate::model::leave_request::{Decision, LeaveDraft, LeaveRequest, LeaveRequestView};
use crate::models::{Mutation, Notice};

/// Whose requests a controller loads and may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveScope {
    Worker,
    Company,
}

impl LeaveScope {
    fn list_endpoint(self) -> Endpoint {
        match self {
            LeaveScope::Worker => Endpoint::WorkerLeaves,
            LeaveScope::Company => Endpoint::CompanyLeaves,
        }
    }
}

/// Company dashboard: open requests first, decisions already taken below.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct LeaveBoard {
    /// Oldest date first.
    pub pending: Vec<LeaveRequestView>,
    /// Newest date first.
    pub resolved: Vec<LeaveRequestView>,
}

/// Orders by date, newest first when `descending`; undated requests go last
/// either way.
fn by_date(a: &LeaveRequestView, b: &LeaveRequestView, descending: bool) -> Ordering {
    match (a.request.date, b.request.date) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_newest_first(views: &mut [LeaveRequestView]) {
    views.sort_by(|a, b| by_date(a, b, true));
}

pub fn split_by_status(views: Vec<LeaveRequestView>) -> LeaveBoard {
    let (mut resolved, mut pending): (Vec<_>, Vec<_>) = views
        .into_iter()
        .partition(|v| v.request.status.is_terminal());

    pending.sort_by(|a, b| by_date(a, b, false));
    resolved.sort_by(|a, b| by_date(a, b, true));

    LeaveBoard { pending, resolved }
}

/// Company answer to a decision: the notice plus the reloaded board.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardMutation {
    pub notice: Notice,
    pub items: LeaveBoard,
}

impl From<Mutation<LeaveRequestView>> for BoardMutation {
    fn from(done: Mutation<LeaveRequestView>) -> Self {
        Self {
            notice: done.notice,
            items: split_by_status(done.items),
        }
    }
}

#[derive(Serialize)]
struct LeaveEdit<'a> {
    id: u64,
    #[serde(flatten)]
    draft: &'a LeaveDraft,
}

pub struct LeaveController<'a> {
    backend: &'a dyn Backend,
    scope: LeaveScope,
}

impl<'a> LeaveController<'a> {
    pub fn new(backend: &'a dyn Backend, scope: LeaveScope) -> Self {
        Self { backend, scope }
    }

    /// Every request of the scope, newest date first.
    pub async fn load(&self) -> Result<Vec<LeaveRequestView>, AppError> {
        let requests: Vec<LeaveRequest> =
            fetch_list(self.backend, self.scope.list_endpoint(), None).await?;
        let mut views: Vec<LeaveRequestView> =
            requests.into_iter().map(LeaveRequestView::from).collect();
        sort_newest_first(&mut views);
        Ok(views)
    }

    /// New request in state SOLICITADO for the signed-in worker.
    pub async fn request(&self, draft: &LeaveDraft) -> Result<Mutation<LeaveRequestView>, AppError> {
        draft.validate()?;

        self.backend
            .send(Endpoint::RequestLeave, Some(to_body(draft)?))
            .await
            .map_err(|e| {
                error!(error = %e, leave_type = %draft.leave_type, "Failed to request leave");
                e
            })?;

        info!(leave_type = %draft.leave_type, hours = draft.hours, "Leave requested");
        self.reloaded("Permiso solicitado").await
    }

    /// Changes type, date or hours. The current status is not checked here.
    pub async fn edit(&self, id: u64, draft: &LeaveDraft) -> Result<Mutation<LeaveRequestView>, AppError> {
        draft.validate()?;

        let body = to_body(&LeaveEdit { id, draft })?;
        self.backend
            .send(Endpoint::EditLeave, Some(body))
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to edit leave request");
                e
            })?;

        info!(id, "Leave request edited");
        self.reloaded("Permiso editado").await
    }

    pub async fn approve(&self, id: u64) -> Result<Mutation<LeaveRequestView>, AppError> {
        self.resolve(id, Decision::Approve).await
    }

    pub async fn reject(&self, id: u64) -> Result<Mutation<LeaveRequestView>, AppError> {
        self.resolve(id, Decision::Reject).await
    }

    /// Moves a SOLICITADO request to its terminal state.
    ///
    /// The transition is checked against a fresh copy of the list, so an
    /// unknown id or an already resolved request never reaches the backend.
    async fn resolve(&self, id: u64, decision: Decision) -> Result<Mutation<LeaveRequestView>, AppError> {
        if self.scope != LeaveScope::Company {
            return Err(AppError::Forbidden(
                "Only companies resolve leave requests".to_string(),
            ));
        }

        let current = self
            .load()
            .await?
            .into_iter()
            .find(|v| v.request.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Leave request {id} not found")))?;

        let target = current.request.status.resolve(decision).map_err(|e| {
            warn!(id, status = %current.request.status, "Leave request already resolved");
            e
        })?;

        self.backend
            .send(
                Endpoint::ResolveLeave,
                Some(json!({ "id": id, "estado": target })),
            )
            .await
            .map_err(|e| {
                error!(error = %e, id, status = %target, "Failed to resolve leave request");
                e
            })?;

        info!(id, status = %target, "Leave request resolved");
        let message = match decision {
            Decision::Approve => "Permiso aprobado",
            Decision::Reject => "Permiso rechazado",
        };
        self.reloaded(message).await
    }

    pub async fn delete(&self, id: u64) -> Result<Mutation<LeaveRequestView>, AppError> {
        self.backend
            .send(Endpoint::DeleteLeave, Some(json!({ "id": id })))
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to delete leave request");
                e
            })?;

        info!(id, "Leave request deleted");
        self.reloaded("Permiso eliminado").await
    }

    async fn reloaded(&self, message: &str) -> Result<Mutation<LeaveRequestView>, AppError> {
        Ok(Mutation {
            notice: Notice::success(message),
            items: self.load().await?,
        })
    }
}

//! Time records ("fichajes"): derived views and the clock-in/clock-out lifecycle.
//!
//! The backend owns every invariant, including "at most one open record per
//! worker". This side validates what it can before a call, then reloads the
//! whole list after any successful mutation.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::client::backend::{Backend, Endpoint, fetch_list, to_body};
use crate::error::AppError;
use crate::model::time_record::{TimeRecord, TimeRecordDraft, TimeRecordView};
use crate::models::{Mutation, Notice};
use crate::utils::clock::Clock;

/// Enriched views, most recent start first.
///
/// Records sharing a start keep their input order. Open records measure up to
/// `now`, so aggregating again later yields a longer duration.
pub fn aggregate(records: &[TimeRecord], now: NaiveDateTime) -> Vec<TimeRecordView> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    sorted
        .into_iter()
        .map(|record| TimeRecordView::new(record, now))
        .collect()
}

/// Per-worker clock state as last loaded: `Closed --start--> Open --end--> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Open { record_id: u64 },
    Closed,
}

impl ClockState {
    pub fn from_views(views: &[TimeRecordView]) -> Self {
        views
            .iter()
            .find(|v| v.record.is_open())
            .map_or(ClockState::Closed, |v| ClockState::Open {
                record_id: v.record.id,
            })
    }

    pub fn can_start(self) -> bool {
        self == ClockState::Closed
    }

    pub fn can_end(self) -> bool {
        !self.can_start()
    }

    pub fn open_record(self) -> Option<u64> {
        match self {
            ClockState::Open { record_id } => Some(record_id),
            ClockState::Closed => None,
        }
    }
}

/// Whose records a controller loads and reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// The signed-in worker's own records.
    Worker,
    /// Every record of the signed-in company.
    Company,
}

impl RecordScope {
    fn list_endpoint(self) -> Endpoint {
        match self {
            RecordScope::Worker => Endpoint::WorkerTimeRecords,
            RecordScope::Company => Endpoint::CompanyTimeRecords,
        }
    }
}

#[derive(Serialize)]
struct TimeRecordEdit<'a> {
    id: u64,
    #[serde(flatten)]
    draft: &'a TimeRecordDraft,
}

pub struct TimeRecordController<'a> {
    backend: &'a dyn Backend,
    clock: &'a dyn Clock,
    scope: RecordScope,
}

impl<'a> TimeRecordController<'a> {
    pub fn new(backend: &'a dyn Backend, clock: &'a dyn Clock, scope: RecordScope) -> Self {
        Self {
            backend,
            clock,
            scope,
        }
    }

    pub async fn load(&self) -> Result<Vec<TimeRecordView>, AppError> {
        let records: Vec<TimeRecord> =
            fetch_list(self.backend, self.scope.list_endpoint(), None).await?;
        Ok(aggregate(&records, self.clock.now()))
    }

    /// Opens a record for the signed-in worker; the backend stamps the start.
    ///
    /// A 400 rejection means a record is already open and surfaces as a
    /// conflict; other failures keep their class.
    pub async fn start(&self) -> Result<Mutation<TimeRecordView>, AppError> {
        self.backend
            .send(Endpoint::StartTimeRecord, None)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to start time record");
                e.rejected_as_conflict()
            })?;

        info!("Time record started");
        self.reloaded("Fichaje iniciado").await
    }

    /// Closes the signed-in worker's open record; the backend stamps the end.
    pub async fn end(&self) -> Result<Mutation<TimeRecordView>, AppError> {
        self.backend
            .send(Endpoint::EndTimeRecord, None)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to end time record");
                e.rejected_as_not_found()
            })?;

        info!("Time record ended");
        self.reloaded("Fichaje finalizado").await
    }

    /// Manual entry by a company. The start may not lie in the future.
    pub async fn create(&self, draft: &TimeRecordDraft) -> Result<Mutation<TimeRecordView>, AppError> {
        validate_order(draft)?;
        if draft.start_time > self.clock.now() {
            return Err(AppError::Validation(
                "start time cannot be in the future".to_string(),
            ));
        }

        self.backend
            .send(Endpoint::CreateTimeRecord, Some(to_body(draft)?))
            .await
            .map_err(|e| {
                error!(error = %e, worker_id = draft.worker_id, "Failed to create time record");
                e
            })?;

        info!(worker_id = draft.worker_id, "Time record created");
        self.reloaded("Fichaje creado").await
    }

    /// Historical correction; only the start/end order is checked.
    pub async fn edit(&self, id: u64, draft: &TimeRecordDraft) -> Result<Mutation<TimeRecordView>, AppError> {
        validate_order(draft)?;

        let body = to_body(&TimeRecordEdit { id, draft })?;
        self.backend
            .send(Endpoint::EditTimeRecord, Some(body))
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to edit time record");
                e
            })?;

        info!(id, "Time record edited");
        self.reloaded("Fichaje editado").await
    }

    pub async fn delete(&self, id: u64) -> Result<Mutation<TimeRecordView>, AppError> {
        self.backend
            .send(Endpoint::DeleteTimeRecord, Some(json!({ "id": id })))
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to delete time record");
                e
            })?;

        info!(id, "Time record deleted");
        self.reloaded("Fichaje eliminado").await
    }

    async fn reloaded(&self, message: &str) -> Result<Mutation<TimeRecordView>, AppError> {
        Ok(Mutation {
            notice: Notice::success(message),
            items: self.load().await?,
        })
    }
}

fn validate_order(draft: &TimeRecordDraft) -> Result<(), AppError> {
    match draft.end_time {
        Some(end) if draft.start_time > end => Err(AppError::Validation(
            "start time must not be after end time".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBackend;
    use crate::client::http::interpret;
    use crate::model::wire::parse_datetime;
    use reqwest::StatusCode;
    use crate::models::NoticeKind;
    use crate::utils::clock::FixedClock;
    use serde_json::Value;

    fn at(ts: &str) -> NaiveDateTime {
        parse_datetime(ts).unwrap()
    }

    fn record(id: u64, start: &str, end: Option<&str>) -> TimeRecord {
        TimeRecord {
            id,
            worker: None,
            company: None,
            start_time: at(start),
            end_time: end.map(at),
        }
    }

    fn listing(records: &[TimeRecord]) -> Value {
        serde_json::to_value(records).unwrap()
    }

    fn draft(start: &str, end: Option<&str>) -> TimeRecordDraft {
        TimeRecordDraft {
            worker_id: 7,
            company_id: 1,
            start_time: at(start),
            end_time: end.map(at),
        }
    }

    #[test]
    fn aggregate_sorts_descending_and_keeps_every_record() {
        let records = vec![
            record(1, "2024-01-01T08:00", Some("2024-01-01T12:00")),
            record(2, "2024-01-03T08:00", Some("2024-01-03T09:00")),
            record(3, "2024-01-02T08:00", None),
            record(4, "2024-01-03T08:00", None),
        ];
        let views = aggregate(&records, at("2024-01-04T00:00"));

        let ids: Vec<u64> = views.iter().map(|v| v.record.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
        assert!(views.windows(2).all(|w| w[0].record.start_time >= w[1].record.start_time));
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn closed_record_elapsed() {
        let records = vec![record(1, "2024-01-01T08:00", Some("2024-01-01T12:30"))];
        let views = aggregate(&records, at("2030-01-01T00:00"));
        assert_eq!(views[0].elapsed_formatted, "4h 30m");
    }

    #[test]
    fn open_record_grows_with_now() {
        let records = vec![record(1, "2024-01-01T08:00", None)];

        let first = aggregate(&records, at("2024-01-01T09:15"));
        let later = aggregate(&records, at("2024-01-01T11:05"));

        assert_eq!(first[0].elapsed_formatted, "1h 15m");
        assert_eq!(later[0].elapsed_formatted, "3h 05m");
        assert_eq!(first[0].end_formatted, "—");
    }

    #[test]
    fn clock_state_follows_open_record() {
        let now = at("2024-01-02T10:00");
        let closed = aggregate(&[record(1, "2024-01-01T08:00", Some("2024-01-01T09:00"))], now);
        assert_eq!(ClockState::from_views(&closed), ClockState::Closed);
        assert!(ClockState::Closed.can_start());

        let open = aggregate(
            &[
                record(1, "2024-01-01T08:00", Some("2024-01-01T09:00")),
                record(2, "2024-01-02T08:00", None),
            ],
            now,
        );
        let state = ClockState::from_views(&open);
        assert_eq!(state, ClockState::Open { record_id: 2 });
        assert!(state.can_end() && !state.can_start());
        assert_eq!(state.open_record(), Some(2));
    }

    #[actix_web::test]
    async fn start_reloads_worker_list() {
        let backend = FakeBackend::new()
            .ok(Endpoint::StartTimeRecord, Value::Null)
            .ok(
                Endpoint::WorkerTimeRecords,
                listing(&[record(5, "2024-01-01T08:00", None)]),
            );
        let clock = FixedClock(at("2024-01-01T08:30"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Worker);

        let done = controller.start().await.unwrap();

        assert_eq!(done.notice.kind, NoticeKind::Success);
        assert_eq!(done.items.len(), 1);
        assert_eq!(done.items[0].elapsed_formatted, "0h 30m");
        assert_eq!(
            backend.endpoints(),
            vec![Endpoint::StartTimeRecord, Endpoint::WorkerTimeRecords]
        );
        assert_eq!(backend.calls()[0].1, None);
    }

    #[actix_web::test]
    async fn start_while_open_is_a_conflict_without_reload() {
        let backend = FakeBackend::new().fail(
            Endpoint::StartTimeRecord,
            AppError::Rejected("Ya existe un fichaje abierto".into()),
        );
        let clock = FixedClock(at("2024-01-01T08:30"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Worker);

        let err = controller.start().await.unwrap_err();

        assert_eq!(err, AppError::Conflict("Ya existe un fichaje abierto".into()));
        assert_eq!(backend.endpoints(), vec![Endpoint::StartTimeRecord]);
    }

    #[actix_web::test]
    async fn end_without_open_record_is_not_found() {
        let backend = FakeBackend::new().fail(
            Endpoint::EndTimeRecord,
            AppError::Rejected("No hay fichaje abierto".into()),
        );
        let clock = FixedClock(at("2024-01-01T08:30"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Worker);

        assert!(matches!(controller.end().await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn transport_failures_keep_their_class() {
        let backend = FakeBackend::new()
            .fail(Endpoint::StartTimeRecord, AppError::Transport("timeout".into()));
        let clock = FixedClock(at("2024-01-01T08:30"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Worker);

        assert!(matches!(controller.start().await, Err(AppError::Transport(_))));
    }

    #[actix_web::test]
    async fn server_errors_stay_backend_errors() {
        let failure = interpret(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"estado":"error","data":"No se pudo iniciar el fichaje"}"#,
        );
        let backend = FakeBackend::new()
            .reply(Endpoint::StartTimeRecord, failure)
            .reply(Endpoint::EndTimeRecord, interpret(StatusCode::INTERNAL_SERVER_ERROR, b""));
        let clock = FixedClock(at("2024-01-01T08:30"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Worker);

        assert_eq!(
            controller.start().await.unwrap_err(),
            AppError::Backend("No se pudo iniciar el fichaje".into())
        );
        assert_eq!(
            controller.end().await.unwrap_err(),
            AppError::Backend("backend error (Internal Server Error)".into())
        );
        assert_eq!(
            backend.endpoints(),
            vec![Endpoint::StartTimeRecord, Endpoint::EndTimeRecord]
        );
    }

    #[actix_web::test]
    async fn create_validates_before_calling_backend() {
        let backend = FakeBackend::new();
        let clock = FixedClock(at("2024-01-01T10:00"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Company);

        let reversed = draft("2024-01-01T09:00", Some("2024-01-01T08:00"));
        assert!(matches!(controller.create(&reversed).await, Err(AppError::Validation(_))));

        let future = draft("2024-01-01T11:00", None);
        assert!(matches!(controller.create(&future).await, Err(AppError::Validation(_))));

        assert!(backend.calls().is_empty());
    }

    #[actix_web::test]
    async fn create_sends_draft_and_reloads_company_list() {
        let backend = FakeBackend::new()
            .ok(Endpoint::CreateTimeRecord, Value::Null)
            .ok(
                Endpoint::CompanyTimeRecords,
                listing(&[record(9, "2024-01-01T08:00", Some("2024-01-01T09:00"))]),
            );
        let clock = FixedClock(at("2024-01-01T10:00"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Company);

        let done = controller
            .create(&draft("2024-01-01T08:00", Some("2024-01-01T09:00")))
            .await
            .unwrap();

        assert_eq!(done.notice, Notice::success("Fichaje creado"));
        let (endpoint, body) = &backend.calls()[0];
        assert_eq!(*endpoint, Endpoint::CreateTimeRecord);
        let body = body.as_ref().unwrap();
        assert_eq!(body["fechaInicio"], "2024-01-01T08:00:00");
        assert_eq!(body["trabajadorId"], 7);
    }

    #[actix_web::test]
    async fn edit_allows_past_dates_but_checks_order() {
        let backend = FakeBackend::new()
            .ok(Endpoint::EditTimeRecord, Value::Null)
            .ok(Endpoint::CompanyTimeRecords, Value::Null);
        let clock = FixedClock(at("2024-01-01T10:00"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Company);

        let reversed = draft("2024-01-01T09:00", Some("2024-01-01T08:00"));
        assert!(matches!(controller.edit(3, &reversed).await, Err(AppError::Validation(_))));

        let later = draft("2025-06-01T08:00", Some("2025-06-01T09:00"));
        let done = controller.edit(3, &later).await.unwrap();
        assert!(done.items.is_empty());

        let (_, body) = &backend.calls()[0];
        let body = body.as_ref().unwrap();
        assert_eq!(body["id"], 3);
        assert_eq!(body["fechaFin"], "2025-06-01T09:00:00");
    }

    #[actix_web::test]
    async fn failed_delete_does_not_reload() {
        let backend = FakeBackend::new()
            .fail(Endpoint::DeleteTimeRecord, AppError::Backend("Fichaje no encontrado".into()));
        let clock = FixedClock(at("2024-01-01T10:00"));
        let controller = TimeRecordController::new(&backend, &clock, RecordScope::Company);

        assert!(matches!(controller.delete(4).await, Err(AppError::Backend(_))));
        assert_eq!(
            backend.calls(),
            vec![(Endpoint::DeleteTimeRecord, Some(json!({ "id": 4 })))]
        );
    }
}

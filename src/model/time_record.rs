use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::wire;
use crate::model::worker::{Company, Worker};
use crate::utils::formatter::{OPEN_END, format_elapsed, format_timestamp};
use crate::utils::search::Searchable;

/// One clock-in/clock-out interval ("fichaje").
///
/// A missing `end_time` means the record is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub id: u64,

    #[serde(rename = "trabajador", default)]
    pub worker: Option<Worker>,

    #[serde(rename = "empresa", default)]
    pub company: Option<Company>,

    #[serde(rename = "fechaInicio", with = "wire::datetime")]
    #[schema(value_type = String, example = "2024-01-01T08:00:00")]
    pub start_time: NaiveDateTime,

    #[serde(rename = "fechaFin", with = "wire::option_datetime", default)]
    #[schema(value_type = Option<String>, example = "2024-01-01T12:30:00")]
    pub end_time: Option<NaiveDateTime>,
}

impl TimeRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn worker_id(&self) -> Option<u64> {
        self.worker.as_ref().map(|w| w.id)
    }

    pub fn company_id(&self) -> Option<u64> {
        self.company.as_ref().map(|c| c.id)
    }
}

/// Time record with display fields computed against a given "now".
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecordView {
    #[serde(flatten)]
    pub record: TimeRecord,
    #[schema(example = "01/01/2024 08:00")]
    pub start_formatted: String,
    #[schema(example = "—")]
    pub end_formatted: String,
    #[schema(example = "4h 30m")]
    pub elapsed_formatted: String,
}

impl TimeRecordView {
    pub fn new(record: TimeRecord, now: NaiveDateTime) -> Self {
        let start_formatted = format_timestamp(record.start_time);
        let end_formatted = record
            .end_time
            .map(format_timestamp)
            .unwrap_or_else(|| OPEN_END.to_string());
        let elapsed_formatted = format_elapsed(record.start_time, record.end_time, now);

        Self {
            record,
            start_formatted,
            end_formatted,
            elapsed_formatted,
        }
    }
}

impl Searchable for TimeRecordView {
    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            self.record.worker.as_ref().map(Worker::full_name),
            Some(self.start_formatted.clone()),
            Some(self.end_formatted.clone()),
            Some(self.elapsed_formatted.clone()),
        ]
    }
}

/// New or corrected interval for a worker, entered by the company.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecordDraft {
    #[serde(rename = "trabajadorId")]
    #[schema(example = 7)]
    pub worker_id: u64,

    #[serde(rename = "empresaId")]
    #[schema(example = 1)]
    pub company_id: u64,

    #[serde(rename = "fechaInicio", with = "wire::datetime")]
    #[schema(value_type = String, example = "2024-01-01T08:00:00")]
    pub start_time: NaiveDateTime,

    #[serde(rename = "fechaFin", with = "wire::option_datetime", default)]
    #[schema(value_type = Option<String>, example = "2024-01-01T15:00:00")]
    pub end_time: Option<NaiveDateTime>,
}

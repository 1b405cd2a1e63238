use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::worker::Worker;
use crate::utils::formatter::{format_date_iso_to_european, format_decimal_hours, humanize_label};
use crate::utils::search::Searchable;

pub const MIN_LEAVE_HOURS: f64 = 0.25;
pub const MAX_LEAVE_HOURS: f64 = 8.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter, ToSchema,
)]
pub enum LeaveStatus {
    #[serde(rename = "SOLICITADO")]
    #[strum(serialize = "SOLICITADO")]
    Requested,
    #[serde(rename = "APROBADO")]
    #[strum(serialize = "APROBADO")]
    Approved,
    #[serde(rename = "RECHAZADO")]
    #[strum(serialize = "RECHAZADO")]
    Rejected,
}

/// Company decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Requested)
    }

    /// Applies a company decision. Only `Requested` can move, and only once.
    pub fn resolve(self, decision: Decision) -> Result<LeaveStatus, AppError> {
        match self {
            LeaveStatus::Requested => Ok(decision.target()),
            from => Err(AppError::InvalidTransition {
                from,
                to: decision.target(),
            }),
        }
    }

    pub fn label(self) -> String {
        humanize_label(self.as_ref())
    }
}

/// Requested hours must lie in `[0.25, 8]` and be a whole number of quarters.
pub fn validate_hours(hours: f64) -> Result<(), AppError> {
    if !hours.is_finite() || !(MIN_LEAVE_HOURS..=MAX_LEAVE_HOURS).contains(&hours) {
        return Err(AppError::Validation(format!(
            "hours must be between {MIN_LEAVE_HOURS} and {MAX_LEAVE_HOURS}"
        )));
    }

    let quarters = hours * 4.0;
    if quarters.round() != quarters {
        return Err(AppError::Validation(
            "only 0.25h increments are allowed".to_string(),
        ));
    }

    Ok(())
}

/// A worker's paid-leave request ("permiso").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,

    /// Leave type code, e.g. `VACACIONES`.
    #[serde(rename = "permiso")]
    #[schema(example = "VACACIONES")]
    pub leave_type: String,

    #[serde(rename = "trabajador", default)]
    pub worker: Option<Worker>,

    #[serde(rename = "fecha", default)]
    #[schema(value_type = Option<String>, format = "date", example = "2024-06-15")]
    pub date: Option<NaiveDate>,

    #[serde(rename = "hora")]
    #[schema(example = 1.5)]
    pub hours: f64,

    #[serde(rename = "estado")]
    pub status: LeaveStatus,
}

/// Leave request with its display labels.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestView {
    #[serde(flatten)]
    pub request: LeaveRequest,
    #[schema(example = "Vacaciones")]
    pub type_label: String,
    #[schema(example = "15/06/2024")]
    pub date_formatted: String,
    #[schema(example = "1h 30m")]
    pub hours_formatted: String,
    #[schema(example = "Solicitado")]
    pub status_label: String,
}

impl From<LeaveRequest> for LeaveRequestView {
    fn from(request: LeaveRequest) -> Self {
        let date_formatted = request
            .date
            .map(|d| format_date_iso_to_european(&d.to_string()))
            .unwrap_or_default();

        Self {
            type_label: humanize_label(&request.leave_type),
            hours_formatted: format_decimal_hours(Some(request.hours)),
            status_label: request.status.label(),
            date_formatted,
            request,
        }
    }
}

impl Searchable for LeaveRequestView {
    fn search_fields(&self) -> Vec<Option<String>> {
        let worker = self.request.worker.as_ref();
        vec![
            Some(self.request.leave_type.clone()),
            Some(self.type_label.clone()),
            Some(self.request.status.to_string()),
            self.request.date.map(|d| d.to_string()),
            Some(self.request.hours.to_string()),
            worker.and_then(|w| w.name.clone()),
            worker.and_then(|w| w.surname.clone()),
            worker.and_then(|w| w.dni.clone()),
            worker.and_then(|w| w.email.clone()),
            worker.and_then(|w| w.category.clone()),
        ]
    }
}

/// Worker input for requesting or editing leave.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveDraft {
    #[serde(rename = "permiso")]
    #[schema(example = "ASISTENCIA_MEDICA")]
    pub leave_type: String,

    #[serde(rename = "fecha")]
    #[schema(value_type = String, format = "date", example = "2024-06-15")]
    pub date: NaiveDate,

    #[serde(rename = "hora")]
    #[schema(example = 2.5)]
    pub hours: f64,
}

impl LeaveDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.leave_type.trim().is_empty() {
            return Err(AppError::Validation("leave type is required".to_string()));
        }
        validate_hours(self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn accepts_every_quarter_hour_in_range() {
        for quarters in 1..=32 {
            let hours = quarters as f64 * 0.25;
            assert!(validate_hours(hours).is_ok(), "{hours} should be accepted");
        }
    }

    #[test]
    fn rejects_off_step_and_out_of_range_hours() {
        for hours in [0.3, 8.25, 0.0, -0.25, 1.1, 7.9, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(validate_hours(hours), Err(AppError::Validation(_))),
                "{hours} should be rejected"
            );
        }
    }

    #[test]
    fn requested_resolves_to_terminal_states() {
        assert_eq!(
            LeaveStatus::Requested.resolve(Decision::Approve),
            Ok(LeaveStatus::Approved)
        );
        assert_eq!(
            LeaveStatus::Requested.resolve(Decision::Reject),
            Ok(LeaveStatus::Rejected)
        );
    }

    #[test]
    fn terminal_states_never_move() {
        for from in LeaveStatus::iter().filter(|s| s.is_terminal()) {
            for decision in [Decision::Approve, Decision::Reject] {
                assert_eq!(
                    from.resolve(decision),
                    Err(AppError::InvalidTransition {
                        from,
                        to: decision.target()
                    })
                );
            }
        }
    }

    #[test]
    fn no_third_state_is_reachable() {
        let reachable: Vec<_> = [Decision::Approve, Decision::Reject]
            .into_iter()
            .filter_map(|d| LeaveStatus::Requested.resolve(d).ok())
            .flat_map(|s| {
                let mut next = vec![s];
                next.extend(
                    [Decision::Approve, Decision::Reject]
                        .into_iter()
                        .filter_map(|d| s.resolve(d).ok()),
                );
                next
            })
            .collect();
        assert_eq!(reachable, vec![LeaveStatus::Approved, LeaveStatus::Rejected]);
    }

    #[test]
    fn status_codes_round_trip_through_strum_and_serde() {
        assert_eq!(LeaveStatus::from_str("APROBADO"), Ok(LeaveStatus::Approved));
        assert_eq!(LeaveStatus::Rejected.to_string(), "RECHAZADO");
        assert_eq!(
            serde_json::to_value(LeaveStatus::Requested).unwrap(),
            serde_json::json!("SOLICITADO")
        );
        assert_eq!(LeaveStatus::Requested.label(), "Solicitado");
    }

    #[test]
    fn view_labels() {
        let request: LeaveRequest = serde_json::from_value(serde_json::json!({
            "id": 4,
            "permiso": "ASISTENCIA_MEDICA",
            "trabajador": { "id": 7, "nombre": "Ana", "dni": "1X" },
            "fecha": "2024-06-15",
            "hora": 1.5,
            "estado": "SOLICITADO"
        }))
        .unwrap();
        let view = LeaveRequestView::from(request);

        assert_eq!(view.type_label, "Asistencia Medica");
        assert_eq!(view.date_formatted, "15/06/2024");
        assert_eq!(view.hours_formatted, "1h 30m");
        assert_eq!(view.status_label, "Solicitado");
    }

    #[test]
    fn draft_requires_type_and_valid_hours() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ok = LeaveDraft { leave_type: "MUDANZA".into(), date, hours: 2.75 };
        assert!(ok.validate().is_ok());

        let blank = LeaveDraft { leave_type: " ".into(), date, hours: 2.0 };
        assert!(blank.validate().is_err());

        let off_step = LeaveDraft { leave_type: "MUDANZA".into(), date, hours: 2.1 };
        assert!(off_step.validate().is_err());
    }
}

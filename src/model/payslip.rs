use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::worker::Worker;

/// Stored payslip ("nómina"); the document itself stays opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayslipMetadata {
    pub id: u64,

    #[serde(rename = "periodo", default)]
    #[schema(value_type = Option<String>, format = "date", example = "2024-05-01")]
    pub period: Option<NaiveDate>,
}

impl PayslipMetadata {
    /// Name used when the backend sends no `Content-Disposition` filename.
    pub fn fallback_filename(&self) -> String {
        format!("nomina-{}.pdf", self.stem())
    }

    /// Fallback name when a company downloads on behalf of `worker`.
    pub fn fallback_filename_for(&self, worker: &Worker) -> String {
        let stem = self.stem();
        let parts: Vec<&str> = [Some(stem.as_str()), worker.name.as_deref(), worker.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        format!("nomina-{}.pdf", parts.join("-"))
    }

    fn stem(&self) -> String {
        match self.period {
            Some(period) => period.to_string(),
            None => self.id.to_string(),
        }
    }
}

/// Payslip bytes ready to hand to the browser.
#[derive(Debug, Clone)]
pub struct PayslipFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

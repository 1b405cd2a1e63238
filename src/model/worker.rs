use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::formatter::humanize_label;
use crate::utils::search::Searchable;

/// Worker ("trabajador") as the backend describes it. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Worker {
    #[schema(example = 7)]
    pub id: u64,

    #[serde(rename = "nombre", default)]
    #[schema(example = "Ana")]
    pub name: Option<String>,

    #[serde(rename = "apellidos", default)]
    #[schema(example = "García López")]
    pub surname: Option<String>,

    #[serde(default)]
    #[schema(example = "12345678Z")]
    pub dni: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "categoria", default)]
    pub category: Option<String>,

    #[serde(rename = "genero", default)]
    #[schema(example = "NO_DETERMINADO")]
    pub gender: Option<String>,

    #[serde(rename = "fechaAntiguedad", default)]
    #[schema(value_type = Option<String>, format = "date")]
    pub seniority_date: Option<NaiveDate>,

    #[serde(rename = "activo", default)]
    pub active: bool,

    #[serde(rename = "empresa_id", default)]
    pub company_id: Option<u64>,
}

impl Worker {
    /// `"{name} {surname}"`, skipping missing parts.
    pub fn full_name(&self) -> String {
        [self.name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn gender_label(&self) -> Option<String> {
        self.gender.as_deref().map(humanize_label)
    }
}

impl Searchable for Worker {
    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            self.name.clone(),
            self.surname.clone(),
            self.dni.clone(),
            self.email.clone(),
            self.category.clone(),
        ]
    }
}

/// Company ("empresa") as the backend describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: u64,

    #[serde(rename = "nombre", default)]
    pub name: Option<String>,

    #[serde(rename = "formaJuridica", default)]
    #[schema(example = "SOCIEDAD_LIMITADA")]
    pub legal_form: Option<String>,

    #[serde(default)]
    pub cif: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Directory row: the backend worker plus display labels.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerView {
    #[serde(flatten)]
    pub worker: Worker,

    #[schema(example = "Ana García López")]
    pub full_name: String,

    #[schema(example = "No Determinado")]
    pub gender_label: Option<String>,
}

impl From<Worker> for WorkerView {
    fn from(worker: Worker) -> Self {
        Self {
            full_name: worker.full_name(),
            gender_label: worker.gender_label(),
            worker,
        }
    }
}

impl Searchable for WorkerView {
    fn search_fields(&self) -> Vec<Option<String>> {
        self.worker.search_fields()
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::formatter::humanize_label;

/// Reference lists served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    LeaveTypes,
    Genders,
    LegalForms,
}

impl CatalogKind {
    /// Path segment used by this service's `/catalogos/{kind}` route.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "tipos-permiso" => Some(CatalogKind::LeaveTypes),
            "generos" => Some(CatalogKind::Genders),
            "formas-juridicas" => Some(CatalogKind::LegalForms),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    pub id: i64,

    #[serde(rename = "codigo")]
    #[schema(example = "INDISPOSICION_MEDICA")]
    pub code: String,

    #[serde(rename = "nombre", default)]
    #[schema(example = "INDISPOSICION MEDICA")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Indisposicion Medica")]
    pub label: String,
}

impl CatalogEntry {
    pub fn labelled(mut self) -> Self {
        let source = if self.name.is_empty() { &self.code } else { &self.name };
        self.label = humanize_label(source);
        self
    }
}

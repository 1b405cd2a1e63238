pub mod catalogs;
pub mod leave_requests;
pub mod payslips;
pub mod time_records;
pub mod workers;

use serde::Deserialize;
use utoipa::IntoParams;

/// Free-text filter shared by every list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring; blank returns everything
    #[serde(default)]
    #[param(example = "garcía")]
    pub q: String,
}

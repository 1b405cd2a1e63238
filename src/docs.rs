use crate::api::leave_requests::WorkerLeaves;
use crate::api::time_records::WorkerTimeRecords;
use crate::model::catalog::CatalogEntry;
use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveRequestView, LeaveStatus};
use crate::model::payslip::PayslipMetadata;
use crate::model::time_record::{TimeRecord, TimeRecordDraft, TimeRecordView};
use crate::model::worker::{Company, Worker, WorkerView};
use crate::models::{LoginReqDto, LoginResponse, Notice, NoticeKind};
use crate::services::{BoardMutation, LeaveBoard};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Timebee Web API",
        version = "0.1.0",
        description = r#"
## Timebee web front end

Backend-for-frontend of the Timebee HR backend. It turns backend records into
ready-to-render views and checks requests before forwarding them.

### Workers
- Clock in and out, and review own time records ("fichajes")
- Request, edit and delete leave ("permisos")
- List and download payslips ("nóminas")

### Companies
- Review, create, correct and delete time records
- Approve or reject pending leave requests
- Browse the worker directory and each worker's payslips

### Conventions
- Every list accepts `q`, a case-insensitive substring filter
- Every mutation answers `{ notice, items }`, where `items` is the reloaded list
- Errors answer `{ kind: "error", message }`

### Security
Log in through `/auth/login`, then send the returned token as a
**Bearer** token on every `/api` call.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::time_records::worker_records,
        crate::api::time_records::start,
        crate::api::time_records::end,
        crate::api::time_records::company_records,
        crate::api::time_records::create,
        crate::api::time_records::edit,
        crate::api::time_records::delete,

        crate::api::leave_requests::worker_leaves,
        crate::api::leave_requests::request,
        crate::api::leave_requests::edit,
        crate::api::leave_requests::delete,
        crate::api::leave_requests::company_board,
        crate::api::leave_requests::approve,
        crate::api::leave_requests::reject,

        crate::api::workers::list,

        crate::api::payslips::list,
        crate::api::payslips::download,
        crate::api::payslips::worker_list,
        crate::api::payslips::worker_download,

        crate::api::catalogs::get_catalog
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Notice,
            NoticeKind,
            Worker,
            WorkerView,
            Company,
            TimeRecord,
            TimeRecordView,
            TimeRecordDraft,
            WorkerTimeRecords,
            LeaveStatus,
            LeaveRequest,
            LeaveRequestView,
            LeaveDraft,
            LeaveBoard,
            BoardMutation,
            WorkerLeaves,
            PayslipMetadata,
            CatalogEntry
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and dashboard redirect"),
        (name = "Time records", description = "Clock-in/clock-out records"),
        (name = "Leave", description = "Leave requests and their approval"),
        (name = "Workers", description = "Company worker directory"),
        (name = "Payslips", description = "Worker payslips"),
        (name = "Catalogs", description = "Cached reference lists"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

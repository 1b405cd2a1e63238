pub mod catalogs;
pub mod leave_requests;
pub mod payslips;
pub mod time_records;
pub mod workers;

pub use catalogs::CatalogCache;
pub use leave_requests::{BoardMutation, LeaveBoard, LeaveController, LeaveScope};
pub use time_records::{ClockState, RecordScope, TimeRecordController};

pub mod catalog;
pub mod leave_request;
pub mod payslip;
pub mod role;
pub mod time_record;
pub mod wire;
pub mod worker;

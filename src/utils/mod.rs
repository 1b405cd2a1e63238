pub mod clock;
pub mod content_disposition;
pub mod debounce;
pub mod formatter;
pub mod search;

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod session;

pub use session::{Session, SessionProvider, SessionStore};

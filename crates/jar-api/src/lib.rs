pub mod auth;
pub mod error;
pub mod export;
pub mod flash;
pub mod memories;
pub mod middleware;
pub mod mood;
pub mod pages;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::build_router;
pub use state::{AppState, AppStateInner};

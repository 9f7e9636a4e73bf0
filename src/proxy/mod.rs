//! HTTP server and the Gemini relay

mod handler;
pub mod server;
mod streaming;

pub use handler::GeminiRelay;
pub use server::{build_router, run_server, AppState};

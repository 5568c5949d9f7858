//! HTTP gateway: multipart PDF upload analysis and health endpoint.

mod error;
mod handlers;
mod router;
mod server;
mod upload;

pub use error::GatewayError;
pub use router::build_router;
pub use server::{GatewayServer, SharedPipeline};

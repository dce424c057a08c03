//! Gateway: HTTP server for the Messenger webhook.
//!
//! `GET /` health text, `GET /webhook` subscription handshake, `POST /webhook` event batches.

mod server;
mod verify;

pub use server::{router, run_gateway, serve, GatewayState, HEALTH_TEXT};
pub use verify::{verify_subscription, VerifyParams};

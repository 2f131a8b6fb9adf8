//! HTTP handlers for the placement portal.

pub mod auth;
mod blocking;
pub mod dashboard;
pub mod error;
pub mod listings;
pub mod messages;
pub mod middleware;
pub mod router;
pub mod seed;
pub mod serialize;
pub mod statistics;

pub use auth::{AppState, AppStateInner};
pub use router::router;

//! Record store, game orchestration, and HTTP surface for relife.
//!
//! The store keeps one JSON file per run plus a single global meta record;
//! [`GameService`] coordinates the pure engine with those records and
//! [`serve`] exposes the whole thing over HTTP.

mod server;
mod service;
mod store;

pub use server::{serve, ServerError};
pub use service::GameService;
pub use store::{JsonStore, StoreError};

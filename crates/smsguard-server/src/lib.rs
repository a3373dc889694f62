//! HTTP layer: builds every configured corpus once at startup, then serves
//! predictions and the message store over axum.

pub mod api;
pub mod bootstrap;
pub mod error;

pub use api::{AppState, router};
pub use bootstrap::{bootstrap, build_corpora, open_store, serve};
pub use error::ApiError;

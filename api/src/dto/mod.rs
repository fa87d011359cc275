//! Request and response bodies of the HTTP surface

pub mod auth;

pub use auth::*;
pub use tt_shared::ErrorResponse;

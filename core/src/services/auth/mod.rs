//! Authentication service module
//!
//! Login, single-use refresh rotation, logout and self-describing access
//! token validation for the token-owning service.

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;

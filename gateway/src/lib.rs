//! Edge gateway: checks bearer tokens with the token authority and forwards
//! accepted requests to the upstream service.

pub mod app;
pub mod config;
pub mod middleware;
pub mod proxy;

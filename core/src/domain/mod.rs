//! Domain layer containing the token and principal entities.

pub mod entities;

pub use entities::*;

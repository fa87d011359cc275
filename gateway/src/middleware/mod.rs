pub mod delegated_auth;

pub use delegated_auth::*;

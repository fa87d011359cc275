//! Domain entities representing core business objects.

pub mod principal;
pub mod token;

pub use principal::Principal;
pub use token::{Claims, IssuedToken, RefreshRecord, TokenPair, TokenType};

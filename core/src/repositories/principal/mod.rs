pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::{InMemoryPrincipalDirectory, DEFAULT_HASH_COST};
pub use r#trait::PrincipalDirectory;

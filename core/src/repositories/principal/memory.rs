//! In-memory principal directory with bcrypt password hashes

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Principal;
use crate::errors::DomainError;

use super::r#trait::PrincipalDirectory;

/// bcrypt cost used outside tests
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

struct Entry {
    principal: Principal,
    password_hash: String,
}

/// Principal directory held in memory.
///
/// Seeded from `PRINCIPALS_SEED` for development, or populated directly in
/// tests. Registration and role assignment live outside this crate.
pub struct InMemoryPrincipalDirectory {
    entries: RwLock<HashMap<String, Entry>>,
    cost: u32,
}

impl Default for InMemoryPrincipalDirectory {
    fn default() -> Self {
        Self::with_cost(DEFAULT_HASH_COST)
    }
}

impl InMemoryPrincipalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific bcrypt cost (tests use the minimum)
    pub fn with_cost(cost: u32) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            cost,
        }
    }

    /// Parse `email:password:ROLE1|ROLE2` entries separated by `;`
    pub async fn from_seed(seed: &str, cost: u32) -> Result<Self, DomainError> {
        let directory = Self::with_cost(cost);

        for entry in seed.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (email, rest) = entry.split_once(':').ok_or_else(|| invalid_seed(entry))?;
            let (password, roles) = rest.rsplit_once(':').ok_or_else(|| invalid_seed(entry))?;
            if email.is_empty() || password.is_empty() {
                return Err(invalid_seed(entry));
            }

            let roles = roles
                .split('|')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect();
            let display_name = email.split('@').next().unwrap_or(email);

            directory
                .insert(Principal::new(email, display_name, roles), password)
                .await?;
        }

        Ok(directory)
    }

    /// Register a principal with a plain-text password
    pub async fn insert(&self, principal: Principal, password: &str) -> Result<(), DomainError> {
        let password_hash = bcrypt::hash(password, self.cost)
            .map_err(|e| DomainError::internal(format!("password hashing failed: {}", e)))?;

        let mut entries = self.entries.write().await;
        entries.insert(
            principal.email.clone(),
            Entry {
                principal,
                password_hash,
            },
        );
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn invalid_seed(entry: &str) -> DomainError {
    let email = entry.split(':').next().unwrap_or_default();
    DomainError::Config {
        message: format!("PRINCIPALS_SEED entry for '{}' is not email:password:ROLES", email),
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryPrincipalDirectory {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.get(subject).map(|e| e.principal.clone()))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Principal>, DomainError> {
        let (principal, password_hash) = {
            let entries = self.entries.read().await;
            match entries.get(email) {
                Some(e) => (e.principal.clone(), e.password_hash.clone()),
                None => return Ok(None),
            }
        };

        let password = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| DomainError::internal(format!("password check aborted: {}", e)))?
            .map_err(|e| DomainError::internal(format!("password check failed: {}", e)))?;

        Ok(matches.then_some(principal))
    }
}

//!
//! # Account Directory
//!
//! Lookup and creation of accounts by username, behind a trait so the
//! identity resolver does not care where accounts live. The Postgres
//! implementation backs the running service; the in-memory implementation
//! backs tests and local experimentation.

use crate::models::User;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

#[derive(Debug)]
pub enum DirectoryError {
    /// The username is already taken. Usernames are unique at creation time.
    DuplicateUsername,
    DatabaseError(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DirectoryError::DuplicateUsername => write!(f, "username already registered"),
            DirectoryError::DatabaseError(msg) => write!(f, "directory lookup failed: {}", msg),
        }
    }
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError>;

    /// Creates an account with `is_active` defaulted to true. Fails with
    /// `DuplicateUsername` if the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, DirectoryError>;
}

pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_active, created_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::DatabaseError(e.to_string()))
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, DirectoryError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash, is_active, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                DirectoryError::DuplicateUsername
            }
            _ => DirectoryError::DatabaseError(e.to_string()),
        })
    }
}

/// Directory backed by a process-local map. Accounts do not survive restart.
pub struct MemoryAccountDirectory {
    accounts: RwLock<HashMap<String, User>>,
    next_id: AtomicI32,
}

impl MemoryAccountDirectory {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Flips an account's active flag in place. Returns false if the account
    /// does not exist.
    pub fn set_active(&self, username: &str, active: bool) -> bool {
        match self.accounts.write().get_mut(username) {
            Some(user) => {
                user.is_active = active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountDirectory for MemoryAccountDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.accounts.read().get(username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, DirectoryError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(username) {
            return Err(DirectoryError::DuplicateUsername);
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        accounts.insert(username.to_string(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_memory_directory_create_and_find() {
        let directory = MemoryAccountDirectory::new();

        let user = directory.create("alice", "hash-a").await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.is_active);

        let found = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(directory.find_by_username("bob").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_memory_directory_rejects_duplicates() {
        let directory = MemoryAccountDirectory::new();
        directory.create("alice", "hash-a").await.unwrap();

        match directory.create("alice", "hash-b").await {
            Err(DirectoryError::DuplicateUsername) => {}
            other => panic!("Expected DuplicateUsername, got {:?}", other.map(|u| u.id)),
        }
    }

    #[actix_rt::test]
    async fn test_memory_directory_assigns_distinct_ids() {
        let directory = MemoryAccountDirectory::new();
        let alice = directory.create("alice", "hash-a").await.unwrap();
        let bob = directory.create("bob", "hash-b").await.unwrap();
        assert_ne!(alice.id, bob.id);
    }

    #[actix_rt::test]
    async fn test_memory_directory_set_active() {
        let directory = MemoryAccountDirectory::new();
        directory.create("alice", "hash-a").await.unwrap();

        assert!(directory.set_active("alice", false));
        let user = directory.find_by_username("alice").await.unwrap().unwrap();
        assert!(!user.is_active);

        assert!(!directory.set_active("ghost", false));
    }
}

use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Company, CompanyFilter, CompanyUpdate, NewCompany, User, UserRecord, UserUpdate};

/// Record operations on `companies`. Each call is a single statement.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Fails with [`DatabaseError::Duplicate`] when the handle is taken.
    async fn insert_company(&self, company: NewCompany) -> Result<Company, DatabaseError>;

    /// Matching companies ordered by handle.
    async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError>;

    async fn get_company(&self, handle: &str) -> Result<Company, DatabaseError>;

    async fn update_company(&self, handle: &str, changes: CompanyUpdate) -> Result<Company, DatabaseError>;

    async fn remove_company(&self, handle: &str) -> Result<(), DatabaseError>;
}

/// Record operations on `users`. Passwords arrive already hashed.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`DatabaseError::Duplicate`] when the username is taken.
    async fn insert_user(&self, user: UserRecord) -> Result<User, DatabaseError>;

    /// All users ordered by username.
    async fn find_users(&self) -> Result<Vec<User>, DatabaseError>;

    async fn get_user(&self, username: &str) -> Result<User, DatabaseError>;

    /// Row including the password hash, for authentication.
    async fn get_user_record(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError>;

    async fn update_user(&self, username: &str, changes: UserUpdate) -> Result<User, DatabaseError>;

    async fn remove_user(&self, username: &str) -> Result<(), DatabaseError>;
}

/// Everything a handler needs from persistence.
#[async_trait]
pub trait Store: CompanyStore + UserStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub(crate) fn no_company(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {}", handle))
}

pub(crate) fn no_user(username: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No user: {}", username))
}

pub(crate) fn duplicate_company(handle: &str) -> DatabaseError {
    DatabaseError::Duplicate(format!("Duplicate company: {}", handle))
}

pub(crate) fn duplicate_user(username: &str) -> DatabaseError {
    DatabaseError::Duplicate(format!("Duplicate username: {}", username))
}

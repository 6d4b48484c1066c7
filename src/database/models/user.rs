use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

/// Stored row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl UserRecord {
    pub fn apply(&mut self, changes: UserUpdate) {
        if let Some(password) = changes.password {
            self.password = password;
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(is_admin) = changes.is_admin {
            self.is_admin = is_admin;
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            is_admin: record.is_admin,
        }
    }
}

/// Incoming account data with a plaintext password.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    pub fn into_record(self, password_hash: String) -> UserRecord {
        UserRecord {
            username: self.username,
            password: password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}

/// Partial update. `password` holds plaintext on the way in and the hash
/// once it reaches a store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut columns = Vec::new();
        if let Some(password) = &self.password {
            columns.push(("password", json!(password)));
        }
        if let Some(first_name) = &self.first_name {
            columns.push(("first_name", json!(first_name)));
        }
        if let Some(last_name) = &self.last_name {
            columns.push(("last_name", json!(last_name)));
        }
        if let Some(email) = &self.email {
            columns.push(("email", json!(email)));
        }
        if let Some(is_admin) = self.is_admin {
            columns.push(("is_admin", json!(is_admin)));
        }
        columns
    }
}

/// Username/password pair presented for a token.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

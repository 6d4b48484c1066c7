//! Authorization policy.
//!
//! Every handler asks [`authorize`] before touching a store. Denials are
//! always reported as 401, whether the caller is anonymous or merely lacks
//! the privilege.

use crate::auth::Claims;
use crate::error::ApiError;

/// Identity making a request, derived from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User { username: String, is_admin: bool },
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        matches!(self, Caller::User { is_admin: true, .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Caller::User { username, .. } => Some(username),
            Caller::Anonymous => None,
        }
    }

    /// Admin, or the user named `username`.
    pub fn is_self_or_admin(&self, username: &str) -> bool {
        self.is_admin() || self.username() == Some(username)
    }
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Caller::User {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Operation a caller wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    CreateCompany,
    ListCompanies,
    ReadCompany,
    UpdateCompany,
    DeleteCompany,
    CreateUser,
    ListUsers,
    ReadUser(&'a str),
    UpdateUser(&'a str),
    /// Changing the `isAdmin` flag of a user.
    UpdateUserRole(&'a str),
    DeleteUser(&'a str),
    Authenticate,
    Register,
}

/// Pure allow/deny decision.
pub fn is_allowed(caller: &Caller, action: Action<'_>) -> bool {
    match action {
        Action::ListCompanies | Action::ReadCompany | Action::Authenticate | Action::Register => true,
        Action::CreateCompany
        | Action::UpdateCompany
        | Action::DeleteCompany
        | Action::CreateUser
        | Action::ListUsers
        | Action::UpdateUserRole(_) => caller.is_admin(),
        Action::ReadUser(target) | Action::UpdateUser(target) | Action::DeleteUser(target) => {
            caller.is_self_or_admin(target)
        }
    }
}

pub fn authorize(caller: &Caller, action: Action<'_>) -> Result<(), ApiError> {
    if is_allowed(caller, action) {
        Ok(())
    } else {
        tracing::debug!("Denied {:?} for {:?}", action, caller);
        Err(ApiError::unauthorized("Unauthorized"))
    }
}

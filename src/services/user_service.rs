use crate::auth::{self, AuthError};
use crate::config::SecurityConfig;
use crate::database::models::{Credentials, NewUser, User, UserUpdate};
use crate::database::{Store, UserStore};
use crate::error::ApiError;
use crate::state::AppState;

/// Account operations that need hashing or token issuance on top of the store.
pub struct UserService<'a> {
    store: &'a dyn Store,
    security: &'a SecurityConfig,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            security: &state.config.security,
        }
    }

    /// Hashes the password and stores the account.
    pub async fn create(&self, new_user: NewUser) -> Result<User, ApiError> {
        let hashed = auth::hash_password(new_user.password.clone(), self.security.bcrypt_work_factor).await?;
        let user = self.store.insert_user(new_user.into_record(hashed)).await?;
        tracing::info!(username = %user.username, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    pub fn token_for(&self, user: &User) -> Result<String, ApiError> {
        Ok(auth::create_token(&user.username, user.is_admin, self.security)?)
    }

    /// Unknown usernames and wrong passwords fail identically.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, ApiError> {
        let Some(record) = self.store.get_user_record(&credentials.username).await? else {
            tracing::warn!(username = %credentials.username, "Authentication failed: unknown user");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !auth::verify_password(credentials.password, record.password.clone()).await? {
            tracing::warn!(username = %credentials.username, "Authentication failed: bad password");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(User::from(record))
    }

    /// Applies a partial update, hashing a new password first.
    pub async fn update(&self, username: &str, mut changes: UserUpdate) -> Result<User, ApiError> {
        if let Some(password) = changes.password.take() {
            changes.password = Some(auth::hash_password(password, self.security.bcrypt_work_factor).await?);
        }
        Ok(self.store.update_user(username, changes).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(AppConfig::test(), Arc::new(MemoryStore::new()))
    }

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            first_name: "F".to_string(),
            last_name: "L".to_string(),
            email: format!("{}@user.com", username),
            is_admin: false,
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials { username: username.to_string(), password: password.to_string() }
    }

    #[tokio::test]
    async fn stores_only_the_hash() {
        let state = state();
        let service = UserService::new(&state);
        service.create(new_user("u1", "password1")).await.unwrap();

        let record = state.store.get_user_record("u1").await.unwrap().unwrap();
        assert_ne!(record.password, "password1");
        assert!(record.password.starts_with("$2"));
    }

    #[tokio::test]
    async fn authenticates_with_correct_password_only() {
        let state = state();
        let service = UserService::new(&state);
        service.create(new_user("u1", "password1")).await.unwrap();

        let user = service.authenticate(credentials("u1", "password1")).await.unwrap();
        assert_eq!(user.username, "u1");

        let err = service.authenticate(credentials("u1", "wrong")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = service.authenticate(credentials("nope", "password1")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn password_change_takes_effect() {
        let state = state();
        let service = UserService::new(&state);
        service.create(new_user("u1", "password1")).await.unwrap();

        service
            .update("u1", UserUpdate { password: Some("new-password".to_string()), ..Default::default() })
            .await
            .unwrap();

        assert!(service.authenticate(credentials("u1", "new-password")).await.is_ok());
        assert!(service.authenticate(credentials("u1", "password1")).await.is_err());
    }

    #[tokio::test]
    async fn issued_token_carries_role() {
        let state = state();
        let service = UserService::new(&state);
        let mut admin = new_user("boss", "password1");
        admin.is_admin = true;
        let user = service.create(admin).await.unwrap();

        let token = service.token_for(&user).unwrap();
        let claims = auth::decode_token(&token, &state.config.security).unwrap();
        assert_eq!(claims.username, "boss");
        assert!(claims.is_admin);
    }
}

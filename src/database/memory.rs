use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::filter::FilterWhere;

use super::manager::DatabaseError;
use super::models::{Company, CompanyFilter, CompanyUpdate, NewCompany, User, UserRecord, UserUpdate};
use super::store::{duplicate_company, duplicate_user, no_company, no_user, CompanyStore, Store, UserStore};

/// In-process store for local runs and tests. Keys are kept sorted, which
/// gives the same ordering as the SQL queries.
#[derive(Default)]
pub struct MemoryStore {
    companies: RwLock<BTreeMap<String, Company>>,
    users: RwLock<BTreeMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert_company(&self, company: NewCompany) -> Result<Company, DatabaseError> {
        let mut companies = self.companies.write().await;
        if companies.contains_key(&company.handle) {
            return Err(duplicate_company(&company.handle));
        }
        let company = Company::from(company);
        companies.insert(company.handle.clone(), company.clone());
        Ok(company)
    }

    async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError> {
        let conditions = filter.conditions();
        let companies = self.companies.read().await;
        Ok(companies
            .values()
            .filter(|company| FilterWhere::matches(&conditions, |column| company.column(column)))
            .cloned()
            .collect())
    }

    async fn get_company(&self, handle: &str) -> Result<Company, DatabaseError> {
        let companies = self.companies.read().await;
        companies.get(handle).cloned().ok_or_else(|| no_company(handle))
    }

    async fn update_company(&self, handle: &str, changes: CompanyUpdate) -> Result<Company, DatabaseError> {
        let mut companies = self.companies.write().await;
        let company = companies.get_mut(handle).ok_or_else(|| no_company(handle))?;
        company.apply(changes);
        Ok(company.clone())
    }

    async fn remove_company(&self, handle: &str) -> Result<(), DatabaseError> {
        let mut companies = self.companies.write().await;
        companies.remove(handle).map(|_| ()).ok_or_else(|| no_company(handle))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: UserRecord) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(duplicate_user(&user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(User::from(user))
    }

    async fn find_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().map(User::from).collect())
    }

    async fn get_user(&self, username: &str) -> Result<User, DatabaseError> {
        let users = self.users.read().await;
        users.get(username).cloned().map(User::from).ok_or_else(|| no_user(username))
    }

    async fn get_user_record(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn update_user(&self, username: &str, changes: UserUpdate) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(username).ok_or_else(|| no_user(username))?;
        user.apply(changes);
        Ok(User::from(user.clone()))
    }

    async fn remove_user(&self, username: &str) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        users.remove(username).map(|_| ()).ok_or_else(|| no_user(username))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_company(handle: &str, employees: Option<i64>) -> NewCompany {
        NewCompany {
            handle: handle.to_string(),
            name: handle.to_uppercase(),
            description: format!("Desc {}", handle),
            num_employees: employees,
            logo_url: None,
        }
    }

    fn record(username: &str) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            password: "hash".to_string(),
            first_name: "F".to_string(),
            last_name: "L".to_string(),
            email: format!("{}@user.com", username),
            is_admin: false,
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (handle, employees) in [("c3", Some(3)), ("c1", Some(1)), ("c2", Some(2)), ("c4", None)] {
            store.insert_company(new_company(handle, employees)).await.unwrap();
        }
        store
    }

    fn handles(companies: &[Company]) -> Vec<&str> {
        companies.iter().map(|c| c.handle.as_str()).collect()
    }

    #[tokio::test]
    async fn lists_companies_in_handle_order() {
        let store = seeded().await;
        let all = store.find_companies(&CompanyFilter::default()).await.unwrap();
        assert_eq!(handles(&all), vec!["c1", "c2", "c3", "c4"]);
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let store = seeded().await;
        let filter = CompanyFilter {
            name: Some("c".to_string()),
            min_employees: Some(2),
            max_employees: Some(3),
        };
        let found = store.find_companies(&filter).await.unwrap();
        assert_eq!(handles(&found), vec!["c2", "c3"]);

        let filter = CompanyFilter { name: Some("nope".to_string()), ..Default::default() };
        assert!(store.find_companies(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_handle_is_rejected() {
        let store = seeded().await;
        let err = store.insert_company(new_company("c1", None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Duplicate company: c1");
    }

    #[tokio::test]
    async fn update_and_remove_missing_company() {
        let store = seeded().await;
        assert!(matches!(
            store.update_company("nope", CompanyUpdate::default()).await,
            Err(DatabaseError::NotFound(_))
        ));
        store.remove_company("c1").await.unwrap();
        assert!(matches!(store.remove_company("c1").await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn user_lifecycle() {
        let store = MemoryStore::new();
        store.insert_user(record("u2")).await.unwrap();
        store.insert_user(record("u1")).await.unwrap();
        assert!(matches!(store.insert_user(record("u1")).await, Err(DatabaseError::Duplicate(_))));

        let usernames: Vec<String> = store.find_users().await.unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(usernames, vec!["u1", "u2"]);

        let updated = store
            .update_user("u1", UserUpdate { password: Some("new-hash".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.username, "u1");
        let stored = store.get_user_record("u1").await.unwrap().unwrap();
        assert_eq!(stored.password, "new-hash");

        store.remove_user("u1").await.unwrap();
        assert!(matches!(store.get_user("u1").await, Err(DatabaseError::NotFound(_))));
        assert!(store.get_user_record("u1").await.unwrap().is_none());
    }
}

use crate::database::models::{Company, CompanyFilter};
use crate::database::{CompanyStore, Store};
use crate::error::ApiError;
use crate::state::AppState;

pub struct CompanyService<'a> {
    store: &'a dyn Store,
}

impl<'a> CompanyService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
        }
    }

    /// Filtered listing. An inverted employee range is a plain bad request,
    /// not a schema violation.
    pub async fn search(&self, filter: &CompanyFilter) -> Result<Vec<Company>, ApiError> {
        if !filter.has_valid_range() {
            tracing::debug!(?filter, "Rejected search with minEmployees > maxEmployees");
            return Err(ApiError::bad_request("Bad Request"));
        }
        Ok(self.store.find_companies(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::models::NewCompany;
    use crate::database::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn inverted_range_is_bad_request() {
        let state = AppState::new(AppConfig::test(), Arc::new(MemoryStore::new()));
        let filter = CompanyFilter { min_employees: Some(10), max_employees: Some(1), ..Default::default() };

        let err = CompanyService::new(&state).search(&filter).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Bad Request"));
    }

    #[tokio::test]
    async fn empty_filter_lists_everything() {
        let state = AppState::new(AppConfig::test(), Arc::new(MemoryStore::new()));
        state
            .store
            .insert_company(NewCompany {
                handle: "c1".to_string(),
                name: "C1".to_string(),
                description: String::new(),
                num_employees: None,
                logo_url: None,
            })
            .await
            .unwrap();

        let found = CompanyService::new(&state).search(&CompanyFilter::default()).await.unwrap();
        assert_eq!(found.len(), 1);
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{self, DatabaseError};
use super::models::{Company, CompanyFilter, CompanyUpdate, NewCompany, User, UserRecord, UserUpdate};
use super::query_builder::{bind_param_query_as, partial_update_sql, select_sql, SqlResult};
use super::store::{duplicate_company, duplicate_user, no_company, no_user, CompanyStore, Store, UserStore};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";
const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";
const USER_RECORD_COLUMNS: &str = "username, password, first_name, last_name, email, is_admin";

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all<T>(&self, sql: SqlResult) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn fetch_optional<T>(&self, sql: SqlResult) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn insert_company(&self, company: NewCompany) -> Result<Company, DatabaseError> {
        let query = format!(
            "INSERT INTO companies ({cols}) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (handle) DO NOTHING RETURNING {cols}",
            cols = COMPANY_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Company>(&query)
            .bind(&company.handle)
            .bind(&company.name)
            .bind(&company.description)
            .bind(company.num_employees)
            .bind(company.logo_url.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        inserted.ok_or_else(|| duplicate_company(&company.handle))
    }

    async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError> {
        let sql = select_sql("companies", COMPANY_COLUMNS, &filter.conditions(), "handle")?;
        self.fetch_all(sql).await
    }

    async fn get_company(&self, handle: &str) -> Result<Company, DatabaseError> {
        let query = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_COLUMNS);
        sqlx::query_as::<_, Company>(&query)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| no_company(handle))
    }

    async fn update_company(&self, handle: &str, changes: CompanyUpdate) -> Result<Company, DatabaseError> {
        let columns = changes.columns();
        if columns.is_empty() {
            return self.get_company(handle).await;
        }
        let sql = partial_update_sql("companies", &columns, "handle", handle, COMPANY_COLUMNS)?;
        self.fetch_optional(sql).await?.ok_or_else(|| no_company(handle))
    }

    async fn remove_company(&self, handle: &str) -> Result<(), DatabaseError> {
        let deleted: Option<(String,)> = sqlx::query_as("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| no_company(handle))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: UserRecord) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (username) DO NOTHING RETURNING {}",
            USER_RECORD_COLUMNS, USER_COLUMNS
        );
        let inserted = sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(user.is_admin)
            .fetch_optional(&self.pool)
            .await?;

        inserted.ok_or_else(|| duplicate_user(&user.username))
    }

    async fn find_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = select_sql("users", USER_COLUMNS, &[], "username")?;
        self.fetch_all(sql).await
    }

    async fn get_user(&self, username: &str) -> Result<User, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| no_user(username))
    }

    async fn get_user_record(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_RECORD_COLUMNS);
        Ok(sqlx::query_as::<_, UserRecord>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user(&self, username: &str, changes: UserUpdate) -> Result<User, DatabaseError> {
        let columns = changes.columns();
        if columns.is_empty() {
            return self.get_user(username).await;
        }
        let sql = partial_update_sql("users", &columns, "username", username, USER_COLUMNS)?;
        self.fetch_optional(sql).await?.ok_or_else(|| no_user(username))
    }

    async fn remove_user(&self, username: &str) -> Result<(), DatabaseError> {
        let deleted: Option<(String,)> = sqlx::query_as("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| no_user(username))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        manager::health_check(&self.pool).await
    }
}

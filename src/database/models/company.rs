use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::filter::{FilterOp, FilterWhereInfo};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

impl Company {
    /// Column value by database column name.
    pub fn column(&self, column: &str) -> Value {
        match column {
            "handle" => json!(self.handle),
            "name" => json!(self.name),
            "description" => json!(self.description),
            "num_employees" => json!(self.num_employees),
            "logo_url" => json!(self.logo_url),
            _ => Value::Null,
        }
    }

    pub fn apply(&mut self, changes: CompanyUpdate) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(num_employees) = changes.num_employees {
            self.num_employees = Some(num_employees);
        }
        if let Some(logo_url) = changes.logo_url {
            self.logo_url = Some(logo_url);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

impl From<NewCompany> for Company {
    fn from(new: NewCompany) -> Self {
        Self {
            handle: new.handle,
            name: new.name,
            description: new.description,
            num_employees: new.num_employees,
            logo_url: new.logo_url,
        }
    }
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

impl CompanyUpdate {
    /// `(column, value)` pairs for the fields being changed.
    pub fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut columns = Vec::new();
        if let Some(name) = &self.name {
            columns.push(("name", json!(name)));
        }
        if let Some(description) = &self.description {
            columns.push(("description", json!(description)));
        }
        if let Some(num_employees) = self.num_employees {
            columns.push(("num_employees", json!(num_employees)));
        }
        if let Some(logo_url) = &self.logo_url {
            columns.push(("logo_url", json!(logo_url)));
        }
        columns
    }
}

/// Optional company search criteria, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

impl CompanyFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_employees.is_none() && self.max_employees.is_none()
    }

    pub fn has_valid_range(&self) -> bool {
        match (self.min_employees, self.max_employees) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    pub fn conditions(&self) -> Vec<FilterWhereInfo> {
        let mut conditions = Vec::new();
        if let Some(name) = &self.name {
            conditions.push(FilterWhereInfo::new("name", FilterOp::ILike, name.as_str()));
        }
        if let Some(min) = self.min_employees {
            conditions.push(FilterWhereInfo::new("num_employees", FilterOp::Gte, min));
        }
        if let Some(max) = self.max_employees {
            conditions.push(FilterWhereInfo::new("num_employees", FilterOp::Lte, max));
        }
        conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c1() -> Company {
        Company {
            handle: "c1".to_string(),
            name: "C1".to_string(),
            description: "Desc1".to_string(),
            num_employees: Some(1),
            logo_url: Some("http://c1.img".to_string()),
        }
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(c1()).unwrap();
        assert_eq!(
            value,
            json!({
                "handle": "c1",
                "name": "C1",
                "description": "Desc1",
                "numEmployees": 1,
                "logoUrl": "http://c1.img",
            })
        );
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut company = c1();
        company.apply(CompanyUpdate {
            name: Some("New".to_string()),
            ..Default::default()
        });
        assert_eq!(company.name, "New");
        assert_eq!(company.description, "Desc1");
        assert_eq!(company.num_employees, Some(1));
    }

    #[test]
    fn update_columns_use_database_names() {
        let update = CompanyUpdate {
            num_employees: Some(10),
            logo_url: Some("http://new.img".to_string()),
            ..Default::default()
        };
        assert_eq!(
            update.columns(),
            vec![("num_employees", json!(10)), ("logo_url", json!("http://new.img"))]
        );
    }

    #[test]
    fn filter_range_check() {
        let filter = CompanyFilter { min_employees: Some(3), max_employees: Some(2), ..Default::default() };
        assert!(!filter.has_valid_range());

        let filter = CompanyFilter { min_employees: Some(2), max_employees: Some(2), ..Default::default() };
        assert!(filter.has_valid_range());
        assert!(CompanyFilter::default().has_valid_range());
        assert!(CompanyFilter::default().is_empty());
    }

    #[test]
    fn filter_conditions_follow_supplied_fields() {
        let filter = CompanyFilter { name: Some("net".to_string()), max_employees: Some(5), ..Default::default() };
        assert_eq!(
            filter.conditions(),
            vec![
                FilterWhereInfo::new("name", FilterOp::ILike, "net"),
                FilterWhereInfo::new("num_employees", FilterOp::Lte, 5),
            ]
        );
    }
}

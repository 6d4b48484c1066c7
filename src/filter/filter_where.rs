use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo};

/// Turns a list of AND-ed conditions into a parameterized SQL predicate, or
/// evaluates the same conditions against an in-memory row.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Placeholders are numbered from `starting_param_index + 1`.
    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(filter_where.build_sql_condition(condition)?);
        }
        let where_clause = if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        };
        Ok((where_clause, filter_where.param_values))
    }

    /// True when every condition holds; `lookup` maps a column to its value.
    pub fn matches<F>(conditions: &[FilterWhereInfo], lookup: F) -> bool
    where
        F: Fn(&str) -> Value,
    {
        conditions.iter().all(|condition| {
            let actual = lookup(&condition.column);
            match condition.operator {
                FilterOp::ILike => match (actual.as_str(), condition.data.as_str()) {
                    (Some(text), Some(needle)) => text.to_lowercase().contains(&needle.to_lowercase()),
                    _ => false,
                },
                FilterOp::Gte => match (actual.as_i64(), condition.data.as_i64()) {
                    (Some(a), Some(bound)) => a >= bound,
                    _ => false,
                },
                FilterOp::Lte => match (actual.as_i64(), condition.data.as_i64()) {
                    (Some(a), Some(bound)) => a <= bound,
                    _ => false,
                },
            }
        })
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        validate_column(&condition.column)?;
        let column = format!("\"{}\"", condition.column);
        match condition.operator {
            FilterOp::ILike => {
                let needle = condition.data.as_str().ok_or_else(|| {
                    FilterError::InvalidOperatorData(format!("$ilike on {} requires a string", condition.column))
                })?;
                let param = self.push_param(Value::String(format!("%{}%", escape_like(needle))));
                Ok(format!("{} ILIKE {}", column, param))
            }
            FilterOp::Gte | FilterOp::Lte => {
                if condition.data.as_i64().is_none() {
                    return Err(FilterError::InvalidOperatorData(format!(
                        "range bound on {} requires an integer",
                        condition.column
                    )));
                }
                let comparator = if condition.operator == FilterOp::Gte { ">=" } else { "<=" };
                let param = self.push_param(condition.data.clone());
                Ok(format!("{} {} {}", column, comparator, param))
            }
        }
    }

    fn push_param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

fn validate_column(name: &str) -> Result<(), FilterError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(FilterError::InvalidColumn(name.to_string()))
    }
}

/// LIKE wildcards in user text match literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    /// Case-insensitive substring match.
    #[serde(rename = "$ilike")] ILike,
    #[serde(rename = "$gte")] Gte,
    #[serde(rename = "$lte")] Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Value,
}

impl FilterWhereInfo {
    pub fn new(column: impl Into<String>, operator: FilterOp, data: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            data: data.into(),
        }
    }
}

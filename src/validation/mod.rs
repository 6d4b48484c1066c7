pub mod schema;
pub mod schemas;

pub use schema::{Format, Property, PropertyType, Schema};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Validates `instance` against `schema` and deserializes the normalized object.
pub fn validate_into<T: DeserializeOwned>(schema: &Schema, instance: &Value) -> Result<T, ApiError> {
    let normalized = schema.validate(instance).map_err(ApiError::validation)?;
    serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        tracing::error!("{} passed validation but failed to deserialize: {}", schema.name, e);
        ApiError::bad_request("Bad Request")
    })
}

/// Partial updates must change something.
pub fn require_changes(instance: &Value) -> Result<(), ApiError> {
    match instance {
        Value::Object(object) if object.is_empty() => Err(ApiError::bad_request("No data")),
        _ => Ok(()),
    }
}

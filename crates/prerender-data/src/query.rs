//! GraphQL request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub variables: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl QueryRequest {
    /// Operation without variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Value::Null,
            operation_name: None,
        }
    }

    /// Set the variables object.
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    /// Set the operation name.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Key identifying this operation in the result cache.
    ///
    /// Variables are compared by their JSON text, so key order matters.
    pub fn cache_key(&self) -> String {
        if self.variables.is_null() {
            self.query.clone()
        } else {
            format!("{}:{}", self.query, self.variables)
        }
    }
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<QueryError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryError {
    pub message: String,
}

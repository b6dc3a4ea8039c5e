use std::fmt::{self, Display};

use crate::error::{ApiError, Error};

#[derive(Debug)]
pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::new("Row not found".to_owned()),
            sqlx::Error::PoolTimedOut => Self::new("Database pool timed out".to_owned()),
            sqlx::Error::Database(e) => Self::new(format!("Database error: {e}")),
            e => Self::new(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(format!("Malformed stored list: {value}"))
    }
}

impl From<QueryError> for Error {
    fn from(value: QueryError) -> Self {
        ApiError::Internal.new(&value.info)
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info)
    }
}

impl std::error::Error for QueryError {}

/// Rejected client input.
#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl From<TypeError> for Error {
    fn from(value: TypeError) -> Self {
        ApiError::InvalidRequest.new(&value.info)
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_surface_as_server_errors_with_message() {
        let error: Error = QueryError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(error.code, 500);
        assert_eq!(error.info.as_deref(), Some("Database pool timed out"));
    }

    #[test]
    fn other_sqlx_errors_keep_their_message() {
        let error = QueryError::from(sqlx::Error::Protocol("bad frame".to_owned()));
        assert!(error.to_string().contains("bad frame"));
        assert_eq!(QueryError::from(sqlx::Error::RowNotFound).to_string(), "Row not found");
    }

    #[test]
    fn type_errors_surface_as_client_errors() {
        let error: Error = TypeError::new("Ingredient name is required").into();
        assert_eq!(error.code, 400);
        assert_eq!(error.message(), "Ingredient name is required");
    }
}

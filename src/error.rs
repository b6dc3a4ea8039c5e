use std::fmt::{self, Display};

use serde::Serialize;
use warp::http::StatusCode;

/// Error carried out of every store and engine call. `server::rejection`
/// renders it as `{"error": ...}` with `code` as the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: u16,
    pub info: Option<String>,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn message(&self) -> String {
        match &self.info {
            Some(info) => info.to_owned(),
            None => self
                .status()
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_owned(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == StatusCode::NOT_FOUND.as_u16()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed input. 400.
    InvalidRequest,
    /// Point lookup missed. 404.
    NotFound,
    /// Anything else. 500.
    Internal,
}

impl ApiError {
    pub fn code(self) -> u16 {
        match self {
            ApiError::InvalidRequest => 400,
            ApiError::NotFound => 404,
            ApiError::Internal => 500,
        }
    }

    pub fn new(self, info: &str) -> Error {
        Error {
            code: self.code(),
            info: Some(info.to_owned()),
        }
    }

    pub fn default(self) -> Error {
        Error {
            code: self.code(),
            info: None,
        }
    }
}

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&Error> for ErrorResponse {
    fn from(value: &Error) -> Self {
        Self {
            error: value.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(ApiError::InvalidRequest.default().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.default().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal.new("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_falls_back_to_reason_phrase() {
        assert_eq!(ApiError::NotFound.default().message(), "Not Found");
        assert_eq!(ApiError::NotFound.new("Cocktail not found").message(), "Cocktail not found");
    }

    #[test]
    fn unknown_code_renders_as_internal() {
        let error = Error {
            code: 42,
            info: None,
        };
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

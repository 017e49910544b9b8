use thiserror::Error;

/// Message carried by [`ApiError::MissingRequiredParameter`] when `name` is absent.
pub const REQUIRED_NAME_ERROR: &str = "'name' query string parameter is required";

/// Message carried by [`ApiError::InvalidParameter`] when `name` is blank.
pub const INVALID_NAME_ERROR: &str = "Invalid name provided";

/// Caller-visible message for any failure outside the taxonomy.
pub const DEFAULT_HTTP_ERROR: &str = "An error occurred processing your request.";

/// Body message used when a response body cannot be serialized.
pub const UNEXPECTED_HTTP_ERROR: &str = "An unexpected error occurred.";

/// Failures that are surfaced to the caller verbatim.
///
/// The HTTP status is a property of the variant, never of the call site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    MissingRequiredParameter(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InternalError(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    GatewayTimeout(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingRequiredParameter(_) => 400,
            ApiError::InvalidParameter(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalError(_) => 500,
            ApiError::NotImplemented(_) => 501,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::GatewayTimeout(_) => 504,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::MissingRequiredParameter(message)
            | ApiError::InvalidParameter(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::InternalError(message)
            | ApiError::NotImplemented(message)
            | ApiError::ServiceUnavailable(message)
            | ApiError::GatewayTimeout(message) => message,
        }
    }
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Handler panicked: {message}")]
    Panic { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Failures while loading or checking a [`HandlerConfig`](crate::config::HandlerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Failed to load configuration from {origin}: {error}")]
    LoadFailed {
        origin: String,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, HandlerError>;

impl HandlerError {
    /// The taxonomy error behind this failure, if it has one.
    pub fn classified(&self) -> Option<&ApiError> {
        match self {
            HandlerError::Api(e) => Some(e),
            _ => None,
        }
    }
}

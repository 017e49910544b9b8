use std::fmt;

use crate::errors::{ApiError, INVALID_NAME_ERROR, REQUIRED_NAME_ERROR};
use crate::request::ApiRequest;

/// The only query string parameter the pipeline reads.
pub const NAME_PARAMETER: &str = "name";

/// A `name` that is known not to be blank.
///
/// Holds the value exactly as received; trimming is only used for the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedName(String);

impl ValidatedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ValidatedName {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidParameter(INVALID_NAME_ERROR.to_string()));
        }
        Ok(Self(value))
    }
}

/// Extracts and checks `name` from the request's query string.
///
/// A missing bag, an empty bag and a bag without the key are all
/// `MissingRequiredParameter`; a null or blank value is `InvalidParameter`.
pub fn validate_input(request: &ApiRequest) -> Result<ValidatedName, ApiError> {
    let value = request
        .query_param(NAME_PARAMETER)
        .ok_or_else(|| ApiError::MissingRequiredParameter(REQUIRED_NAME_ERROR.to_string()))?;

    match value {
        Some(name) => ValidatedName::try_from(name.clone()),
        None => Err(ApiError::InvalidParameter(INVALID_NAME_ERROR.to_string())),
    }
}

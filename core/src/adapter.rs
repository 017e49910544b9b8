use serde::Serialize;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::errors::{ApiError, HandlerError};
use crate::response::{ApiResponse, ResponseBuilder, STATUS_INTERNAL_SERVER_ERROR};
use crate::telemetry::{Diagnostics, LogEnvelope};

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Turns any error into a response, logging it first.
#[derive(Clone)]
pub struct ErrorAdapter {
    builder: ResponseBuilder,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ErrorAdapter {
    pub fn new(builder: ResponseBuilder, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            builder,
            diagnostics,
        }
    }

    /// Taxonomy errors keep their status and message. Anything else becomes
    /// a 500 carrying `default_message`; its own text only reaches the log.
    pub fn adapt(&self, error: &(dyn Error + 'static), default_message: &str) -> ApiResponse {
        self.diagnostics.failure(&LogEnvelope {
            error: error.to_string(),
            trace: render_trace(error),
        });

        let (status_code, message) = match classify(error) {
            Some(api_error) => (api_error.status_code(), api_error.message()),
            None => (STATUS_INTERNAL_SERVER_ERROR, default_message),
        };

        self.builder.build(&ErrorBody { error: message }, status_code)
    }
}

/// Finds the taxonomy error, if `error` is one or directly wraps one.
pub fn classify<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a ApiError> {
    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return Some(api_error);
    }
    error
        .downcast_ref::<HandlerError>()
        .and_then(HandlerError::classified)
}

fn render_trace(error: &(dyn Error + 'static)) -> String {
    let mut trace = format!("{:?}\n", error);
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(trace, "Caused by: {}", cause);
        source = cause.source();
    }
    match origin_backtrace(error) {
        Some(backtrace) => {
            let _ = write!(trace, "stack backtrace:\n{}", backtrace);
        }
        None => {
            let _ = write!(trace, "stack backtrace:\n{}", Backtrace::force_capture());
        }
    }
    trace
}

/// The backtrace recorded where the error was created, when there is one.
fn origin_backtrace<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a Backtrace> {
    match error.downcast_ref::<HandlerError>() {
        Some(HandlerError::Generic(e)) if e.backtrace().status() == BacktraceStatus::Captured => {
            Some(e.backtrace())
        }
        _ => None,
    }
}

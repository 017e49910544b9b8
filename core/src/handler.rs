use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::adapter::ErrorAdapter;
use crate::config::{ConfigProvider, HandlerConfig};
use crate::errors::{self, HandlerError};
use crate::request::ApiRequest;
use crate::response::{ApiResponse, ResponseBuilder};
use crate::telemetry::Diagnostics;
use crate::validator::{ValidatedName, validate_input};

/// The domain step of a handler: turns a validated name into a response body.
pub trait Transform: Send + Sync {
    type Body: Serialize;

    fn apply(&self, name: &ValidatedName) -> errors::Result<Self::Body>;
}

impl<F, B> Transform for F
where
    F: Fn(&ValidatedName) -> errors::Result<B> + Send + Sync,
    B: Serialize,
{
    type Body = B;

    fn apply(&self, name: &ValidatedName) -> errors::Result<B> {
        self(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GreetingBody {
    pub message: String,
}

/// Renders `"<word>, <name>!"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    word: String,
}

impl Greeting {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }

    pub fn hello() -> Self {
        Self::new("Hello")
    }

    pub fn goodbye() -> Self {
        Self::new("Goodbye")
    }

    pub fn message_for(&self, name: &ValidatedName) -> String {
        format!("{}, {}!", self.word, name)
    }
}

impl Transform for Greeting {
    type Body = GreetingBody;

    fn apply(&self, name: &ValidatedName) -> errors::Result<GreetingBody> {
        Ok(GreetingBody {
            message: self.message_for(name),
        })
    }
}

/// Runs one invocation: validate, transform, build the response.
///
/// Every failure, whichever step raised it, goes through the same
/// [`ErrorAdapter`] call, so `handle` always returns a response.
pub struct Handler<T> {
    transform: T,
    builder: ResponseBuilder,
    adapter: ErrorAdapter,
    diagnostics: Arc<dyn Diagnostics>,
    default_error_message: String,
}

impl Handler<Greeting> {
    /// A greeting handler answering failures outside the taxonomy with
    /// `default_error_message`.
    pub fn greeter(
        greeting: Greeting,
        default_error_message: impl Into<String>,
        provider: Arc<dyn ConfigProvider>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Handler::new(greeting, default_error_message, provider, diagnostics)
    }

    pub fn from_config(
        config: &HandlerConfig,
        provider: Arc<dyn ConfigProvider>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Handler::greeter(
            Greeting::new(config.greeting.clone()),
            config.default_error_message.clone(),
            provider,
            diagnostics,
        )
    }
}

impl<T: Transform> Handler<T> {
    pub fn new(
        transform: T,
        default_error_message: impl Into<String>,
        provider: Arc<dyn ConfigProvider>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        let builder = ResponseBuilder::new(provider, diagnostics.clone());
        let adapter = ErrorAdapter::new(builder.clone(), diagnostics.clone());
        Self {
            transform,
            builder,
            adapter,
            diagnostics,
            default_error_message: default_error_message.into(),
        }
    }

    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        self.diagnostics.started(request);

        // serializing the body can panic as well as the transform
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process(request)))
            .unwrap_or_else(|payload| {
                Err(HandlerError::Panic {
                    message: panic_message(payload.as_ref()),
                })
            });

        match outcome {
            Ok(response) => {
                self.diagnostics.ended(request);
                response
            }
            Err(e) => self.adapter.adapt(&e, &self.default_error_message),
        }
    }

    fn process(&self, request: &ApiRequest) -> errors::Result<ApiResponse> {
        let name = validate_input(request)?;
        let body = self.transform.apply(&name)?;
        Ok(self.builder.ok(&body))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

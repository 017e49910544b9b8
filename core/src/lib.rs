//! Request-processing pipeline shared by the greeting functions.
//!
//! A request flows through [`validator::validate_input`], a domain
//! [`handler::Transform`] and the [`response::ResponseBuilder`]; any failure on
//! the way is turned into a response by the [`adapter::ErrorAdapter`].

pub mod adapter;
pub mod config;
pub mod errors;
pub mod handler;
pub mod request;
pub mod response;
pub mod telemetry;
pub mod validator;

pub use adapter::ErrorAdapter;
pub use config::{ConfigProvider, EnvConfig, HandlerConfig, StaticConfig};
pub use errors::{ApiError, ConfigError, HandlerError, Result};
pub use handler::{Greeting, Handler, Transform};
pub use request::ApiRequest;
pub use response::{ApiResponse, ResponseBuilder};
pub use telemetry::{Diagnostics, LogEnvelope, TracingDiagnostics};
pub use validator::{ValidatedName, validate_input};

use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::request::ApiRequest;

/// Installs the process-wide subscriber. Call once from `main`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greeter_core=info,runner_lambda=info".into()),
        )
        // CloudWatch does not render colour codes
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

/// Diagnostic record written once per failed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEnvelope {
    pub error: String,
    pub trace: String,
}

/// Where the pipeline reports what it is doing.
///
/// Constructed once per process and handed to every component that logs.
#[cfg_attr(test, mockall::automock)]
pub trait Diagnostics: Send + Sync {
    fn started(&self, request: &ApiRequest);

    fn ended(&self, request: &ApiRequest);

    fn failure(&self, envelope: &LogEnvelope);

    fn serialization_failed(&self, reason: &str);

    fn domain_missing(&self);
}

/// [`Diagnostics`] backed by `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn started(&self, request: &ApiRequest) {
        info!("Start processing lambda with event: {:?}", request);
    }

    fn ended(&self, request: &ApiRequest) {
        info!("End processing lambda with event: {:?}", request);
    }

    fn failure(&self, envelope: &LogEnvelope) {
        error!(error = %envelope.error, trace = %envelope.trace, "Request failed");
    }

    fn serialization_failed(&self, reason: &str) {
        error!("Error serializing response body to JSON: {}", reason);
    }

    fn domain_missing(&self) {
        warn!("DOCS_DOMAIN_NAME is not set; CORS origin will have an empty host");
    }
}

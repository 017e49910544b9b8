use std::sync::Arc;

use greeter_core::telemetry::init_tracing;
use greeter_core::{
    ApiRequest, ApiResponse, ConfigError, EnvConfig, Handler, HandlerConfig, Transform,
    TracingDiagnostics,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::{error, info_span};

/// Answers one API Gateway event. Failures are already folded into the
/// response, so this only returns `Err` if the runtime itself misbehaves.
pub async fn function_handler<T: Transform>(
    handler: &Handler<T>,
    event: LambdaEvent<ApiRequest>,
) -> Result<ApiResponse, Error> {
    let span = info_span!("invocation", request_id = %event.context.request_id);
    let _enter = span.enter();

    Ok(handler.handle(&event.payload))
}

/// Resolves the function's settings: `preset` unless `GREETER_CONFIG`
/// overrides it, checked before any event is accepted.
pub fn load_config(preset: HandlerConfig) -> Result<HandlerConfig, ConfigError> {
    let config = HandlerConfig::from_env_or(preset)?;
    config.validate()?;
    Ok(config)
}

/// Runs a greeting function until the Lambda runtime shuts down.
pub async fn run(preset: HandlerConfig) -> Result<(), Error> {
    init_tracing();

    let config = load_config(preset).inspect_err(|e| error!("Cannot start handler: {}", e))?;

    let handler = Handler::from_config(&config, Arc::new(EnvConfig), Arc::new(TracingDiagnostics));
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiRequest>| async move {
        function_handler(handler, event).await
    }))
    .await
}

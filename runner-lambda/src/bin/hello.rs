use greeter_core::HandlerConfig;
use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    runner_lambda::run(HandlerConfig::hello()).await
}

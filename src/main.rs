use anyhow::Context;
use backend::configuration::get_configuration;
use backend::routes;
use backend::startup::Application;
use backend::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::get_subscriber("backend".into(), "info".into(), std::io::stdout);
    telemetry::init_subscriber(subscriber);

    //

    let configuration = get_configuration().context("Failed to read configuration")?;

    tracing::info!(
        application_host = %configuration.application.host,
        environment = %configuration.application.environment,
        "got configuration"
    );

    // No durable session store is wired in yet, only development can start.
    let application = Application::build(configuration, None, routes::configure)?;
    application.run_until_stopped().await
}

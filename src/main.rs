use std::fmt::Debug;
use std::fmt::Display;

use propertyai_waitlist::configuration::get_configuration;
use propertyai_waitlist::expiry::init_expiry_worker;
use propertyai_waitlist::startup::Application;
use propertyai_waitlist::telemetry::get_subscriber;
use propertyai_waitlist::telemetry::init_subscriber;
use tokio::task::JoinError;

fn report_exit(
    name: &str,
    outcome: Result<Result<(), impl Debug + Display>, JoinError>,
) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{name} exited gracefully")
        }

        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain=?e,
                error.message=%e,
                "{name} failed (inner)"
            )
        }

        Err(e) => {
            tracing::error!(
                error.cause_chain=?e,
                error.message=%e,
                "{name} failed (outer)"
            )
        }
    }
}

/// Initialise telemetry, load config, and start the server alongside the
/// visitor expiry worker
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("propertyai-waitlist", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;

    let app = Application::build(cfg.clone()).await?;
    let expiry_worker = init_expiry_worker(app.registry(), cfg.waitlist);

    let server_thread = tokio::spawn(app.run_until_stopped());
    let expiry_worker_thread = tokio::spawn(expiry_worker);

    // returns when the first branch completes, cancelling the other
    tokio::select! {
        o = server_thread => { report_exit("API", o) },
        o = expiry_worker_thread => { report_exit("Background expiry worker", o) },
    }

    Ok(())
}

use std::sync::Arc;

use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, LevelFilter};
use resizer::{Config, ResizeResult, Resizer};
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .without_timestamps()
        .init()?;

    // Kept for the container's lifetime so the rate window spans invocations.
    let resizer = Arc::new(Resizer::from_config(Config::from_env()?)?);
    let config = resizer.config();
    info!(
        "Resizing to {}x{} into {}, alerting above {} resizes per {}s.",
        config.resize_width,
        config.resize_height,
        config.destination_bucket,
        config.threshold_count,
        config.threshold_duration_secs
    );

    run(service_fn(move |event: LambdaEvent<S3Event>| {
        let resizer = Arc::clone(&resizer);
        async move { Ok::<ResizeResult, Error>(resizer.handle_s3_event(event.payload).await) }
    }))
    .await
}

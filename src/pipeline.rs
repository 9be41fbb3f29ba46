use std::io::Cursor;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use aws_lambda_events::event::s3::S3Event;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use log::{error, info, warn};

use crate::config::{Config, ConfigError};
use crate::error::{ResizeError, Result};
use crate::event::{ResizeEvent, ResizeResult};
use crate::notify::{Notifier, SnsNotifier};
use crate::rate::RateTracker;
use crate::storage::{ObjectStore, S3Store};

pub const SUCCESS_SUBJECT: &str = "Image Resized Successfully";
pub const THRESHOLD_SUBJECT: &str = "Resizing Threshold Exceeded";
pub const OUTPUT_CONTENT_TYPE: &str = "image/png";

// Bicubic, no aspect-ratio preservation.
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Processes one uploaded object per invocation.
///
/// The rate tracker lives as long as the `Resizer`, which the binary keeps
/// for the lifetime of the Lambda container.
pub struct Resizer<S, N> {
    config: Config,
    store: S,
    notifier: N,
    tracker: Mutex<RateTracker>,
}

impl Resizer<S3Store, SnsNotifier> {
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let region = config.aws_region()?;
        let store = S3Store::new(region.clone());
        let notifier = SnsNotifier::new(region);
        Ok(Self::new(config, store, notifier))
    }
}

impl<S: ObjectStore, N: Notifier> Resizer<S, N> {
    pub fn new(config: Config, store: S, notifier: N) -> Self {
        let tracker = RateTracker::new(config.threshold_count, config.threshold_duration());
        Self::with_tracker(config, store, notifier, tracker)
    }

    pub fn with_tracker(config: Config, store: S, notifier: N, tracker: RateTracker) -> Self {
        Self {
            config,
            store,
            notifier,
            tracker: Mutex::new(tracker),
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Number of resizes currently inside the threshold window.
    pub fn tracked(&self) -> usize {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub async fn handle_s3_event(&self, event: S3Event) -> ResizeResult {
        match ResizeEvent::from_s3_event(&event) {
            Ok(event) => self.process(&event).await,
            Err(e) => {
                error!("Error: {e}");
                ResizeResult::failure(&e)
            }
        }
    }

    pub async fn process(&self, event: &ResizeEvent) -> ResizeResult {
        match self.try_process(event).await {
            Ok(()) => ResizeResult::success(),
            Err(e) => {
                error!(
                    "Resize failed for {}/{}: {e}",
                    event.source_bucket(),
                    event.object_key()
                );
                ResizeResult::failure(&e)
            }
        }
    }

    async fn try_process(&self, event: &ResizeEvent) -> Result<()> {
        let bucket = event.source_bucket();
        let key = event.object_key();
        if bucket != self.config.source_bucket {
            warn!(
                "Event bucket {bucket} differs from configured source bucket {}.",
                self.config.source_bucket
            );
        }

        let original = self
            .store
            .get(bucket, key)
            .await
            .map_err(|source| ResizeError::Fetch {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                source,
            })?;
        info!("Fetched {bucket}/{key} ({} bytes).", original.len());

        let (width, height) = (self.config.resize_width, self.config.resize_height);
        let resized =
            tokio::task::spawn_blocking(move || transform(&original, width, height)).await??;

        let dest_bucket = self.config.destination_bucket.as_str();
        let dest_key = resized_key(&self.config.key_prefix, key);
        self.store
            .put(dest_bucket, &dest_key, resized, OUTPUT_CONTENT_TYPE)
            .await
            .map_err(|source| ResizeError::Store {
                bucket: dest_bucket.to_owned(),
                key: dest_key.clone(),
                source,
            })?;
        info!("Resize completed: {bucket}/{key} -> {dest_bucket}/{dest_key}");

        // A failure from here on leaves the resized object in place.
        self.notify(
            SUCCESS_SUBJECT,
            &format!("Image {key} has been resized and uploaded to {dest_bucket}/{dest_key}"),
        )
        .await?;

        if let Some(alert) = self.track(now_secs()) {
            warn!("{alert}");
            self.notify(THRESHOLD_SUBJECT, &alert).await?;
        }
        Ok(())
    }

    /// Records one completion and returns the alert text when the window is
    /// over threshold. Alerts repeat for every resize while it stays over.
    fn track(&self, now: f64) -> Option<String> {
        let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        tracker.record_and_check(now).then(|| {
            format!(
                "More than {} objects have been resized in the last {:?} minutes.",
                tracker.threshold_count(),
                tracker.window_minutes()
            )
        })
    }

    async fn notify(&self, subject: &str, message: &str) -> Result<()> {
        self.notifier
            .publish(&self.config.topic_arn, subject, message)
            .await
            .map_err(ResizeError::Notify)
    }
}

pub fn resized_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// Decodes `bytes`, resizes to exactly `width × height` and encodes as PNG.
pub fn transform(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let image = decode(bytes)?;
    let resized = image.resize_exact(width, height, RESIZE_FILTER);
    encode_png(&resized)
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ResizeError::Decode(ImageError::IoError(e)))?
        .decode()
        .map_err(ResizeError::Decode)
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(ResizeError::Encode)?;
    Ok(buffer)
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_else(|e| {
            warn!("System clock is before the Unix epoch ({e}), using 0.");
            0.0
        })
}

use aws_lambda_events::event::s3::S3Event;
use log::warn;
use serde::Serialize;

use crate::error::{ResizeError, Result};

/// The single object a notification refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeEvent {
    source_bucket: String,
    object_key: String,
}

impl ResizeEvent {
    pub const fn new(source_bucket: String, object_key: String) -> Self {
        Self {
            source_bucket,
            object_key,
        }
    }

    /// Takes the first record of an S3 notification. Any further records are
    /// ignored; keys are used exactly as delivered.
    pub fn from_s3_event(event: &S3Event) -> Result<Self> {
        let Some(record) = event.records.first() else {
            return Err(ResizeError::InvalidEvent("no records"));
        };
        if event.records.len() > 1 {
            warn!(
                "Event carries {} records, only the first is processed.",
                event.records.len()
            );
        }

        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .ok_or(ResizeError::InvalidEvent("missing bucket name"))?;
        let key = record
            .s3
            .object
            .key
            .clone()
            .ok_or(ResizeError::InvalidEvent("missing object key"))?;
        Ok(Self::new(bucket, key))
    }

    pub fn source_bucket(&self) -> &str {
        &self.source_bucket
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }
}

/// Response handed back to the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl ResizeResult {
    pub const OK: u16 = 200;
    pub const FAILED: u16 = 500;

    pub fn success() -> Self {
        Self {
            status_code: Self::OK,
            body: "Image resized and uploaded successfully".to_string(),
        }
    }

    pub fn failure(error: &ResizeError) -> Self {
        Self {
            status_code: Self::FAILED,
            body: format!("Error processing image: {error}"),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status_code == Self::OK
    }
}

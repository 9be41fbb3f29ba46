use async_trait::async_trait;
use rusoto_core::{Region, RusotoError};
use rusoto_s3::{GetObjectError, GetObjectRequest, PutObjectError, PutObjectRequest, S3Client, S3};
use tokio::io::AsyncReadExt;

use crate::error::ServiceError;

/// Object storage the pipeline reads sources from and writes results to.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ServiceError>;

    /// Overwrites any existing object under `key`.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError>;
}

pub struct S3Store {
    client: S3Client,
}

impl S3Store {
    pub fn new(region: Region) -> Self {
        Self {
            client: S3Client::new(region),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ServiceError> {
        let request = GetObjectRequest {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            ..Default::default()
        };
        let response = self
            .client
            .get_object(request)
            .await
            .map_err(|e| classify_get_error(bucket, key, e))?;
        let Some(body) = response.body else {
            return Err(ServiceError::Io(format!("{bucket}/{key} has no body")));
        };

        let mut contents = Vec::new();
        body.into_async_read()
            .read_to_end(&mut contents)
            .await
            .map_err(|e| ServiceError::Io(e.to_string()))?;
        Ok(contents)
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError> {
        let request = PutObjectRequest {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            body: Some(body.into()),
            content_type: Some(content_type.to_owned()),
            ..Default::default()
        };
        self.client
            .put_object(request)
            .await
            .map(|_| ())
            .map_err(classify_put_error)
    }
}

fn classify_get_error(bucket: &str, key: &str, error: RusotoError<GetObjectError>) -> ServiceError {
    match error {
        RusotoError::Service(GetObjectError::NoSuchKey(_)) => {
            ServiceError::NotFound(format!("{bucket}/{key}"))
        }
        other => classify(other),
    }
}

fn classify_put_error(error: RusotoError<PutObjectError>) -> ServiceError {
    classify(error)
}

/// Maps transport-level rusoto failures onto the collaborator error kinds.
pub(crate) fn classify<E: std::error::Error + 'static>(error: RusotoError<E>) -> ServiceError {
    match error {
        RusotoError::Credentials(e) => ServiceError::AccessDenied(e.to_string()),
        RusotoError::Unknown(response) => match response.status.as_u16() {
            403 => ServiceError::AccessDenied(response.body_as_str().to_string()),
            404 => ServiceError::NotFound(response.body_as_str().to_string()),
            status => ServiceError::Io(format!("HTTP {status}: {}", response.body_as_str())),
        },
        other => ServiceError::Io(other.to_string()),
    }
}

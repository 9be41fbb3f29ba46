use async_trait::async_trait;
use log::info;
use rusoto_core::{Region, RusotoError};
use rusoto_sns::{PublishError, PublishInput, Sns, SnsClient};

use crate::error::ServiceError;
use crate::storage::classify;

/// Publishes human-readable notifications to a topic.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<(), ServiceError>;
}

pub struct SnsNotifier {
    client: SnsClient,
}

impl SnsNotifier {
    pub fn new(region: Region) -> Self {
        Self {
            client: SnsClient::new(region),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<(), ServiceError> {
        let input = PublishInput {
            topic_arn: Some(topic.to_owned()),
            subject: Some(subject.to_owned()),
            message: message.to_owned(),
            ..Default::default()
        };
        let output = self
            .client
            .publish(input)
            .await
            .map_err(classify_publish_error)?;
        info!(
            "Published {subject:?} to {topic} (message id {}).",
            output.message_id.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }
}

fn classify_publish_error(error: RusotoError<PublishError>) -> ServiceError {
    match error {
        RusotoError::Service(PublishError::AuthorizationError(msg)) => {
            ServiceError::AccessDenied(msg)
        }
        RusotoError::Service(PublishError::NotFound(msg)) => ServiceError::NotFound(msg),
        other => classify(other),
    }
}

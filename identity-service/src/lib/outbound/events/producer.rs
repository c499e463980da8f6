use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use serde::Serialize;
use thiserror::Error;

use crate::config::KafkaConfig;
use crate::domain::account::events::ConfirmationRequestedEvent;
use crate::domain::account::ports::ConfirmationNotifier;
use crate::domain::errors::EventPublisherError;
use crate::outbound::events::messages::AccountEventMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                EventPublisherError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
        }
    }
}

/// Publishes confirmation requests to the mailer topic.
pub struct KafkaEventProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaEventProducer {
    /// Create a Kafka producer with at-least-once delivery.
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Broker drops duplicates caused by retries
    /// - `retry.backoff.ms=100`: Backoff between retry attempts
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            "Initializing Kafka producer for account events"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "30000")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Serialize and send one message, keyed by account so that events for
    /// the same account land on the same partition.
    async fn publish<T: Serialize>(
        &self,
        account_id: &str,
        message: &T,
    ) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(&self.topic)
            .key(account_id)
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|(partition, offset)| {
                tracing::debug!(
                    topic = %self.topic,
                    account_id,
                    partition,
                    offset,
                    "Event published"
                );
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl ConfirmationNotifier for KafkaEventProducer {
    async fn publish_confirmation_requested(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), EventPublisherError> {
        let message = AccountEventMessage::from(event);

        self.publish(&event.account_id, &message)
            .await
            .map_err(Into::into)
    }
}
